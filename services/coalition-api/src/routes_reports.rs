use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline;
use crate::rasterizer::RenderedDocument;
use crate::state::SharedState;

pub async fn get_network_report(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let doc = pipeline::network_report(&state).await?;
    Ok(attachment(doc, "network-performance-report"))
}

pub async fn get_subject_report(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let doc = pipeline::subject_report_document(&state, id).await?;
    let stem = format!("associate-performance-report-{}", id.simple());
    Ok(attachment(doc, &stem))
}

fn attachment(doc: RenderedDocument, stem: &str) -> Response {
    let filename = format!("{stem}-{}.{}", Utc::now().format("%Y-%m-%d"), doc.extension);
    (
        [
            (header::CONTENT_TYPE, doc.content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        doc.bytes,
    )
        .into_response()
}
