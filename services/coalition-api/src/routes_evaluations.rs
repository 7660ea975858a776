use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use evaluations::{EvaluationRecord, NewEvaluation};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::notifier::{Audience, Notification};
use crate::pipeline::eligible_subject;
use crate::state::SharedState;

pub async fn post_evaluation(
    State(state): State<SharedState>,
    Json(req): Json<NewEvaluation>,
) -> Result<(StatusCode, Json<EvaluationRecord>), ApiError> {
    // validate before the lookup so bad payloads get 422 even for unknown subjects
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;
    eligible_subject(&state, req.subject_id).await?;

    let record = state.store.insert_evaluation(req).await?;
    info!(evaluation_id=%record.id, subject_id=%record.subject_id, score = record.total_score, "evaluation recorded");

    // best effort
    let audience = Audience::Subjects(vec![record.subject_id]);
    if let Err(e) = state
        .notifier
        .notify(&audience, &Notification::evaluation_recorded(&record))
        .await
    {
        warn!(evaluation_id=%record.id, error=%e, "notification failed");
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// Newest first.
pub async fn get_subject_evaluations(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EvaluationRecord>>, ApiError> {
    eligible_subject(&state, id).await?;
    let mut records = state.store.evaluations_for_subject(id).await?;
    records.reverse();
    Ok(Json(records))
}
