use analytics::{NetworkInsights, ReportStatistics, SubjectInsights, SubjectReport};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct NetworkAnalyticsResponse {
    pub statistics: ReportStatistics,
    pub insights: NetworkInsights,
}

#[derive(Serialize)]
pub struct SubjectAnalyticsResponse {
    pub report: SubjectReport,
    pub insights: SubjectInsights,
}

pub async fn get_network_analytics(
    State(state): State<SharedState>,
) -> Result<Json<NetworkAnalyticsResponse>, ApiError> {
    let (statistics, insights) = pipeline::network_analysis(&state).await?;
    Ok(Json(NetworkAnalyticsResponse { statistics, insights }))
}

pub async fn get_subject_analytics(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubjectAnalyticsResponse>, ApiError> {
    let (report, insights) = pipeline::subject_analysis(&state, id).await?;
    Ok(Json(SubjectAnalyticsResponse { report, insights }))
}
