use analytics::{
    aggregate, network_insights, subject_insights, subject_report, NetworkInsights, ReportStatistics,
    SubjectInsights, SubjectReport,
};
use chrono::Utc;
use evaluations::Subject;
use reports::{network_document, render_html, subject_document, ReportDocument};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::rasterizer::RenderedDocument;
use crate::state::AppState;

/// Subject that exists and falls inside the configured role filter.
pub async fn eligible_subject(state: &AppState, id: Uuid) -> Result<Subject, ApiError> {
    state
        .store
        .find_subject(id)
        .await?
        .filter(|s| state.settings.filter.matches(s))
        .ok_or_else(ApiError::subject_not_found)
}

pub async fn network_analysis(state: &AppState) -> Result<(ReportStatistics, NetworkInsights), ApiError> {
    let records = state.store.evaluations_for_role(&state.settings.filter).await?;
    let stats = aggregate(&records, Utc::now());
    let insights = network_insights(&stats);
    info!(
        evaluations = stats.total_evaluations,
        subjects = stats.distinct_subjects,
        malformed = stats.malformed_records,
        "network analysis computed"
    );
    Ok((stats, insights))
}

pub async fn subject_analysis(state: &AppState, id: Uuid) -> Result<(SubjectReport, SubjectInsights), ApiError> {
    let subject = eligible_subject(state, id).await?;
    let records = state.store.evaluations_for_subject(id).await?;
    let report = subject_report(subject, &records, Utc::now());
    let insights = subject_insights(&report);
    info!(subject_id=%id, evaluations = report.statistics.total_evaluations, "subject analysis computed");
    Ok((report, insights))
}

pub async fn network_report(state: &AppState) -> Result<RenderedDocument, ApiError> {
    let (stats, insights) = network_analysis(state).await?;
    let doc = network_document(&stats, &insights, &state.settings.context);
    rasterize(state, &doc).await
}

pub async fn subject_report_document(state: &AppState, id: Uuid) -> Result<RenderedDocument, ApiError> {
    let (report, insights) = subject_analysis(state, id).await?;
    let doc = subject_document(&report, &insights, &state.settings.context);
    rasterize(state, &doc).await
}

async fn rasterize(state: &AppState, doc: &ReportDocument) -> Result<RenderedDocument, ApiError> {
    let html = render_html(doc);
    // all or nothing: a failed render never returns partial bytes
    let rendered = state
        .rasterizer
        .rasterize(html, doc.page)
        .await
        .map_err(|e| ApiError::Internal(format!("report rendering failed: {e:#}")))?;
    if rendered.bytes.is_empty() {
        return Err(ApiError::Internal("report rendering produced no output".to_string()));
    }
    Ok(rendered)
}
