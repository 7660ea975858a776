pub mod config;
pub mod error;
pub mod notifier;
pub mod pipeline;
pub mod rasterizer;
pub mod rasterizer_command;
pub mod state;
pub mod store_pg;
pub mod webhooks;
mod routes_analytics;
mod routes_evaluations;
mod routes_reports;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reports/network", get(routes_reports::get_network_report))
        .route("/reports/subjects/:id", get(routes_reports::get_subject_report))
        .route("/analytics/network", get(routes_analytics::get_network_analytics))
        .route("/analytics/subjects/:id", get(routes_analytics::get_subject_analytics))
        .route("/evaluations", post(routes_evaluations::post_evaluation))
        .route("/subjects/:id/evaluations", get(routes_evaluations::get_subject_evaluations))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
