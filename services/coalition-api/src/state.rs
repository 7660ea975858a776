use std::sync::Arc;

use evaluations::EvaluationStore;

use crate::config::ReportSettings;
use crate::notifier::Notifier;
use crate::rasterizer::Rasterizer;

pub type SharedState = Arc<AppState>;

/// Request-independent collaborators. Nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EvaluationStore>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: ReportSettings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EvaluationStore>,
        rasterizer: Arc<dyn Rasterizer>,
        notifier: Arc<dyn Notifier>,
        settings: ReportSettings,
    ) -> Self {
        Self { store, rasterizer, notifier, settings }
    }
}
