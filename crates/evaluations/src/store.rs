use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{EvaluationError, EvaluationRecord, NewEvaluation, RoleFilter, Subject};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("subject {0} not found")]
    SubjectNotFound(Uuid),

    #[error("invalid evaluation: {0}")]
    Invalid(#[from] EvaluationError),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read side of the evaluation table plus the single insert path.
///
/// Listing methods return records ordered by `created_at` ascending.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>>;

    async fn evaluations_for_role(&self, filter: &RoleFilter) -> Result<Vec<EvaluationRecord>>;

    async fn evaluations_for_subject(&self, subject_id: Uuid) -> Result<Vec<EvaluationRecord>>;

    async fn insert_evaluation(&self, new: NewEvaluation) -> Result<EvaluationRecord>;
}
