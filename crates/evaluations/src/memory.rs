use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::store::{EvaluationStore, Result, StoreError};
use crate::{EvaluationRecord, NewEvaluation, RoleFilter, Subject};

/// Process-local store used by tests and the demo binary.
#[derive(Default)]
pub struct InMemoryStore {
    subjects: RwLock<HashMap<Uuid, Subject>>,
    evaluations: RwLock<Vec<EvaluationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subject(&self, subject: Subject) {
        self.subjects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(subject.id, subject);
    }

    /// Seeds a record as-is (timestamps included). Skips score validation.
    pub fn add_record(&self, record: EvaluationRecord) {
        let mut evals = self.evaluations.write().unwrap_or_else(|e| e.into_inner());
        evals.push(record);
        evals.sort_by_key(|r| r.created_at);
    }

    fn subject(&self, id: Uuid) -> Option<Subject> {
        self.subjects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl EvaluationStore for InMemoryStore {
    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>> {
        Ok(self.subject(id))
    }

    async fn evaluations_for_role(&self, filter: &RoleFilter) -> Result<Vec<EvaluationRecord>> {
        let subjects = self.subjects.read().unwrap_or_else(|e| e.into_inner());
        let evals = self.evaluations.read().unwrap_or_else(|e| e.into_inner());
        Ok(evals
            .iter()
            .filter(|r| subjects.get(&r.subject_id).is_some_and(|s| filter.matches(s)))
            .cloned()
            .collect())
    }

    async fn evaluations_for_subject(&self, subject_id: Uuid) -> Result<Vec<EvaluationRecord>> {
        let evals = self.evaluations.read().unwrap_or_else(|e| e.into_inner());
        Ok(evals.iter().filter(|r| r.subject_id == subject_id).cloned().collect())
    }

    async fn insert_evaluation(&self, new: NewEvaluation) -> Result<EvaluationRecord> {
        new.validate()?;
        let subject = self
            .subject(new.subject_id)
            .ok_or(StoreError::SubjectNotFound(new.subject_id))?;
        let record = new.into_record(&subject, Utc::now());
        self.add_record(record.clone());
        Ok(record)
    }
}
