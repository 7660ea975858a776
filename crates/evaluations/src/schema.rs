use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 4.0;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("total score {0} is outside [0.0, 4.0]")]
    ScoreOutOfRange(f64),

    #[error("malformed category scores: {0}")]
    MalformedCategoryScores(String),
}

/// Person being evaluated ("associate" in coalition terms).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub organization: Option<String>,
    pub role: String,
    pub leader_type: Option<String>,
}

/// Which subjects a network-wide report covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleFilter {
    pub role: String,
    pub leader_type: Option<String>,
}

impl RoleFilter {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into(), leader_type: None }
    }

    pub fn with_leader_type(mut self, leader_type: impl Into<String>) -> Self {
        self.leader_type = Some(leader_type.into());
        self
    }

    pub fn matches(&self, subject: &Subject) -> bool {
        if subject.role != self.role {
            return false;
        }
        match &self.leader_type {
            Some(t) => subject.leader_type.as_deref() == Some(t.as_str()),
            None => true,
        }
    }
}

/// One scored assessment of a subject. Never mutated after insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub subject_organization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_score: f64,
    // Raw payload; may be an object or a string holding serialized JSON.
    pub category_scores: serde_json::Value,
    pub notes: Option<String>,
}

/// Input for recording a new evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub subject_id: Uuid,
    pub total_score: f64,
    #[serde(default)]
    pub category_scores: serde_json::Value,
    pub notes: Option<String>,
}

impl NewEvaluation {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        validate_score(self.total_score)?;
        if !self.category_scores.is_null() {
            crate::CategoryScores::parse(&self.category_scores)?;
        }
        Ok(())
    }

    pub fn into_record(self, subject: &Subject, created_at: DateTime<Utc>) -> EvaluationRecord {
        EvaluationRecord {
            id: Uuid::new_v4(),
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            subject_organization: subject.organization.clone(),
            created_at,
            total_score: self.total_score,
            category_scores: if self.category_scores.is_null() {
                serde_json::Value::Object(Default::default())
            } else {
                self.category_scores
            },
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

pub fn validate_score(score: f64) -> Result<(), EvaluationError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(EvaluationError::ScoreOutOfRange(score))
    }
}
