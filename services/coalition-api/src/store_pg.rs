use async_trait::async_trait;
use chrono::{DateTime, Utc};
use evaluations::store::Result;
use evaluations::{EvaluationRecord, EvaluationStore, NewEvaluation, RoleFilter, StoreError, Subject};
use sqlx::PgPool;
use uuid::Uuid;

/// `evaluations` joined with `subjects` for display name and organization.
pub struct PgEvaluationStore {
    pool: PgPool,
}

impl PgEvaluationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: Uuid,
    name: String,
    organization: Option<String>,
    role: String,
    leader_type: Option<String>,
}

impl From<SubjectRow> for Subject {
    fn from(r: SubjectRow) -> Self {
        Subject {
            id: r.id,
            name: r.name,
            organization: r.organization,
            role: r.role,
            leader_type: r.leader_type,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EvaluationRow {
    id: Uuid,
    subject_id: Uuid,
    subject_name: String,
    subject_organization: Option<String>,
    created_at: DateTime<Utc>,
    total_score: f64,
    category_scores: serde_json::Value,
    notes: Option<String>,
}

impl From<EvaluationRow> for EvaluationRecord {
    fn from(r: EvaluationRow) -> Self {
        EvaluationRecord {
            id: r.id,
            subject_id: r.subject_id,
            subject_name: r.subject_name,
            subject_organization: r.subject_organization,
            created_at: r.created_at,
            total_score: r.total_score,
            category_scores: r.category_scores,
            notes: r.notes,
        }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl EvaluationStore for PgEvaluationStore {
    async fn find_subject(&self, id: Uuid) -> Result<Option<Subject>> {
        let row: Option<SubjectRow> = sqlx::query_as(
            r#"SELECT id, name, organization, role, leader_type FROM subjects WHERE id = $1"#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(Subject::from))
    }

    async fn evaluations_for_role(&self, filter: &RoleFilter) -> Result<Vec<EvaluationRecord>> {
        let rows: Vec<EvaluationRow> = sqlx::query_as(
            r#"
            SELECT e.id, e.subject_id, s.name AS subject_name, s.organization AS subject_organization,
                   e.created_at, e.total_score, e.category_scores, e.notes
            FROM evaluations e
            JOIN subjects s ON s.id = e.subject_id
            WHERE s.role = $1
              AND ($2::text IS NULL OR s.leader_type = $2)
            ORDER BY e.created_at ASC
            "#
        )
        .bind(&filter.role)
        .bind(filter.leader_type.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(EvaluationRecord::from).collect())
    }

    async fn evaluations_for_subject(&self, subject_id: Uuid) -> Result<Vec<EvaluationRecord>> {
        let rows: Vec<EvaluationRow> = sqlx::query_as(
            r#"
            SELECT e.id, e.subject_id, s.name AS subject_name, s.organization AS subject_organization,
                   e.created_at, e.total_score, e.category_scores, e.notes
            FROM evaluations e
            JOIN subjects s ON s.id = e.subject_id
            WHERE e.subject_id = $1
            ORDER BY e.created_at ASC
            "#
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(EvaluationRecord::from).collect())
    }

    async fn insert_evaluation(&self, new: NewEvaluation) -> Result<EvaluationRecord> {
        new.validate()?;
        let subject = self
            .find_subject(new.subject_id)
            .await?
            .ok_or(StoreError::SubjectNotFound(new.subject_id))?;

        let record = new.into_record(&subject, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO evaluations (id, subject_id, total_score, category_scores, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(record.id)
        .bind(record.subject_id)
        .bind(record.total_score)
        .bind(&record.category_scores)
        .bind(record.notes.as_deref())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(record)
    }
}
