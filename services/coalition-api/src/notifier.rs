use anyhow::Result;
use async_trait::async_trait;
use evaluations::EvaluationRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Who a notification is addressed to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Audience {
    Role(String),
    Subjects(Vec<Uuid>),
    Everyone,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: JsonValue,
}

impl Notification {
    pub fn evaluation_recorded(record: &EvaluationRecord) -> Self {
        Self {
            kind: "evaluation_recorded".to_string(),
            title: "New performance evaluation".to_string(),
            body: format!(
                "A new evaluation has been recorded for you with a score of {:.2}.",
                record.total_score
            ),
            data: serde_json::json!({
                "evaluation_id": record.id,
                "subject_id": record.subject_id,
                "total_score": record.total_score,
            }),
        }
    }
}

/// Fire-and-forget delivery to an audience. Implementations decide how.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, audience: &Audience, notification: &Notification) -> Result<()>;
}

/// Logs notifications; used when no webhook is configured.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, audience: &Audience, notification: &Notification) -> Result<()> {
        info!(kind=%notification.kind, ?audience, title=%notification.title, "notification (not delivered)");
        Ok(())
    }
}

/// Persists notifications to `notification_outbox`; the webhook dispatcher
/// delivers them.
pub struct OutboxNotifier {
    pool: PgPool,
}

impl OutboxNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn notify(&self, audience: &Audience, notification: &Notification) -> Result<()> {
        let outbox_id = Uuid::new_v4();
        let audience_json = serde_json::to_value(audience)?;
        let envelope = serde_json::json!({
            "id": outbox_id, // same as outbox PK so receivers can dedupe
            "type": notification.kind,
            "ts": chrono::Utc::now(),
            "audience": audience_json,
            "notification": notification,
        });

        sqlx::query(
            r#"
            INSERT INTO notification_outbox (id, kind, audience, event)
            VALUES ($1, $2, $3, $4)
            "#
        )
        .bind(outbox_id)
        .bind(&notification.kind)
        .bind(&audience_json)
        .bind(&envelope)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
