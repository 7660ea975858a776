//! Delivery of outbox notifications to the coalition webhook.
//!
//! Each row is claimed under a lease, checked against its audience, signed
//! and posted. The receiver's answer decides the row's next state through
//! [`transition`], which is kept free of I/O so the retry policy can be
//! tested without a database.

use anyhow::{anyhow, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::notifier::Audience;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const LEASE_SECS: f64 = 30.0;
const MAX_ATTEMPTS: i32 = 20;
const MAX_BACKOFF_SECS: i64 = 3600;

type HmacSha256 = Hmac<Sha256>;

/// Where notifications are posted and the key they are signed with.
#[derive(Clone, Debug)]
pub struct WebhookTarget {
    pub url: String,
    pub secret: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OutboxRow {
    id: Uuid,
    kind: String,
    audience: serde_json::Value,
    event: serde_json::Value,
    attempts: i32,
}

/// How a single delivery attempt ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Transport errors, 5xx, 408 and 429.
    Retryable(String),
    /// The receiver refused the payload; sending it again will not help.
    Rejected(String),
}

impl DeliveryOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            DeliveryOutcome::Delivered
        } else if status.is_client_error()
            && status != StatusCode::REQUEST_TIMEOUT
            && status != StatusCode::TOO_MANY_REQUESTS
        {
            DeliveryOutcome::Rejected(format!("HTTP {status}"))
        } else {
            DeliveryOutcome::Retryable(format!("HTTP {status}"))
        }
    }
}

/// Next state of an outbox row.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboxTransition {
    Delivered,
    Retry { attempts: i32, delay_secs: i64, error: String },
    Failed { attempts: i32, error: String },
    /// Nothing to send, e.g. a subject list that ended up empty.
    Skipped { reason: String },
}

/// `attempts` is the count recorded before this attempt.
pub fn transition(attempts: i32, outcome: DeliveryOutcome) -> OutboxTransition {
    let attempts = attempts + 1;
    match outcome {
        DeliveryOutcome::Delivered => OutboxTransition::Delivered,
        DeliveryOutcome::Rejected(error) => OutboxTransition::Failed { attempts, error },
        DeliveryOutcome::Retryable(error) if attempts >= MAX_ATTEMPTS => {
            OutboxTransition::Failed { attempts, error }
        }
        DeliveryOutcome::Retryable(error) => OutboxTransition::Retry {
            attempts,
            delay_secs: backoff_secs(attempts),
            error,
        },
    }
}

/// Audiences that cannot reach anyone are not posted.
pub fn skip_reason(audience: &Audience) -> Option<String> {
    match audience {
        Audience::Subjects(ids) if ids.is_empty() => Some("audience lists no subjects".to_string()),
        Audience::Role(role) if role.trim().is_empty() => Some("audience role is blank".to_string()),
        _ => None,
    }
}

/// Compact routing hint sent alongside the payload.
pub fn audience_header(audience: &Audience) -> String {
    match audience {
        Audience::Role(role) => format!("role:{role}"),
        Audience::Subjects(ids) => format!("subjects:{}", ids.len()),
        Audience::Everyone => "everyone".to_string(),
    }
}

pub async fn run_notification_dispatcher(pool: PgPool, url: String, secret: String) {
    let target = WebhookTarget { url, secret };
    info!(url=%target.url, "notification_dispatcher: started");
    let client = reqwest::Client::new();
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "coalition-api".to_string());

    loop {
        match dispatch_one(&pool, &client, &target, &hostname).await {
            Ok(true) => {}
            Ok(false) => tokio::time::sleep(POLL_INTERVAL).await,
            Err(e) => {
                error!("notification_dispatcher: error: {e:?}");
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

/// Returns `false` when nothing was due.
async fn dispatch_one(
    pool: &PgPool,
    client: &reqwest::Client,
    target: &WebhookTarget,
    hostname: &str,
) -> Result<bool> {
    let Some(row) = claim_next(pool, hostname).await? else {
        return Ok(false);
    };

    let next = match serde_json::from_value::<Audience>(row.audience.clone()) {
        Err(e) => OutboxTransition::Failed {
            attempts: row.attempts + 1,
            error: format!("unreadable audience: {e}"),
        },
        Ok(audience) => match skip_reason(&audience) {
            Some(reason) => OutboxTransition::Skipped { reason },
            None => transition(row.attempts, send(client, target, &row, &audience).await),
        },
    };

    apply(pool, row.id, &next).await?;
    match &next {
        OutboxTransition::Delivered => info!(id=%row.id, kind=%row.kind, "notification: delivered"),
        OutboxTransition::Retry { attempts, delay_secs, error } => {
            warn!(id=%row.id, kind=%row.kind, attempts, delay_secs, error=%error, "notification: will retry")
        }
        OutboxTransition::Failed { attempts, error } => {
            warn!(id=%row.id, kind=%row.kind, attempts, error=%error, "notification: gave up")
        }
        OutboxTransition::Skipped { reason } => info!(id=%row.id, kind=%row.kind, reason=%reason, "notification: skipped"),
    }
    Ok(true)
}

// Claim and lease in one statement; expired leases are claimable again.
async fn claim_next(pool: &PgPool, hostname: &str) -> Result<Option<OutboxRow>> {
    let row = sqlx::query_as::<_, OutboxRow>(
        r#"
        UPDATE notification_outbox
        SET locked_by = $1, locked_until = NOW() + make_interval(secs => $2), updated_at = NOW()
        WHERE id = (
            SELECT id FROM notification_outbox
            WHERE status IN ('pending', 'retrying')
              AND next_attempt_at <= NOW()
              AND (locked_until IS NULL OR locked_until < NOW())
            ORDER BY next_attempt_at ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING id, kind, audience, event, attempts
        "#,
    )
    .bind(hostname)
    .bind(LEASE_SECS)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn send(
    client: &reqwest::Client,
    target: &WebhookTarget,
    row: &OutboxRow,
    audience: &Audience,
) -> DeliveryOutcome {
    let body = row.event.to_string();
    let ts = Utc::now().timestamp();
    let signature = match sign_payload(&target.secret, ts, &body) {
        Ok(s) => s,
        Err(e) => return DeliveryOutcome::Rejected(e.to_string()),
    };

    let resp = client
        .post(&target.url)
        .header("Content-Type", "application/json")
        .header("Idempotency-Key", row.id.to_string())
        .header("X-Notification-Kind", row.kind.as_str())
        .header("X-Notification-Audience", audience_header(audience))
        .header("X-Timestamp", ts.to_string())
        .header("X-Signature", signature)
        .body(body)
        .send()
        .await;

    match resp {
        Ok(r) => DeliveryOutcome::from_status(r.status()),
        Err(e) => DeliveryOutcome::Retryable(e.to_string()),
    }
}

async fn apply(pool: &PgPool, id: Uuid, next: &OutboxTransition) -> Result<()> {
    let query = match next {
        OutboxTransition::Delivered => sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'delivered', delivered_at = NOW(), attempts = attempts + 1,
                locked_by = NULL, locked_until = NULL, last_error = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id),
        OutboxTransition::Retry { attempts, delay_secs, error } => sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'retrying', attempts = $2, next_attempt_at = NOW() + make_interval(secs => $3),
                locked_by = NULL, locked_until = NULL, last_error = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(*attempts)
        .bind(*delay_secs as f64)
        .bind(error.as_str()),
        OutboxTransition::Failed { attempts, error } => sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'failed', attempts = $2,
                locked_by = NULL, locked_until = NULL, last_error = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(*attempts)
        .bind(error.as_str()),
        OutboxTransition::Skipped { reason } => sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'skipped', locked_by = NULL, locked_until = NULL, last_error = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(reason.as_str()),
    };
    query.execute(pool).await?;
    Ok(())
}

/// 2^attempts seconds, capped at one hour.
fn backoff_secs(attempts: i32) -> i64 {
    2i64.pow(attempts.clamp(0, 12) as u32).min(MAX_BACKOFF_SECS)
}

/// Hex HMAC-SHA256 over `"<ts>.<body>"`.
pub fn sign_payload(secret: &str, ts: i64, body: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("invalid webhook secret: {e}"))?;
    mac.update(format!("{ts}.{body}").as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
