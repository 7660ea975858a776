use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use coalition_api::config::ReportSettings;
use coalition_api::notifier::{Audience, Notification, Notifier};
use coalition_api::rasterizer::{HtmlRasterizer, Rasterizer, RasterizerInfo, RenderedDocument};
use coalition_api::state::AppState;
use evaluations::{EvaluationRecord, InMemoryStore, RoleFilter, Subject};
use reports::{PageSetup, PageSize, ReportContext};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(Audience, Notification)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, audience: &Audience, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push((audience.clone(), notification.clone()));
        Ok(())
    }
}

struct FailingRasterizer;

#[async_trait]
impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _html: String, _page: PageSetup) -> Result<RenderedDocument> {
        anyhow::bail!("engine crashed")
    }

    fn info(&self) -> RasterizerInfo {
        RasterizerInfo { name: "failing".into(), content_type: "application/pdf".into() }
    }
}

fn settings() -> ReportSettings {
    ReportSettings {
        context: ReportContext {
            organization: "Bayview Preparedness Coalition".to_string(),
            page: PageSetup::new(PageSize::Legal),
        },
        filter: RoleFilter::new("associate"),
    }
}

fn subject(name: &str, role: &str) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        organization: Some("Bayview CERT".to_string()),
        role: role.to_string(),
        leader_type: None,
    }
}

fn record(s: &Subject, score: f64, days_ago: i64) -> EvaluationRecord {
    EvaluationRecord {
        id: Uuid::new_v4(),
        subject_id: s.id,
        subject_name: s.name.clone(),
        subject_organization: s.organization.clone(),
        created_at: Utc::now() - Duration::days(days_ago),
        total_score: score,
        category_scores: json!({"communication": [score]}),
        notes: None,
    }
}

struct Harness {
    app: Router,
    store: Arc<InMemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness_with(rasterizer: Arc<dyn Rasterizer>) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(store.clone(), rasterizer, notifier.clone(), settings());
    Harness {
        app: coalition_api::router(Arc::new(state)),
        store,
        notifier,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(HtmlRasterizer))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, body, disposition)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body, _) = get(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_network_report_with_no_evaluations() {
    let h = harness();
    let (status, body, disposition) = get(&h.app, "/reports/network").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_empty());
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("No data available"));
    assert!(disposition.unwrap().starts_with("attachment; filename=\"network-performance-report-"));
}

#[tokio::test]
async fn test_network_report_only_covers_filtered_role() {
    let h = harness();
    let associate = subject("Riley Chen", "associate");
    let citizen = subject("Pat Doe", "citizen");
    h.store.add_subject(associate.clone());
    h.store.add_subject(citizen.clone());
    h.store.add_record(record(&associate, 3.7, 3));
    h.store.add_record(record(&citizen, 1.0, 2));

    let (status, body, _) = get(&h.app, "/analytics/network").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["statistics"]["total_evaluations"], 1);
    assert_eq!(v["statistics"]["top_performers"][0]["name"], "Riley Chen");
    assert_eq!(v["statistics"]["quarterly"].as_array().unwrap().len(), 4);

    let (status, body, _) = get(&h.app, "/reports/network").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Riley Chen"));
    assert!(!html.contains("Pat Doe"));
}

#[tokio::test]
async fn test_subject_report_not_found_cases() {
    let h = harness();
    let citizen = subject("Pat Doe", "citizen");
    h.store.add_subject(citizen.clone());

    let (status, _, _) = get(&h.app, &format!("/reports/subjects/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body, _) = get(&h.app, &format!("/reports/subjects/{}", citizen.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"], "Subject not found");
}

#[tokio::test]
async fn test_subject_report_and_analytics() {
    let h = harness();
    let s = subject("Taylor Brooks", "associate");
    h.store.add_subject(s.clone());
    h.store.add_record(record(&s, 4.0, 10));
    h.store.add_record(record(&s, 1.0, 1));

    let (status, body, disposition) = get(&h.app, &format!("/reports/subjects/{}", s.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Taylor Brooks"));
    assert!(disposition.unwrap().contains(&s.id.simple().to_string()));

    let (_, body, _) = get(&h.app, &format!("/analytics/subjects/{}", s.id)).await;
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["report"]["statistics"]["average_score"], 2.5);
    assert_eq!(v["report"]["latest"]["total_score"], 1.0);
    assert_eq!(v["report"]["trend"], "declining");
}

#[tokio::test]
async fn test_rendering_failure_is_generic_500() {
    let h = harness_with(Arc::new(FailingRasterizer));
    let (status, body, disposition) = get(&h.app, "/reports/network").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(disposition.is_none());
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"], "Internal server error");
}

#[tokio::test]
async fn test_post_evaluation_records_and_notifies() {
    let h = harness();
    let s = subject("Casey Park", "associate");
    h.store.add_subject(s.clone());

    let (status, v) = post_json(
        &h.app,
        "/evaluations",
        json!({
            "subject_id": s.id,
            "total_score": 3.4,
            "category_scores": {"leadership": {"initiative": 3, "delegation": 4}},
            "notes": "Coordinated sandbag distribution",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["subject_name"], "Casey Park");

    let sent = h.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Audience::Subjects(vec![s.id]));
    assert_eq!(sent[0].1.kind, "evaluation_recorded");

    let (status, body, _) = get(&h.app, &format!("/subjects/{}/evaluations", s.id)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_evaluation_rejects_bad_input() {
    let h = harness();
    let s = subject("Casey Park", "associate");
    let citizen = subject("Pat Doe", "citizen");
    h.store.add_subject(s.clone());
    h.store.add_subject(citizen.clone());

    let (status, _) = post_json(&h.app, "/evaluations", json!({"subject_id": s.id, "total_score": 5.0})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(
        &h.app,
        "/evaluations",
        json!({"subject_id": s.id, "total_score": 3.0, "category_scores": "not json"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(&h.app, "/evaluations", json!({"subject_id": citizen.id, "total_score": 3.0})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(h.notifier.sent.lock().unwrap().is_empty());
}
