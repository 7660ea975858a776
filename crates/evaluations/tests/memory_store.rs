use chrono::{TimeZone, Utc};
use evaluations::{
    EvaluationRecord, EvaluationStore, InMemoryStore, NewEvaluation, RoleFilter, StoreError, Subject,
};
use serde_json::json;
use uuid::Uuid;

fn subject(name: &str, role: &str) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        organization: Some("Harbor County CERT".to_string()),
        role: role.to_string(),
        leader_type: None,
    }
}

fn record(s: &Subject, score: f64, month: u32) -> EvaluationRecord {
    EvaluationRecord {
        id: Uuid::new_v4(),
        subject_id: s.id,
        subject_name: s.name.clone(),
        subject_organization: s.organization.clone(),
        created_at: Utc.with_ymd_and_hms(2026, month, 1, 12, 0, 0).unwrap(),
        total_score: score,
        category_scores: json!({}),
        notes: None,
    }
}

#[tokio::test]
async fn test_role_scope_excludes_other_roles() {
    let store = InMemoryStore::new();
    let associate = subject("Avery", "associate");
    let citizen = subject("Blake", "citizen");
    store.add_subject(associate.clone());
    store.add_subject(citizen.clone());
    store.add_record(record(&associate, 3.0, 2));
    store.add_record(record(&citizen, 1.0, 3));

    let scoped = store.evaluations_for_role(&RoleFilter::new("associate")).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].subject_id, associate.id);
}

#[tokio::test]
async fn test_records_come_back_oldest_first() {
    let store = InMemoryStore::new();
    let s = subject("Avery", "associate");
    store.add_subject(s.clone());
    store.add_record(record(&s, 3.0, 9));
    store.add_record(record(&s, 2.0, 1));

    let recs = store.evaluations_for_subject(s.id).await.unwrap();
    assert_eq!(recs.iter().map(|r| r.total_score).collect::<Vec<_>>(), vec![2.0, 3.0]);
}

#[tokio::test]
async fn test_insert_validates_score_and_subject() {
    let store = InMemoryStore::new();
    let s = subject("Avery", "associate");
    store.add_subject(s.clone());

    let too_high = NewEvaluation {
        subject_id: s.id,
        total_score: 4.5,
        category_scores: json!({}),
        notes: None,
    };
    assert!(matches!(store.insert_evaluation(too_high).await, Err(StoreError::Invalid(_))));

    let unknown = NewEvaluation {
        subject_id: Uuid::new_v4(),
        total_score: 3.0,
        category_scores: json!({}),
        notes: None,
    };
    assert!(matches!(
        store.insert_evaluation(unknown).await,
        Err(StoreError::SubjectNotFound(_))
    ));

    let ok = NewEvaluation {
        subject_id: s.id,
        total_score: 3.25,
        category_scores: json!({"leadership": [3, 4]}),
        notes: Some("Ran the shelter drill".to_string()),
    };
    let rec = store.insert_evaluation(ok).await.unwrap();
    assert_eq!(rec.subject_name, "Avery");
    assert_eq!(store.evaluations_for_subject(s.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_rejects_malformed_categories() {
    let store = InMemoryStore::new();
    let s = subject("Avery", "associate");
    store.add_subject(s.clone());

    let bad = NewEvaluation {
        subject_id: s.id,
        total_score: 2.0,
        category_scores: json!([1, 2, 3]),
        notes: None,
    };
    assert!(matches!(store.insert_evaluation(bad).await, Err(StoreError::Invalid(_))));
}
