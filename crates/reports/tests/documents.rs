use analytics::{aggregate, network_insights, subject_insights, subject_report};
use chrono::{TimeZone, Utc};
use evaluations::{EvaluationRecord, Subject};
use reports::{
    network_document, render_html, subject_document, Block, PageSetup, PageSize, ReportContext,
};
use serde_json::json;
use uuid::Uuid;

fn ctx() -> ReportContext {
    ReportContext {
        organization: "Tri-County Preparedness Coalition".to_string(),
        page: PageSetup::new(PageSize::Legal),
    }
}

fn subject(name: &str) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        organization: Some("Northside CERT".to_string()),
        role: "associate".to_string(),
        leader_type: None,
    }
}

fn record(s: &Subject, score: f64, month: u32, notes: Option<&str>) -> EvaluationRecord {
    EvaluationRecord {
        id: Uuid::new_v4(),
        subject_id: s.id,
        subject_name: s.name.clone(),
        subject_organization: s.organization.clone(),
        created_at: Utc.with_ymd_and_hms(2026, month, 5, 10, 0, 0).unwrap(),
        total_score: score,
        category_scores: json!({
            "leadership": {"initiative": score, "delegation": score},
            "reliability": [score],
        }),
        notes: notes.map(str::to_string),
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

#[test]
fn test_empty_network_document_has_placeholders() {
    let stats = aggregate(&[], now());
    let insights = network_insights(&stats);
    let doc = network_document(&stats, &insights, &ctx());

    assert!(!doc.sections.is_empty());
    for section in doc.sections.iter().filter(|s| s.heading != "Recommendations") {
        assert!(
            matches!(section.blocks.as_slice(), [Block::Notice { .. }]),
            "section {} should only carry a notice",
            section.heading
        );
    }

    let html = render_html(&doc);
    assert!(!html.is_empty());
    assert!(html.contains("No data available"));
    assert!(!html.contains("NaN"));
}

#[test]
fn test_network_document_sections() {
    let a = subject("Alex Kim");
    let b = subject("Morgan <Lee>");
    let records = vec![
        record(&a, 3.8, 2, None),
        record(&b, 1.2, 5, None),
        record(&a, 3.6, 8, None),
    ];
    let stats = aggregate(&records, now());
    let insights = network_insights(&stats);
    let doc = network_document(&stats, &insights, &ctx());

    let headings: Vec<_> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec![
            "Executive Summary",
            "Performance Distribution",
            "Quarterly Trend",
            "Top Performers",
            "Associates Needing Support",
            "Category Performance",
            "Network Health",
            "Recommendations",
        ]
    );

    let Some(Block::Table(top)) = doc.section("Top Performers").and_then(|s| s.blocks.first()) else {
        panic!("top performers table missing");
    };
    assert_eq!(top.rows.len(), 2);
    assert_eq!(top.rows[0][1].text, "Alex Kim");

    let html = render_html(&doc);
    assert!(html.contains("Morgan &lt;Lee&gt;"));
    assert!(html.contains("size: legal portrait"));
}

#[test]
fn test_subject_document() {
    let s = subject("Jamie Ortiz");
    let records = vec![
        record(&s, 2.0, 1, Some("Missed two drills")),
        record(&s, 3.0, 7, Some("Led the shelter setup")),
    ];
    let report = subject_report(s, &records, now());
    let insights = subject_insights(&report);
    let doc = subject_document(&report, &insights, &ctx());

    assert_eq!(doc.subtitle.as_deref(), Some("Jamie Ortiz (Northside CERT)"));
    let Some(Block::Table(history)) = doc.section("Evaluation History").and_then(|s| s.blocks.first()) else {
        panic!("history table missing");
    };
    assert_eq!(history.rows.len(), 2);
    assert_eq!(history.rows[0][4].text, "Led the shelter setup");
    assert_eq!(history.rows[0][1].text, "Q3");

    let html = render_html(&doc);
    assert!(html.contains("Improving"));
}

#[test]
fn test_subject_document_without_evaluations() {
    let s = subject("New Volunteer");
    let report = subject_report(s, &[], now());
    let insights = subject_insights(&report);
    let doc = subject_document(&report, &insights, &ctx());
    assert!(doc.section("Evaluation History").is_none());
    assert!(render_html(&doc).contains("has no recorded evaluations yet"));
}
