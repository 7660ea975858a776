use analytics::{aggregate, network_insights, subject_insights, subject_report};
use chrono::{Duration, Utc};
use evaluations::{EvaluationRecord, Subject};
use reports::{network_document, render_html, subject_document, PageSetup, PageSize, ReportContext};
use serde_json::json;
use uuid::Uuid;

fn subject(name: &str, organization: &str) -> Subject {
    Subject {
        id: Uuid::new_v4(),
        name: name.to_string(),
        organization: Some(organization.to_string()),
        role: "associate".to_string(),
        leader_type: None,
    }
}

fn main() -> std::io::Result<()> {
    println!("=== Coalition Report Demo ===\n");

    let now = Utc::now();
    let roster = [
        (subject("Riley Chen", "Harbor CERT"), [3.8, 3.6, 3.9]),
        (subject("Morgan Lee", "Eastside Mutual Aid"), [2.4, 2.9, 3.1]),
        (subject("Sam Ortiz", "Harbor CERT"), [1.9, 1.4, 1.2]),
        (subject("Jordan Patel", "Northgate Neighbors"), [3.0, 2.7, 2.8]),
    ];

    // --- Seed ---
    let mut records = Vec::new();
    for (s, scores) in &roster {
        for (i, score) in scores.iter().enumerate() {
            records.push(EvaluationRecord {
                id: Uuid::new_v4(),
                subject_id: s.id,
                subject_name: s.name.clone(),
                subject_organization: s.organization.clone(),
                created_at: now - Duration::days(120 - 45 * i as i64),
                total_score: *score,
                category_scores: json!({
                    "leadership": { "initiative": score, "delegation": (score - 0.3_f64).max(0.0) },
                    "communication": [score, 3.0],
                    "preparedness": "3",
                    "reliability": { "attendance": 4 },
                }),
                notes: Some(format!("Quarterly drill review #{}", i + 1)),
            });
        }
    }
    records.sort_by_key(|r| r.created_at);
    println!("Seeded {} evaluations for {} associates", records.len(), roster.len());

    let ctx = ReportContext {
        organization: "Bayview Preparedness Coalition".to_string(),
        page: PageSetup::new(PageSize::Legal),
    };

    // --- Network report ---
    let stats = aggregate(&records, now);
    let insights = network_insights(&stats);
    println!("\n--- Network ---");
    println!("Average score: {:.2}", stats.average_score);
    for p in &stats.top_performers {
        println!("  top    {:<14} {:.2}", p.name, p.latest_score);
    }
    for p in &stats.bottom_performers {
        println!("  bottom {:<14} {:.2}", p.name, p.latest_score);
    }
    println!("Health: {}", insights.network_health);

    let html = render_html(&network_document(&stats, &insights, &ctx));
    std::fs::write("network-report.html", &html)?;
    println!("Wrote network-report.html ({} bytes)", html.len());

    // --- Associate report ---
    let (focus, _) = &roster[1];
    let own: Vec<EvaluationRecord> = records
        .iter()
        .filter(|r| r.subject_id == focus.id)
        .cloned()
        .collect();
    let report = subject_report(focus.clone(), &own, now);
    let insights = subject_insights(&report);
    println!("\n--- {} ---", focus.name);
    println!("Trend: {}", report.trend.label());
    println!("{}", insights.overall_performance);

    let html = render_html(&subject_document(&report, &insights, &ctx));
    std::fs::write("associate-report.html", &html)?;
    println!("Wrote associate-report.html ({} bytes)", html.len());

    Ok(())
}
