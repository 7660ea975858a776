use analytics::{quarter_of, PerformanceBand, SubjectInsights, SubjectReport};

use crate::document::{Cell, ReportContext, ReportDocument, Section, Stat, Table, Tone};
use crate::network::category_table;

pub const SUBJECT_REPORT_TITLE: &str = "Individual Performance Report";

// Long notes are cut so a single row cannot push the table off the page.
const NOTE_PREVIEW_CHARS: usize = 160;

pub fn subject_document(
    report: &SubjectReport,
    insights: &SubjectInsights,
    ctx: &ReportContext,
) -> ReportDocument {
    let subject = &report.subject;
    let stats = &report.statistics;

    let profile = Section::new("Associate Profile").stats(vec![
        Stat::new("Associate", &subject.name, Tone::Neutral),
        Stat::new("Organization", subject.organization.as_deref().unwrap_or("-"), Tone::Neutral),
        Stat::new("Evaluations", stats.total_evaluations.to_string(), Tone::Neutral),
        Stat::new("Trend", report.trend.label(), Tone::Neutral),
    ]);

    let sections = if stats.is_empty() {
        vec![
            profile,
            Section::new("Performance Summary").notice(
                "No data available",
                format!("{} has no recorded evaluations yet.", subject.name),
            ),
            Section::new("Recommendations").bullets(insights.recommendations.clone()),
        ]
    } else {
        let latest = report.latest_score().unwrap_or_default();
        let profile = profile.stats(vec![
            Stat::new("Average Score", format!("{:.2}", stats.average_score), Tone::for_score(stats.average_score)),
            Stat::new("Latest Score", format!("{latest:.2}"), Tone::for_score(latest)),
            Stat::new("Current Band", PerformanceBand::for_score(latest).label(), Tone::for_score(latest)),
        ]);

        let quarterly = stats.quarterly.iter().fold(
            Table::new(["Quarter", "Evaluations", "Average Score"]),
            |t, q| {
                let avg = if q.evaluation_count == 0 { Cell::plain("-") } else { Cell::score(q.average_score) };
                t.row(vec![Cell::plain(&q.label), Cell::plain(q.evaluation_count.to_string()), avg])
            },
        );

        let categories = Section::new("Category Performance");
        let categories = if stats.category_averages.is_empty() {
            categories.notice("No data available", "No category scores have been recorded for this associate.")
        } else {
            categories.table(category_table(stats))
        };
        let categories = categories
            .paragraph(&insights.strengths)
            .paragraph(&insights.improvement_areas);

        vec![
            profile,
            Section::new("Performance Summary")
                .paragraph(&insights.overall_performance)
                .paragraph(&insights.trend_analysis),
            Section::new("Quarterly Trend").table(quarterly),
            categories,
            history_section(report),
            Section::new("Recommendations").bullets(insights.recommendations.clone()),
        ]
    };

    ReportDocument {
        title: SUBJECT_REPORT_TITLE.to_string(),
        subtitle: Some(match &subject.organization {
            Some(org) => format!("{} ({org})", subject.name),
            None => subject.name.clone(),
        }),
        organization: ctx.organization.clone(),
        generated_at: stats.generated_at,
        page: ctx.page,
        sections,
    }
}

fn history_section(report: &SubjectReport) -> Section {
    let table = report.history.iter().fold(
        Table::new(["Date", "Quarter", "Score", "Band", "Notes"]),
        |t, r| {
            let day = r.created_at.date_naive();
            let band = PerformanceBand::for_score(r.total_score);
            t.row(vec![
                Cell::plain(day.format("%b %d, %Y").to_string()),
                Cell::plain(format!("Q{}", quarter_of(day))),
                Cell::score(r.total_score),
                Cell::toned(band.label(), band.into()),
                Cell::plain(r.notes.as_deref().map(preview).unwrap_or_default()),
            ])
        },
    );
    Section::new("Evaluation History").table(table)
}

fn preview(notes: &str) -> String {
    let trimmed = notes.trim();
    if trimmed.chars().count() <= NOTE_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(NOTE_PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}
