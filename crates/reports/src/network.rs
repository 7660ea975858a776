use analytics::narrative::health_index;
use analytics::{NetworkInsights, PerformanceBand, PerformerSummary, ReportStatistics};

use crate::document::{Cell, ReportContext, ReportDocument, Section, Stat, Table, Tone};

pub const NETWORK_REPORT_TITLE: &str = "Network Performance Report";

const NO_DATA_TITLE: &str = "No data available";
const NO_EVALUATIONS_GUIDANCE: &str =
    "No evaluations have been recorded for associates in this network. Once evaluations are submitted, this section will summarize them.";

/// Build the network-wide document. An empty scope still yields every
/// section, each carrying a placeholder notice.
pub fn network_document(
    stats: &ReportStatistics,
    insights: &NetworkInsights,
    ctx: &ReportContext,
) -> ReportDocument {
    let sections = if stats.is_empty() {
        empty_sections(insights)
    } else {
        vec![
            summary_section(stats, insights),
            distribution_section(stats, insights),
            quarterly_section(stats, insights),
            performers_section("Top Performers", &stats.top_performers),
            performers_section("Associates Needing Support", &stats.bottom_performers),
            category_section(stats, insights),
            Section::new("Network Health").paragraph(&insights.network_health),
            Section::new("Recommendations").bullets(insights.recommendations.clone()),
        ]
    };

    ReportDocument {
        title: NETWORK_REPORT_TITLE.to_string(),
        subtitle: Some(format!("Associate evaluations, {}", stats.generated_at.format("%Y"))),
        organization: ctx.organization.clone(),
        generated_at: stats.generated_at,
        page: ctx.page,
        sections,
    }
}

fn summary_section(stats: &ReportStatistics, insights: &NetworkInsights) -> Section {
    let well = stats.band_percentage(PerformanceBand::Excellent) + stats.band_percentage(PerformanceBand::Good);
    Section::new("Executive Summary")
        .stats(vec![
            Stat::new("Total Evaluations", stats.total_evaluations.to_string(), Tone::Neutral),
            Stat::new("Associates Evaluated", stats.distinct_subjects.to_string(), Tone::Neutral),
            Stat::new("Average Score", format!("{:.2}", stats.average_score), Tone::for_score(stats.average_score)),
            Stat::new("Health Index", format!("{:.0}", health_index(stats.average_score, well)), Tone::Neutral),
        ])
        .paragraph(&insights.overall_performance)
}

fn distribution_section(stats: &ReportStatistics, insights: &NetworkInsights) -> Section {
    let table = PerformanceBand::ALL.iter().fold(
        Table::new(["Band", "Score Range", "Evaluations", "Share"]),
        |t, band| {
            let tone = Tone::from(*band);
            t.row(vec![
                Cell::toned(band.label(), tone),
                Cell::plain(band.range_label()),
                Cell::plain(stats.distribution.count(*band).to_string()),
                Cell::plain(format!("{:.1}%", stats.band_percentage(*band))),
            ])
        },
    );

    Section::new("Performance Distribution")
        .table(table)
        .paragraph(&insights.distribution_analysis)
        .paragraph(&insights.excellence_indicators)
        .paragraph(&insights.improvement_needed)
}

fn quarterly_section(stats: &ReportStatistics, insights: &NetworkInsights) -> Section {
    let table = stats.quarterly.iter().fold(
        Table::new(["Quarter", "Evaluations", "Average Score"]),
        |t, q| {
            let avg = if q.evaluation_count == 0 {
                Cell::plain("-")
            } else {
                Cell::score(q.average_score)
            };
            t.row(vec![Cell::plain(&q.label), Cell::plain(q.evaluation_count.to_string()), avg])
        },
    );
    Section::new("Quarterly Trend").table(table).paragraph(&insights.trend_analysis)
}

pub(crate) fn performers_section(heading: &str, performers: &[PerformerSummary]) -> Section {
    let table = performers.iter().enumerate().fold(
        Table::new(["#", "Associate", "Organization", "Latest", "Average", "Evaluations", "Trend"]),
        |t, (i, p)| {
            t.row(vec![
                Cell::plain((i + 1).to_string()),
                Cell::plain(&p.name),
                Cell::plain(p.organization.as_deref().unwrap_or("-")),
                Cell::score(p.latest_score),
                Cell::score(p.average_score),
                Cell::plain(p.evaluation_count.to_string()),
                Cell::plain(p.trend.label()),
            ])
        },
    );
    Section::new(heading).table(table)
}

pub(crate) fn category_table(stats: &ReportStatistics) -> Table {
    stats.category_averages.iter().fold(
        Table::new(["Category", "Average", "Evaluations Scored"]),
        |t, c| t.row(vec![Cell::plain(c.name), Cell::score(c.average), Cell::plain(c.records.to_string())]),
    )
}

fn category_section(stats: &ReportStatistics, insights: &NetworkInsights) -> Section {
    let section = Section::new("Category Performance");
    let section = if stats.category_averages.is_empty() {
        section.notice(NO_DATA_TITLE, "None of the evaluations in scope include category scores.")
    } else {
        section.table(category_table(stats))
    };
    section
        .paragraph(&insights.strengths)
        .paragraph(&insights.improvement_areas)
}

fn empty_sections(insights: &NetworkInsights) -> Vec<Section> {
    [
        "Executive Summary",
        "Performance Distribution",
        "Quarterly Trend",
        "Top Performers",
        "Associates Needing Support",
        "Category Performance",
        "Network Health",
    ]
    .into_iter()
    .map(|heading| Section::new(heading).notice(NO_DATA_TITLE, NO_EVALUATIONS_GUIDANCE))
    .chain(std::iter::once(
        Section::new("Recommendations").bullets(insights.recommendations.clone()),
    ))
    .collect()
}
