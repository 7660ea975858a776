//! Canned narrative text selected by threshold ladders.
//!
//! Every function here is pure and total: the last branch of each ladder
//! covers whatever the earlier branches did not.

use serde::Serialize;

use crate::types::{CategoryAverage, PerformanceBand, ReportStatistics, SubjectReport, Trend};

const NO_CATEGORY_DATA: &str =
    "Category-level data is not yet available. Category insights will appear once evaluations include category scores.";

pub const NO_DATA: &str = "No evaluation data is available for this period.";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkInsights {
    pub overall_performance: String,
    pub distribution_analysis: String,
    pub excellence_indicators: String,
    pub improvement_needed: String,
    pub network_health: String,
    pub trend_analysis: String,
    pub strengths: String,
    pub improvement_areas: String,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectInsights {
    pub overall_performance: String,
    pub trend_analysis: String,
    pub strengths: String,
    pub improvement_areas: String,
    pub recommendations: Vec<String>,
}

pub fn network_insights(stats: &ReportStatistics) -> NetworkInsights {
    if stats.is_empty() {
        return NetworkInsights {
            overall_performance: NO_DATA.to_string(),
            distribution_analysis: NO_DATA.to_string(),
            excellence_indicators: NO_DATA.to_string(),
            improvement_needed: NO_DATA.to_string(),
            network_health: NO_DATA.to_string(),
            trend_analysis: NO_DATA.to_string(),
            strengths: NO_CATEGORY_DATA.to_string(),
            improvement_areas: NO_CATEGORY_DATA.to_string(),
            recommendations: vec![
                "Begin recording associate evaluations so the network can be assessed.".to_string(),
            ],
        };
    }

    let excellent = stats.band_percentage(PerformanceBand::Excellent);
    let good = stats.band_percentage(PerformanceBand::Good);
    let fair = stats.band_percentage(PerformanceBand::Fair);
    let poor = stats.band_percentage(PerformanceBand::Poor);

    NetworkInsights {
        overall_performance: overall_performance(stats.average_score, stats.total_evaluations),
        distribution_analysis: distribution_analysis(excellent + good),
        excellence_indicators: excellence_indicators(excellent),
        improvement_needed: improvement_needed(fair + poor),
        network_health: network_health(health_index(stats.average_score, excellent + good)),
        trend_analysis: trend_analysis(quarter_delta(stats)),
        strengths: strengths(stats.strongest_category()),
        improvement_areas: improvement_areas(stats.weakest_category()),
        recommendations: network_recommendations(stats),
    }
}

pub fn overall_performance(mean: f64, evaluations: usize) -> String {
    let plural = if evaluations == 1 { "evaluation" } else { "evaluations" };
    if mean >= 3.5 {
        format!(
            "The network demonstrates exceptional performance with an average score of {mean:.2} across {evaluations} {plural}. Associates consistently exceed expectations in their preparedness roles."
        )
    } else if mean >= 3.0 {
        format!(
            "The network shows strong performance with an average score of {mean:.2} across {evaluations} {plural}. Most associates meet or exceed expectations."
        )
    } else if mean >= 2.5 {
        format!(
            "The network shows moderate performance with an average score of {mean:.2} across {evaluations} {plural}. There is clear room for growth in several areas."
        )
    } else {
        format!(
            "Network performance is below expectations with an average score of {mean:.2} across {evaluations} {plural}. Focused support and training are needed."
        )
    }
}

/// `well_pct`: share of evaluations in the excellent or good bands.
pub fn distribution_analysis(well_pct: f64) -> String {
    if well_pct >= 75.0 {
        format!("{well_pct:.1}% of evaluations fall in the excellent or good bands, reflecting broad strength across the network.")
    } else if well_pct >= 50.0 {
        format!("{well_pct:.1}% of evaluations fall in the excellent or good bands. Performance is balanced, with a meaningful group still developing.")
    } else if well_pct >= 25.0 {
        format!("Only {well_pct:.1}% of evaluations fall in the excellent or good bands. Performance is uneven across the network.")
    } else {
        format!("Just {well_pct:.1}% of evaluations fall in the excellent or good bands. Most results are concentrated in the lower bands.")
    }
}

pub fn excellence_indicators(excellent_pct: f64) -> String {
    if excellent_pct >= 30.0 {
        format!("{excellent_pct:.1}% of evaluations are rated excellent. The network has a deep bench of high performers who can mentor others.")
    } else if excellent_pct >= 15.0 {
        format!("{excellent_pct:.1}% of evaluations are rated excellent, a solid core of high performers.")
    } else if excellent_pct > 0.0 {
        format!("{excellent_pct:.1}% of evaluations are rated excellent. High performance exists but is not yet widespread.")
    } else {
        "No evaluations are currently rated excellent.".to_string()
    }
}

/// `low_pct`: share of evaluations in the fair or poor bands.
pub fn improvement_needed(low_pct: f64) -> String {
    if low_pct >= 40.0 {
        format!("{low_pct:.1}% of evaluations are fair or poor. Urgent, network-wide intervention is recommended.")
    } else if low_pct >= 20.0 {
        format!("{low_pct:.1}% of evaluations are fair or poor. Targeted coaching should be arranged for these associates.")
    } else if low_pct > 0.0 {
        format!("{low_pct:.1}% of evaluations are fair or poor. These are isolated cases that can be handled individually.")
    } else {
        "No evaluations fall in the fair or poor bands.".to_string()
    }
}

/// Blend of mean score (as a share of 4.0) and the excellent+good share.
pub fn health_index(mean: f64, well_pct: f64) -> f64 {
    0.6 * (mean / 4.0 * 100.0) + 0.4 * well_pct
}

pub fn network_health(index: f64) -> String {
    if index >= 80.0 {
        format!("Network health is robust (index {index:.0}/100). The coalition is well positioned to respond to emergencies.")
    } else if index >= 65.0 {
        format!("Network health is good (index {index:.0}/100). Core capabilities are in place with some gaps to close.")
    } else if index >= 50.0 {
        format!("Network health is developing (index {index:.0}/100). Readiness depends on a limited group of strong associates.")
    } else {
        format!("Network health is at risk (index {index:.0}/100). Response capacity may be insufficient without intervention.")
    }
}

/// Change between the last two quarters that have data, if there are two.
pub fn quarter_delta(stats: &ReportStatistics) -> Option<f64> {
    let populated: Vec<_> = stats.quarterly.iter().filter(|q| q.evaluation_count > 0).collect();
    match populated.as_slice() {
        // rounded to the printed precision so a 0.20 move is not read as 0.1999...
        [.., prev, last] => Some(((last.average_score - prev.average_score) * 100.0).round() / 100.0),
        _ => None,
    }
}

pub fn trend_analysis(delta: Option<f64>) -> String {
    match delta {
        Some(d) if d >= 0.2 => format!("Scores are improving: the most recent quarter is up {d:.2} points on the one before."),
        Some(d) if d <= -0.2 => format!("Scores are declining: the most recent quarter is down {:.2} points on the one before.", d.abs()),
        Some(d) => format!("Scores are steady quarter over quarter (change of {d:+.2})."),
        None => "There is not yet enough quarterly history this year to identify a trend.".to_string(),
    }
}

pub fn strengths(best: Option<&CategoryAverage>) -> String {
    let Some(c) = best else {
        return NO_CATEGORY_DATA.to_string();
    };
    let (name, avg) = (c.name, c.average);
    if avg >= 3.5 {
        format!("{name} is an outstanding strength with an average of {avg:.2}.")
    } else if avg >= 3.0 {
        format!("{name} is the strongest category with a solid average of {avg:.2}.")
    } else if avg >= 2.5 {
        format!("{name} leads the categories with an average of {avg:.2}, though no category is yet a clear strength.")
    } else {
        format!("No category stands out as a strength; the highest is {name} at {avg:.2}.")
    }
}

pub fn improvement_areas(worst: Option<&CategoryAverage>) -> String {
    let Some(c) = worst else {
        return NO_CATEGORY_DATA.to_string();
    };
    let (name, avg) = (c.name, c.average);
    if avg < 2.0 {
        format!("{name} needs significant improvement with an average of {avg:.2}. Prioritize training here.")
    } else if avg < 2.5 {
        format!("{name} is below target with an average of {avg:.2} and should be a development focus.")
    } else if avg < 3.0 {
        format!("{name} is the weakest category at {avg:.2}; modest gains here would lift overall results.")
    } else {
        format!("No significant gaps: even the lowest category, {name}, averages {avg:.2}.")
    }
}

pub fn network_recommendations(stats: &ReportStatistics) -> Vec<String> {
    let mut out = Vec::new();

    if stats.band_percentage(PerformanceBand::Poor) >= 20.0 {
        out.push("Establish a structured support plan for associates rated poor, with check-ins every 30 days.".to_string());
    }
    if stats.band_percentage(PerformanceBand::Excellent) >= 15.0 {
        out.push("Pair excellent-rated associates with developing associates in a mentorship program.".to_string());
    }
    if quarter_delta(stats).is_some_and(|d| d <= -0.2) {
        out.push("Investigate the causes of the recent quarterly decline and review training schedules.".to_string());
    }
    if let Some(c) = stats.weakest_category().filter(|c| c.average < 2.5) {
        out.push(format!("Schedule network-wide training focused on {}.", c.name));
    }
    if stats.distinct_subjects > 0 && (stats.total_evaluations as f64 / stats.distinct_subjects as f64) < 3.0 {
        out.push("Increase evaluation frequency so each associate has at least three evaluations on record.".to_string());
    }

    if out.is_empty() {
        out.push("Maintain current practices and continue regular evaluations.".to_string());
    }
    out
}

pub fn subject_insights(report: &SubjectReport) -> SubjectInsights {
    let name = report.subject.name.as_str();
    let stats = &report.statistics;

    if stats.is_empty() {
        return SubjectInsights {
            overall_performance: format!("{name} has not been evaluated yet."),
            trend_analysis: NO_DATA.to_string(),
            strengths: NO_CATEGORY_DATA.to_string(),
            improvement_areas: NO_CATEGORY_DATA.to_string(),
            recommendations: vec![format!("Schedule an initial evaluation for {name}.")],
        };
    }

    SubjectInsights {
        overall_performance: subject_performance(name, stats.average_score, stats.total_evaluations),
        trend_analysis: subject_trend_text(name, report.trend, stats.total_evaluations),
        strengths: strengths(stats.strongest_category()),
        improvement_areas: improvement_areas(stats.weakest_category()),
        recommendations: subject_recommendations(report),
    }
}

pub fn subject_performance(name: &str, mean: f64, evaluations: usize) -> String {
    let plural = if evaluations == 1 { "evaluation" } else { "evaluations" };
    if mean >= 3.5 {
        format!("{name} demonstrates exceptional performance, averaging {mean:.2} over {evaluations} {plural}.")
    } else if mean >= 3.0 {
        format!("{name} shows strong performance, averaging {mean:.2} over {evaluations} {plural}.")
    } else if mean >= 2.5 {
        format!("{name} shows moderate performance, averaging {mean:.2} over {evaluations} {plural}.")
    } else {
        format!("{name} is performing below expectations, averaging {mean:.2} over {evaluations} {plural}.")
    }
}

pub fn subject_trend_text(name: &str, trend: Trend, evaluations: usize) -> String {
    match trend {
        Trend::Improving => format!("{name}'s most recent evaluation improved on the previous one."),
        Trend::Declining => format!("{name}'s most recent evaluation was lower than the previous one."),
        Trend::Stable if evaluations < 2 => {
            format!("Only one evaluation is on record for {name}; the trend is reported as stable until a second is completed.")
        }
        Trend::Stable => format!("{name}'s two most recent evaluations scored the same."),
    }
}

pub fn subject_recommendations(report: &SubjectReport) -> Vec<String> {
    let name = report.subject.name.as_str();
    let mut out = Vec::new();

    match report.latest_score() {
        Some(s) if s >= 3.5 => out.push(format!("Consider {name} for a mentoring or team-lead role.")),
        Some(s) if s < 2.5 => out.push(format!("Pair {name} with an experienced mentor and agree on a development plan.")),
        _ => {}
    }
    if report.trend == Trend::Declining {
        out.push(format!("Schedule a check-in with {name} to discuss the recent decline."));
    }
    if let Some(c) = report.statistics.weakest_category().filter(|c| c.average < 2.5) {
        out.push(format!("Offer {name} additional training in {}.", c.name));
    }
    if report.statistics.total_evaluations < 2 {
        out.push(format!("Complete a follow-up evaluation for {name} to establish a trend."));
    }

    if out.is_empty() {
        out.push(format!("Continue regular evaluations and recognize {name}'s contributions."));
    }
    out
}
