use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use evaluations::{Category, CategoryScores, EvaluationRecord};
use tracing::debug;

use crate::quarters::quarterly_trend;
use crate::ranking::{bottom_performers, summarize_subjects, top_performers};
use crate::types::{CategoryAverage, PerformanceDistribution, ReportStatistics, RANKING_LIMIT};

/// Compute the full statistics block for one report scope.
///
/// `records` may span any number of subjects; `now` fixes the report
/// timestamp and the calendar year used for the quarterly buckets.
pub fn aggregate(records: &[EvaluationRecord], now: DateTime<Utc>) -> ReportStatistics {
    let performers = summarize_subjects(records);
    let (category_averages, malformed_records) = category_averages(records);

    ReportStatistics {
        total_evaluations: records.len(),
        distinct_subjects: performers.len(),
        average_score: average(records.iter().map(|r| r.total_score)),
        generated_at: now,
        distribution: PerformanceDistribution::from_scores(records.iter().map(|r| r.total_score)),
        quarterly: quarterly_trend(records, now.year()),
        top_performers: top_performers(&performers, RANKING_LIMIT),
        bottom_performers: bottom_performers(&performers, RANKING_LIMIT),
        category_averages,
        malformed_records,
    }
}

/// Arithmetic mean; 0 for an empty iterator.
pub fn average<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `part` as a percentage of `total`; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Mean of per-record category means, per category, over the records that
/// carry that category. Returns the averages and the number of records whose
/// payload could not be parsed.
pub fn category_averages(records: &[EvaluationRecord]) -> (Vec<CategoryAverage>, usize) {
    let mut sums: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
    let mut malformed = 0usize;

    for r in records.iter().filter(|r| !r.category_scores.is_null()) {
        let scores = match CategoryScores::parse(&r.category_scores) {
            Ok(s) => s,
            Err(e) => {
                malformed += 1;
                debug!(evaluation_id=%r.id, error=%e, "skipping category scores");
                continue;
            }
        };
        for (category, mean) in scores.iter() {
            let entry = sums.entry(category).or_insert((0.0, 0));
            entry.0 += mean;
            entry.1 += 1;
        }
    }

    let averages = sums
        .into_iter()
        .map(|(category, (sum, n))| CategoryAverage {
            category,
            name: category.display_name(),
            average: sum / n as f64,
            records: n,
        })
        .collect();

    (averages, malformed)
}
