use std::collections::HashMap;

use evaluations::EvaluationRecord;
use uuid::Uuid;

use crate::aggregator::average;
use crate::types::{PerformerSummary, Trend};

/// One summary per subject, in order of first appearance in `records`.
pub fn summarize_subjects(records: &[EvaluationRecord]) -> Vec<PerformerSummary> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut groups: Vec<Vec<&EvaluationRecord>> = Vec::new();

    for r in records {
        let i = *index.entry(r.subject_id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[i].push(r);
    }

    groups
        .into_iter()
        .filter_map(|group| {
            let latest = latest_of(group.iter().copied())?;
            Some(PerformerSummary {
                subject_id: latest.subject_id,
                name: latest.subject_name.clone(),
                organization: latest.subject_organization.clone(),
                latest_score: latest.total_score,
                latest_at: latest.created_at,
                average_score: average(group.iter().map(|r| r.total_score)),
                evaluation_count: group.len(),
                trend: trend_of(group.iter().copied()),
            })
        })
        .collect()
}

/// Highest latest score first; ties keep input order.
pub fn top_performers(performers: &[PerformerSummary], limit: usize) -> Vec<PerformerSummary> {
    let mut ranked = performers.to_vec();
    ranked.sort_by(|a, b| b.latest_score.total_cmp(&a.latest_score));
    ranked.truncate(limit);
    ranked
}

/// Lowest latest score first; ties keep input order.
pub fn bottom_performers(performers: &[PerformerSummary], limit: usize) -> Vec<PerformerSummary> {
    let mut ranked = performers.to_vec();
    ranked.sort_by(|a, b| a.latest_score.total_cmp(&b.latest_score));
    ranked.truncate(limit);
    ranked
}

/// Compare a subject's two most recent evaluations.
///
/// Fewer than two evaluations is reported as `Stable`.
pub fn subject_trend(records: &[EvaluationRecord]) -> Trend {
    trend_of(records.iter())
}

fn trend_of<'a>(records: impl IntoIterator<Item = &'a EvaluationRecord>) -> Trend {
    let mut ordered: Vec<&EvaluationRecord> = records.into_iter().collect();
    // stable: equal timestamps keep input order, later input counts as newer
    ordered.sort_by_key(|r| r.created_at);

    match ordered.as_slice() {
        [.., older, newer] => {
            if newer.total_score > older.total_score {
                Trend::Improving
            } else if newer.total_score < older.total_score {
                Trend::Declining
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

fn latest_of<'a>(records: impl IntoIterator<Item = &'a EvaluationRecord>) -> Option<&'a EvaluationRecord> {
    records.into_iter().fold(None, |best, r| match best {
        Some(b) if b.created_at > r.created_at => Some(b),
        _ => Some(r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn rec(subject: Uuid, name: &str, score: f64, day: i64) -> EvaluationRecord {
        EvaluationRecord {
            id: Uuid::new_v4(),
            subject_id: subject,
            subject_name: name.into(),
            subject_organization: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            total_score: score,
            category_scores: json!({}),
            notes: None,
        }
    }

    #[test]
    fn test_trend_classification() {
        let s = Uuid::new_v4();
        let improving = vec![rec(s, "a", 2.0, 1), rec(s, "a", 3.0, 2)];
        let declining = vec![rec(s, "a", 3.0, 1), rec(s, "a", 2.0, 2)];
        let stable = vec![rec(s, "a", 2.5, 1), rec(s, "a", 2.5, 2)];
        assert_eq!(subject_trend(&improving), Trend::Improving);
        assert_eq!(subject_trend(&declining), Trend::Declining);
        assert_eq!(subject_trend(&stable), Trend::Stable);
        assert_eq!(subject_trend(&improving[..1]), Trend::Stable);
        assert_eq!(subject_trend(&[]), Trend::Stable);
    }

    #[test]
    fn test_trend_uses_timestamps_not_input_order() {
        let s = Uuid::new_v4();
        // newest (3.0) listed first
        let records = vec![rec(s, "a", 3.0, 10), rec(s, "a", 1.0, 1), rec(s, "a", 2.0, 5)];
        assert_eq!(subject_trend(&records), Trend::Improving);
    }

    #[test]
    fn test_summaries_use_latest_and_mean() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = vec![
            rec(a, "Ana", 4.0, 1),
            rec(b, "Ben", 2.0, 2),
            rec(a, "Ana", 1.0, 3),
        ];
        let sums = summarize_subjects(&records);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums[0].name, "Ana");
        assert_eq!(sums[0].latest_score, 1.0);
        assert!((sums[0].average_score - 2.5).abs() < 1e-9);
        assert_eq!(sums[0].evaluation_count, 2);
        assert_eq!(sums[0].trend, Trend::Declining);
    }

    #[test]
    fn test_rankings_sorted_and_truncated() {
        let records: Vec<_> = (0..7)
            .map(|i| rec(Uuid::new_v4(), &format!("p{i}"), i as f64 * 0.5, i))
            .collect();
        let sums = summarize_subjects(&records);
        let top = top_performers(&sums, 5);
        let bottom = bottom_performers(&sums, 5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].latest_score, 3.0);
        assert!(top.windows(2).all(|w| w[0].latest_score >= w[1].latest_score));
        assert_eq!(bottom[0].latest_score, 0.0);
        assert!(bottom.windows(2).all(|w| w[0].latest_score <= w[1].latest_score));
    }

    #[test]
    fn test_rank_ties_keep_first_appearance() {
        let records = vec![
            rec(Uuid::new_v4(), "first", 3.0, 1),
            rec(Uuid::new_v4(), "second", 3.0, 2),
        ];
        let sums = summarize_subjects(&records);
        assert_eq!(top_performers(&sums, 5)[0].name, "first");
        assert_eq!(bottom_performers(&sums, 5)[0].name, "first");
    }
}
