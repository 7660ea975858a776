use chrono::{Datelike, NaiveDate};
use evaluations::EvaluationRecord;

use crate::aggregator::average;
use crate::types::QuarterTrend;

const MONTH_SPANS: [&str; 4] = ["Jan-Mar", "Apr-Jun", "Jul-Sep", "Oct-Dec"];

/// First and last calendar day of `quarter` (1..=4) in `year`.
pub fn quarter_bounds(year: i32, quarter: u8) -> (NaiveDate, NaiveDate) {
    let q = u32::from(quarter.clamp(1, 4));
    let start = NaiveDate::from_ymd_opt(year, 3 * (q - 1) + 1, 1).expect("quarter start is a valid date");
    let end = if q == 4 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, 3 * q + 1, 1).and_then(|d| d.pred_opt())
    }
    .expect("quarter end is a valid date");
    (start, end)
}

/// Four buckets for `year`, oldest first; empty quarters report 0/0.
pub fn quarterly_trend(records: &[EvaluationRecord], year: i32) -> Vec<QuarterTrend> {
    (1..=4u8)
        .map(|quarter| {
            let (start, end) = quarter_bounds(year, quarter);
            let scores: Vec<f64> = records
                .iter()
                .filter(|r| {
                    let day = r.created_at.date_naive();
                    day >= start && day <= end
                })
                .map(|r| r.total_score)
                .collect();

            QuarterTrend {
                quarter,
                label: format!("Q{quarter} {year} ({})", MONTH_SPANS[usize::from(quarter - 1)]),
                start,
                end,
                evaluation_count: scores.len(),
                average_score: average(scores),
            }
        })
        .collect()
}

/// Index of the quarter (1..=4) containing `date`.
pub fn quarter_of(date: NaiveDate) -> u8 {
    // month0 is 0..=11
    (date.month0() / 3 + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32, h: u32, score: f64) -> EvaluationRecord {
        EvaluationRecord {
            id: Uuid::new_v4(),
            subject_id: Uuid::nil(),
            subject_name: "Sam".into(),
            subject_organization: None,
            created_at: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            total_score: score,
            category_scores: json!({}),
            notes: None,
        }
    }

    #[test]
    fn test_quarter_bounds() {
        assert_eq!(
            quarter_bounds(2024, 1),
            (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
        );
        assert_eq!(quarter_bounds(2024, 2).1, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(quarter_bounds(2024, 4).1, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let records = vec![
            at(2026, 3, 31, 23, 4.0),
            at(2026, 4, 1, 0, 2.0),
            at(2026, 12, 31, 23, 3.0),
        ];
        let q = quarterly_trend(&records, 2026);
        assert_eq!(q[0].evaluation_count, 1);
        assert_eq!(q[1].evaluation_count, 1);
        assert_eq!(q[2].evaluation_count, 0);
        assert_eq!(q[3].evaluation_count, 1);
    }

    #[test]
    fn test_other_years_are_ignored() {
        let records = vec![at(2025, 5, 1, 12, 4.0)];
        let q = quarterly_trend(&records, 2026);
        assert_eq!(q.len(), 4);
        assert!(q.iter().all(|b| b.evaluation_count == 0 && b.average_score == 0.0));
        assert_eq!(q[0].label, "Q1 2026 (Jan-Mar)");
    }

    #[test]
    fn test_quarter_of() {
        assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()), 1);
        assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()), 2);
        assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()), 4);
    }
}
