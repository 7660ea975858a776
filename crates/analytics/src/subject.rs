use chrono::{DateTime, Utc};
use evaluations::{EvaluationRecord, Subject};

use crate::aggregator::aggregate;
use crate::ranking::subject_trend;
use crate::types::SubjectReport;

/// Statistics scoped to one subject plus their newest-first history.
pub fn subject_report(subject: Subject, records: &[EvaluationRecord], now: DateTime<Utc>) -> SubjectReport {
    let statistics = aggregate(records, now);
    let trend = subject_trend(records);

    // reverse first so equal timestamps list the later-inserted record first
    let mut history: Vec<EvaluationRecord> = records.iter().rev().cloned().collect();
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let latest = history.first().cloned();

    SubjectReport {
        subject,
        statistics,
        trend,
        latest,
        history,
    }
}
