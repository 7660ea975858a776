//! Performance analytics over coalition evaluation records.
//!
//! `aggregate` turns a slice of records into [`ReportStatistics`];
//! [`narrative`] maps those numbers to report text. Nothing here does I/O.

mod types;
mod aggregator;
mod quarters;
mod ranking;
mod subject;
pub mod narrative;

pub use types::*;
pub use aggregator::{aggregate, average, category_averages, percentage};
pub use quarters::{quarter_bounds, quarter_of, quarterly_trend};
pub use ranking::{bottom_performers, subject_trend, summarize_subjects, top_performers};
pub use subject::subject_report;
pub use narrative::{network_insights, subject_insights, NetworkInsights, SubjectInsights};
