use chrono::{DateTime, NaiveDate, Utc};
use evaluations::{Category, EvaluationRecord, Subject};
use serde::Serialize;
use uuid::Uuid;

/// Band boundaries. A score at a boundary belongs to the higher band.
pub const EXCELLENT_FLOOR: f64 = 3.5;
pub const GOOD_FLOOR: f64 = 2.5;
pub const FAIR_FLOOR: f64 = 1.5;

/// Max length of the top and bottom performer lists.
pub const RANKING_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceBand {
    pub const ALL: [PerformanceBand; 4] = [
        PerformanceBand::Excellent,
        PerformanceBand::Good,
        PerformanceBand::Fair,
        PerformanceBand::Poor,
    ];

    pub fn for_score(score: f64) -> Self {
        if score >= EXCELLENT_FLOOR {
            PerformanceBand::Excellent
        } else if score >= GOOD_FLOOR {
            PerformanceBand::Good
        } else if score >= FAIR_FLOOR {
            PerformanceBand::Fair
        } else {
            PerformanceBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::Good => "Good",
            PerformanceBand::Fair => "Fair",
            PerformanceBand::Poor => "Poor",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "3.5 - 4.0",
            PerformanceBand::Good => "2.5 - 3.49",
            PerformanceBand::Fair => "1.5 - 2.49",
            PerformanceBand::Poor => "0.0 - 1.49",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PerformanceDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl PerformanceDistribution {
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut d = Self::default();
        for s in scores {
            match PerformanceBand::for_score(s) {
                PerformanceBand::Excellent => d.excellent += 1,
                PerformanceBand::Good => d.good += 1,
                PerformanceBand::Fair => d.fair += 1,
                PerformanceBand::Poor => d.poor += 1,
            }
        }
        d
    }

    pub fn count(&self, band: PerformanceBand) -> usize {
        match band {
            PerformanceBand::Excellent => self.excellent,
            PerformanceBand::Good => self.good,
            PerformanceBand::Fair => self.fair,
            PerformanceBand::Poor => self.poor,
        }
    }

    pub fn total(&self) -> usize {
        self.excellent + self.good + self.fair + self.poor
    }

    pub fn percentage(&self, band: PerformanceBand) -> f64 {
        crate::percentage(self.count(band), self.total())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuarterTrend {
    pub quarter: u8,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub evaluation_count: usize,
    pub average_score: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Improving => "Improving",
            Trend::Declining => "Declining",
            Trend::Stable => "Stable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformerSummary {
    pub subject_id: Uuid,
    pub name: String,
    pub organization: Option<String>,
    pub latest_score: f64,
    pub latest_at: DateTime<Utc>,
    pub average_score: f64,
    pub evaluation_count: usize,
    pub trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub name: &'static str,
    pub average: f64,
    /// Records that contributed a score for this category.
    pub records: usize,
}

/// Request-scoped summary of a set of evaluation records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportStatistics {
    pub total_evaluations: usize,
    pub distinct_subjects: usize,
    pub average_score: f64,
    pub generated_at: DateTime<Utc>,
    pub distribution: PerformanceDistribution,
    pub quarterly: Vec<QuarterTrend>,
    pub top_performers: Vec<PerformerSummary>,
    pub bottom_performers: Vec<PerformerSummary>,
    pub category_averages: Vec<CategoryAverage>,
    pub malformed_records: usize,
}

impl ReportStatistics {
    pub fn is_empty(&self) -> bool {
        self.total_evaluations == 0
    }

    pub fn band_percentage(&self, band: PerformanceBand) -> f64 {
        crate::percentage(self.distribution.count(band), self.total_evaluations)
    }

    pub fn strongest_category(&self) -> Option<&CategoryAverage> {
        self.category_averages
            .iter()
            .fold(None, |best: Option<&CategoryAverage>, c| match best {
                Some(b) if b.average >= c.average => Some(b),
                _ => Some(c),
            })
    }

    pub fn weakest_category(&self) -> Option<&CategoryAverage> {
        self.category_averages
            .iter()
            .fold(None, |worst: Option<&CategoryAverage>, c| match worst {
                Some(w) if w.average <= c.average => Some(w),
                _ => Some(c),
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectReport {
    pub subject: Subject,
    pub statistics: ReportStatistics,
    pub trend: Trend,
    pub latest: Option<EvaluationRecord>,
    /// Newest first.
    pub history: Vec<EvaluationRecord>,
}

impl SubjectReport {
    pub fn average_score(&self) -> f64 {
        self.statistics.average_score
    }

    pub fn latest_score(&self) -> Option<f64> {
        self.latest.as_ref().map(|r| r.total_score)
    }
}
