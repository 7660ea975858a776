use std::fmt;
use std::str::FromStr;

use analytics::PerformanceBand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown page size {0:?} (expected \"legal\" or \"a4\")")]
pub struct UnknownPageSize(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Legal,
    A4,
}

impl PageSize {
    pub fn css_name(self) -> &'static str {
        match self {
            PageSize::Legal => "legal",
            PageSize::A4 => "A4",
        }
    }
}

impl FromStr for PageSize {
    type Err = UnknownPageSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legal" => Ok(PageSize::Legal),
            "a4" => Ok(PageSize::A4),
            _ => Err(UnknownPageSize(s.to_string())),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Legal => f.write_str("Legal"),
            PageSize::A4 => f.write_str("A4"),
        }
    }
}

/// Reports are always portrait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
}

impl Orientation {
    pub fn css_name(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("Portrait"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetup {
    pub size: PageSize,
    pub orientation: Orientation,
}

impl PageSetup {
    pub fn new(size: PageSize) -> Self {
        Self { size, orientation: Orientation::Portrait }
    }
}

/// Color band for a cell or headline number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    Excellent,
    Good,
    Fair,
    Poor,
    #[default]
    Neutral,
}

impl Tone {
    pub fn for_score(score: f64) -> Self {
        PerformanceBand::for_score(score).into()
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Excellent => "tone-excellent",
            Tone::Good => "tone-good",
            Tone::Fair => "tone-fair",
            Tone::Poor => "tone-poor",
            Tone::Neutral => "tone-neutral",
        }
    }
}

impl From<PerformanceBand> for Tone {
    fn from(band: PerformanceBand) -> Self {
        match band {
            PerformanceBand::Excellent => Tone::Excellent,
            PerformanceBand::Good => Tone::Good,
            PerformanceBand::Fair => Tone::Fair,
            PerformanceBand::Poor => Tone::Poor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Neutral }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self { text: text.into(), tone }
    }

    pub fn score(score: f64) -> Self {
        Self::toned(format!("{score:.2}"), Tone::for_score(score))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self { label: label.into(), value: value.into(), tone }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(String),
    Stats(Vec<Stat>),
    Table(Table),
    Bullets(Vec<String>),
    /// Placeholder shown in place of data that does not exist yet.
    Notice { title: String, body: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self { heading: heading.into(), blocks: Vec::new() }
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    pub fn stats(mut self, stats: Vec<Stat>) -> Self {
        self.blocks.push(Block::Stats(stats));
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.blocks.push(Block::Table(table));
        self
    }

    pub fn bullets(mut self, items: Vec<String>) -> Self {
        self.blocks.push(Block::Bullets(items));
        self
    }

    pub fn notice(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.blocks.push(Block::Notice { title: title.into(), body: body.into() });
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub organization: String,
    pub generated_at: DateTime<Utc>,
    pub page: PageSetup,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

/// Caller-supplied framing shared by every report.
#[derive(Clone, Debug)]
pub struct ReportContext {
    pub organization: String,
    pub page: PageSetup,
}
