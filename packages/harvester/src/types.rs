//! Core data types for the harvester.
//!
//! A [`Document`] is the unit of output: one article or recital page turned
//! into a flat record with a resolved effective date, phase and status.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ARTICLE_COUNT, RECITAL_COUNT};

/// Sentinel title when no heading could be extracted.
pub const UNTITLED: &str = "Untitled";

/// Sentinel summary when no summary could be extracted.
pub const NO_SUMMARY: &str = "No summary available";

/// Sentinel chapter when no structural marker was found.
pub const UNKNOWN_CHAPTER: &str = "Unknown Chapter";

/// Type space a document belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Numbered operative provision.
    #[value(alias = "articles")]
    Article,

    /// Numbered explanatory preamble paragraph.
    #[value(alias = "recitals")]
    Recital,
}

impl DocumentKind {
    /// Get the string value used in output records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Recital => "recital",
        }
    }

    /// Prefix of the stable id (`A5`, `R12`).
    #[must_use]
    pub fn id_prefix(&self) -> char {
        match self {
            Self::Article => 'A',
            Self::Recital => 'R',
        }
    }

    /// Full id space published for this kind.
    #[must_use]
    pub fn full_range(&self) -> IdRange {
        match self {
            Self::Article => IdRange::new(1, ARTICLE_COUNT),
            Self::Recital => IdRange::new(1, RECITAL_COUNT),
        }
    }

    /// Schema version tag written in run metadata.
    #[must_use]
    pub fn schema_version(&self) -> &'static str {
        match self {
            Self::Article => "articles_flattened_v1",
            Self::Recital => "recitals_flattened_v1",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a document, unique within its kind.
///
/// Ordering is by kind first, then numerically by number, so `A2 < A10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId {
    pub kind: DocumentKind,
    pub number: u32,
}

impl DocumentId {
    #[must_use]
    pub fn new(kind: DocumentKind, number: u32) -> Self {
        Self { kind, number }
    }

    #[must_use]
    pub fn article(number: u32) -> Self {
        Self::new(DocumentKind::Article, number)
    }

    #[must_use]
    pub fn recital(number: u32) -> Self {
        Self::new(DocumentKind::Recital, number)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.id_prefix(), self.number)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Legal lifecycle stage, derived from the active date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Prohibited practices apply (2 February 2025).
    Prohibitions,

    /// General-purpose AI model obligations apply (2 August 2025).
    GpaiRules,

    /// High-risk classification guidelines are due (2 February 2026).
    GuidelinesReady,

    /// The regulation applies in full (2 August 2026).
    FullApplication,

    /// Any other effective date.
    Enacted,
}

impl Phase {
    /// Get the string value for output records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prohibitions => "prohibitions",
            Self::GpaiRules => "gpai_rules",
            Self::GuidelinesReady => "guidelines_ready",
            Self::FullApplication => "full_application",
            Self::Enacted => "enacted",
        }
    }
}

/// Whether the document's legal effect has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Pending,
}

impl Status {
    /// Compare two `YYYY-MM-DD` dates.
    ///
    /// Plain string comparison is valid because both sides are fixed-width and
    /// zero-padded.
    ///
    /// # Examples
    /// ```
    /// use aiact_harvester::types::Status;
    ///
    /// assert_eq!(Status::from_dates("2026-08-02", "2027-01-01"), Status::Active);
    /// assert_eq!(Status::from_dates("2027-02-02", "2027-01-01"), Status::Pending);
    /// ```
    #[must_use]
    pub fn from_dates(active_date: &str, current_date: &str) -> Self {
        if active_date <= current_date {
            Self::Active
        } else {
            Self::Pending
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
        }
    }
}

/// One scraped article or recital.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub chapter: String,

    /// Linked recitals, ascending and deduplicated.
    pub references: Vec<DocumentId>,

    /// `YYYY-MM-DD`, always resolved.
    pub active_date: String,
    pub phase: Phase,
    pub status: Status,
    pub url: String,
}

impl Document {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.id.kind
    }

    /// Text handed to the downstream indexer.
    ///
    /// # Examples
    /// ```
    /// use aiact_harvester::types::{Document, DocumentId, Phase, Status};
    ///
    /// let doc = Document {
    ///     id: DocumentId::recital(1),
    ///     title: "Recital 1".to_string(),
    ///     content: "The purpose of this Regulation".to_string(),
    ///     summary: "No summary available".to_string(),
    ///     chapter: "Unknown Chapter".to_string(),
    ///     references: vec![],
    ///     active_date: "2026-08-02".to_string(),
    ///     phase: Phase::FullApplication,
    ///     status: Status::Pending,
    ///     url: "https://artificialintelligenceact.eu/recital/1/".to_string(),
    /// };
    /// assert_eq!(doc.chunk_text(), "Recital 1. The purpose of this Regulation");
    /// ```
    #[must_use]
    pub fn chunk_text(&self) -> String {
        match self.kind() {
            DocumentKind::Article => format!("{}. {}. {}", self.title, self.summary, self.content),
            DocumentKind::Recital => format!("{}. {}", self.title, self.content),
        }
    }
}

/// Ordered set of document numbers to scrape.
///
/// Decoupled from fetching so tests can drive synthetic id sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRange {
    numbers: Vec<u32>,
}

impl IdRange {
    /// Inclusive range `start..=end`.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            numbers: (start..=end).collect(),
        }
    }

    /// Arbitrary set of numbers in the given order; repeats are dropped.
    #[must_use]
    pub fn from_numbers(numbers: impl IntoIterator<Item = u32>) -> Self {
        let mut seen = HashSet::new();
        Self {
            numbers: numbers.into_iter().filter(|n| seen.insert(*n)).collect(),
        }
    }

    /// First `count` numbers of this range.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        Self {
            numbers: self.numbers.iter().copied().take(count).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.numbers.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Metadata describing one scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub schema_version: String,
    pub kind: DocumentKind,
    pub total: usize,
    pub scraped_at: String,
    pub continent: String,
    pub source_type: String,
}

/// Result of a scrape run: id-ordered documents plus metadata.
#[derive(Debug, Clone)]
pub struct ScrapeRun {
    pub metadata: RunMetadata,
    pub documents: Vec<Document>,
}
