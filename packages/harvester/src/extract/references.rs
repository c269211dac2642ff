//! Cross-references from an article to the recitals that explain it.
//!
//! The site lists them under a "Suitable Recitals" heading as bare numbers.
//! Menus on some pages render every recital number right after that heading,
//! so an implausibly large set is treated as noise and discarded.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_REFERENCE_CEILING, RECITAL_COUNT, REFERENCE_WINDOW_CHARS};
use crate::types::DocumentId;

/// Heading that introduces the recital list.
pub const REFERENCE_ANCHOR: &str = "Suitable Recitals";

/// Lines containing any of these end the list.
const STOP_WORDS: [&str; 5] = ["summary", "copy url", "part of", "according to", "date of entry"];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ID_BATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s,]+$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));

/// Extracts and sanity-checks recital references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceValidator {
    ceiling: usize,
    window: usize,
    valid: RangeInclusive<u32>,
}

impl Default for ReferenceValidator {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_CEILING)
    }
}

impl ReferenceValidator {
    /// Validator clearing sets larger than `ceiling`.
    #[must_use]
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            window: REFERENCE_WINDOW_CHARS,
            valid: 1..=RECITAL_COUNT,
        }
    }

    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Recital ids listed after the anchor in `text`.
    ///
    /// # Examples
    /// ```
    /// use aiact_harvester::extract::ReferenceValidator;
    /// use aiact_harvester::types::DocumentId;
    ///
    /// let text = "Suitable Recitals\n12, 3\n3\nCopy URL";
    /// assert_eq!(
    ///     ReferenceValidator::default().extract(text),
    ///     vec![DocumentId::recital(3), DocumentId::recital(12)]
    /// );
    /// ```
    pub fn extract(&self, text: &str) -> Vec<DocumentId> {
        let Some(start) = text.find(REFERENCE_ANCHOR) else {
            return Vec::new();
        };
        let window: String = text[start..].chars().take(self.window).collect();

        let mut numbers = Vec::new();
        for line in window.split('\n').skip(1).map(str::trim) {
            let lower = line.to_lowercase();
            if STOP_WORDS.iter().any(|stop| lower.contains(stop)) {
                break;
            }
            if !line.is_empty() && ID_BATCH.is_match(line) {
                numbers.extend(
                    NUMBER
                        .find_iter(line)
                        .filter_map(|found| found.as_str().parse::<u32>().ok()),
                );
            }
        }

        self.validate(numbers)
    }

    /// Keep in-range numbers, sorted and deduplicated; clear the set if too large.
    pub fn validate(&self, numbers: impl IntoIterator<Item = u32>) -> Vec<DocumentId> {
        let unique: BTreeSet<u32> = numbers
            .into_iter()
            .filter(|number| self.valid.contains(number))
            .collect();

        if unique.len() > self.ceiling {
            tracing::debug!(
                count = unique.len(),
                ceiling = self.ceiling,
                "Discarding implausible reference set"
            );
            return Vec::new();
        }

        unique.into_iter().map(DocumentId::recital).collect()
    }
}
