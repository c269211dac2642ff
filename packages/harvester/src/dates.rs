//! Effective date, phase and status resolution.
//!
//! The date comes from the page's "Date of entry into force:" text when
//! present. Otherwise it falls back to the application milestones of the act.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::Page;
use crate::types::{DocumentId, DocumentKind, Phase};

/// Prohibited practices apply.
pub const PROHIBITIONS_DATE: &str = "2025-02-02";

/// Obligations for general-purpose AI models apply.
pub const GPAI_RULES_DATE: &str = "2025-08-02";

/// High-risk classification guidelines are due.
pub const GUIDELINES_DATE: &str = "2026-02-02";

/// The regulation applies in full.
pub const FULL_APPLICATION_DATE: &str = "2026-08-02";

const PROHIBITION_ARTICLES: [u32; 1] = [5];
const GPAI_ARTICLES: [u32; 4] = [53, 54, 55, 56];
const GUIDELINE_ARTICLES: [u32; 1] = [6];

const DEFAULT_YEAR: &str = "2026";
const DEFAULT_MONTH: &str = "08";
const DEFAULT_DAY: &str = "02";

const MONTHS: [(&str, &str); 12] = [
    ("January", "01"),
    ("February", "02"),
    ("March", "03"),
    ("April", "04"),
    ("May", "05"),
    ("June", "06"),
    ("July", "07"),
    ("August", "08"),
    ("September", "09"),
    ("October", "10"),
    ("November", "11"),
    ("December", "12"),
];

/// Longest plausible date text.
const MAX_DATE_TEXT_CHARS: usize = 100;

/// Candidate patterns after the label, strictest first.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static ENTRY_INTO_FORCE: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"(?i)Date of entry into force:\s*(\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+20\d{2})",
        r"(?i:Date of entry into force:)\s*([^A-Z]*?)(?:[A-Z]|$)",
        r"(?i:Date of entry into force:)\s*([^\n\r]*?)(?:\n|\r|$)",
        r"(?i)Date of entry into force:\s*(.*?)(?:According to:|Inherited from:|$)",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"20\d{2}").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DAY_BEFORE_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)",
    )
    .expect("valid regex")
});

/// Where an effective date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed from the page text.
    Page,

    /// Milestone fallback by document id.
    Milestone,
}

impl DateSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Milestone => "milestone",
        }
    }
}

/// A resolved `YYYY-MM-DD` date and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub active_date: String,
    pub source: DateSource,
}

/// Resolves the effective date of a page, enabling mocking in tests.
pub trait DateResolver: Send + Sync {
    fn resolve(&self, page: &Page<'_>) -> ResolvedDate;
}

/// Page text first, application milestones second.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneResolver;

impl DateResolver for MilestoneResolver {
    fn resolve(&self, page: &Page<'_>) -> ResolvedDate {
        let found = page
            .content_area_texts()
            .iter()
            .find_map(|text| find_entry_into_force(text));

        match found {
            Some(date_text) => {
                let active_date = parse_date_text(&date_text);
                tracing::debug!(
                    id = %page.id(),
                    date_text = %date_text,
                    active_date = %active_date,
                    "Date from page"
                );
                ResolvedDate {
                    active_date,
                    source: DateSource::Page,
                }
            }
            None => ResolvedDate {
                active_date: fallback_date(page.id()).to_string(),
                source: DateSource::Milestone,
            },
        }
    }
}

/// Month names match in any case, like the label patterns.
fn is_plausible_date_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    text.chars().count() < MAX_DATE_TEXT_CHARS
        && MONTHS
            .iter()
            .any(|(name, _)| lower.contains(&name.to_lowercase()))
        && YEAR.is_match(text)
}

/// Free-text date following the "Date of entry into force:" label.
///
/// # Examples
/// ```
/// use aiact_harvester::dates::find_entry_into_force;
///
/// assert_eq!(
///     find_entry_into_force("Date of entry into force: 2 August 2026 According to: Article 113").as_deref(),
///     Some("2 August 2026")
/// );
/// assert_eq!(find_entry_into_force("No date here"), None);
/// ```
pub fn find_entry_into_force(text: &str) -> Option<String> {
    ENTRY_INTO_FORCE.iter().find_map(|pattern| {
        let captured = pattern.captures(text)?.get(1)?.as_str();
        let candidate = crate::text::collapse_whitespace(captured);
        is_plausible_date_text(&candidate).then_some(candidate)
    })
}

/// Convert free date text to `YYYY-MM-DD`, defaulting missing parts.
///
/// # Examples
/// ```
/// use aiact_harvester::dates::parse_date_text;
///
/// assert_eq!(parse_date_text("2 February 2025"), "2025-02-02");
/// assert_eq!(parse_date_text("sometime in 2027"), "2027-08-02");
/// ```
pub fn parse_date_text(text: &str) -> String {
    let year = YEAR.find(text).map_or(DEFAULT_YEAR, |found| found.as_str());

    let lower = text.to_lowercase();
    let month = MONTHS
        .iter()
        .find(|(name, _)| lower.contains(&name.to_lowercase()))
        .map_or(DEFAULT_MONTH, |(_, number)| *number);

    let day = DAY_BEFORE_MONTH
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or_else(
            || DEFAULT_DAY.to_string(),
            |found| format!("{:0>2}", found.as_str()),
        );

    format!("{year}-{month}-{day}")
}

/// Milestone date for a document without a date on its page.
///
/// # Examples
/// ```
/// use aiact_harvester::dates::fallback_date;
/// use aiact_harvester::types::DocumentId;
///
/// assert_eq!(fallback_date(DocumentId::article(5)), "2025-02-02");
/// assert_eq!(fallback_date(DocumentId::recital(5)), "2026-08-02");
/// ```
#[must_use]
pub fn fallback_date(id: DocumentId) -> &'static str {
    if id.kind != DocumentKind::Article {
        return FULL_APPLICATION_DATE;
    }

    if PROHIBITION_ARTICLES.contains(&id.number) {
        PROHIBITIONS_DATE
    } else if GPAI_ARTICLES.contains(&id.number) {
        GPAI_RULES_DATE
    } else if GUIDELINE_ARTICLES.contains(&id.number) {
        GUIDELINES_DATE
    } else {
        FULL_APPLICATION_DATE
    }
}

/// Lifecycle phase for an effective date.
#[must_use]
pub fn phase_for_date(active_date: &str) -> Phase {
    match active_date {
        PROHIBITIONS_DATE => Phase::Prohibitions,
        GPAI_RULES_DATE => Phase::GpaiRules,
        GUIDELINES_DATE => Phase::GuidelinesReady,
        FULL_APPLICATION_DATE => Phase::FullApplication,
        _ => Phase::Enacted,
    }
}

/// Today's local date as `YYYY-MM-DD`.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn resolve(id: DocumentId, raw: &str) -> ResolvedDate {
        MilestoneResolver.resolve(&Page::parse(id, raw))
    }

    #[test]
    fn test_entry_into_force_on_page() {
        let raw = r#"<div class="article-metadata"><p>Date of entry into force:</p><p>2 February 2025</p><p>According to: Article 113</p></div>"#;
        let resolved = resolve(DocumentId::article(2), raw);
        assert_eq!(resolved.active_date, "2025-02-02");
        assert_eq!(resolved.source, DateSource::Page);
        assert_eq!(phase_for_date(&resolved.active_date), Phase::Prohibitions);
    }

    #[test]
    fn test_lowercase_month_on_page() {
        assert_eq!(
            find_entry_into_force("Date of entry into force: 2 february 2025").as_deref(),
            Some("2 february 2025")
        );

        let raw = r#"<div class="article-metadata"><p>Date of entry into force: 2 february 2025</p></div>"#;
        let resolved = resolve(DocumentId::article(9), raw);
        assert_eq!(resolved.active_date, "2025-02-02");
        assert_eq!(resolved.source, DateSource::Page);
    }

    #[test]
    fn test_tolerant_patterns() {
        // No day before the month, so the strict pattern misses.
        assert_eq!(
            find_entry_into_force("Date of entry into force: August 2026 Inherited from: Chapter III")
                .as_deref(),
            Some("August 2026 Inherited from: Chapter III")
        );
        assert_eq!(parse_date_text("August 2026 Inherited from: Chapter III"), "2026-08-02");
    }

    #[test]
    fn test_overlong_candidates_are_rejected() {
        let text = format!("Date of entry into force: {}", "word ".repeat(30));
        assert_eq!(find_entry_into_force(&text), None);
    }

    #[test]
    fn test_parse_date_text_pads_day() {
        assert_eq!(parse_date_text("1 December 2030"), "2030-12-01");
        assert_eq!(parse_date_text("12 july 2025"), "2025-07-12");
    }

    #[test]
    fn test_milestone_fallback() {
        let cases = [
            (DocumentId::article(5), "2025-02-02", Phase::Prohibitions),
            (DocumentId::article(53), "2025-08-02", Phase::GpaiRules),
            (DocumentId::article(56), "2025-08-02", Phase::GpaiRules),
            (DocumentId::article(6), "2026-02-02", Phase::GuidelinesReady),
            (DocumentId::article(1), "2026-08-02", Phase::FullApplication),
            (DocumentId::recital(5), "2026-08-02", Phase::FullApplication),
        ];

        for (id, date, phase) in cases {
            let resolved = resolve(id, "<p>No date</p>");
            assert_eq!(resolved.active_date, date, "date for {id}");
            assert_eq!(resolved.source, DateSource::Milestone);
            assert_eq!(phase_for_date(&resolved.active_date), phase, "phase for {id}");
        }
    }

    #[test]
    fn test_other_dates_are_enacted() {
        assert_eq!(phase_for_date("2024-08-01"), Phase::Enacted);
    }

    #[test]
    fn test_status_against_reference_date() {
        assert_eq!(Status::from_dates("2026-08-02", "2027-01-01"), Status::Active);
        assert_eq!(Status::from_dates("2027-02-02", "2027-01-01"), Status::Pending);
    }

    #[test]
    fn test_today_format() {
        assert!(crate::config::validate_date(&today()).is_ok());
    }
}
