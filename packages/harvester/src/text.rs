//! Text normalization utilities for extracted page text.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[a-zA-Z#0-9]+;").expect("valid regex"));

/// Previous/next links, with or without arrows.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NAV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"←\s*Previous\s*|Next\s*→\s*|\b(?:Previous|Next)\b\s*").expect("valid regex")
});

/// Sharing widgets rendered as plain words.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SHARE_WIDGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\b(?:Share|Print|Email)\b\s*").expect("valid regex"));

/// Page furniture that follows the body; everything from it onward is dropped.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NAV_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\s*\b(?:Next|Previous|Suitable Recitals|Summary|See here for|Part of Chapter)\b.*$")
        .expect("valid regex")
});

/// Entities that carry meaning; anything else is dropped.
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#8217;", "'"),
    ("&rsquo;", "'"),
    ("&lsquo;", "'"),
];

/// Collapse runs of whitespace to single spaces and trim.
///
/// # Examples
/// ```
/// use aiact_harvester::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  a\n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Remove markup tags.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Decode common entities and drop the rest (`&rarr;`, `&hellip;`, ...).
pub fn strip_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    ENTITY.replace_all(&decoded, "").into_owned()
}

/// Case-insensitive check whether `text` contains any of `needles`.
///
/// Needles must be lowercase.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lower = text.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

/// Character count, as reported in output records.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Clean an extracted body text.
///
/// Strips residual markup and entities, removes navigation and sharing words,
/// cuts the trailing navigation tail and collapses whitespace. Word matches are
/// case-sensitive so legal text like "the next period" survives.
///
/// # Examples
/// ```
/// use aiact_harvester::text::clean_content_text;
///
/// let raw = "1. This Regulation <b>applies</b>&nbsp;to providers. Share Next &rarr; Suitable Recitals 12";
/// assert_eq!(clean_content_text(raw), "1. This Regulation applies to providers.");
/// ```
pub fn clean_content_text(text: &str) -> String {
    let text = strip_entities(&strip_tags(text));
    let text = NAV_LINK.replace_all(&text, "");
    let text = SHARE_WIDGET.replace_all(&text, " ");
    let text = NAV_TAIL.replace(&text, "");
    collapse_whitespace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p class=\"x\">a <em>b</em></p>"), "a b");
    }

    #[test]
    fn test_strip_entities() {
        assert_eq!(strip_entities("AI &amp; data&rarr;"), "AI & data");
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("The Artificial Intelligence Act", &["artificial intelligence"]));
        assert!(!contains_any("Cookie settings", &["regulation", "union"]));
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(char_len("één"), 3);
    }

    #[test]
    fn test_clean_content_keeps_lowercase_navigation_words() {
        let text = "1. For the next period, previous versions apply.";
        assert_eq!(clean_content_text(text), text);
    }

    #[test]
    fn test_clean_content_removes_arrows() {
        assert_eq!(
            clean_content_text("← Previous 1. The purpose of this Regulation. Next →"),
            "1. The purpose of this Regulation."
        );
    }

    #[test]
    fn test_clean_content_cuts_tail() {
        assert_eq!(
            clean_content_text("2. Providers shall comply. See here for more. Summary text"),
            "2. Providers shall comply."
        );
        assert_eq!(
            clean_content_text("3. Text. Part of Chapter III"),
            "3. Text."
        );
    }

    #[test]
    fn test_clean_content_removes_share_widgets() {
        assert_eq!(
            clean_content_text("1. Text applies. Share Print Email"),
            "1. Text applies."
        );
    }
}
