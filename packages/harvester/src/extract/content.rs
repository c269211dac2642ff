//! Article body strategies.
//!
//! Three bounded patterns run over the raw markup first, because the site
//! renders paragraphs as loose inline text that the DOM splits unpredictably.
//! DOM scans of the main container and the whole body follow.

use std::sync::LazyLock;

use regex::Regex;

use super::chain::Chain;
use crate::html::{raw_text, select_visible, Page};
use crate::text::{char_len, clean_content_text, collapse_whitespace, strip_tags};

/// Minimum characters for a body to count as substantive.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Opening of the first article's body.
pub const PURPOSE_ANCHOR: &str = "1. The purpose of this Regulation";

/// Markers that end the body on the site's article template.
pub const STOP_MARKERS: [&str; 5] = [
    "Previous",
    "Next",
    "Suitable Recitals",
    "Summary",
    "See here for",
];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static OPERATIVE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(\d+\.\s+.*?(?:shall|means|includes|lays down|applies).*?)(?:Previous|Next|Suitable Recitals|Summary|See here for)",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PURPOSE_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(1\.\s+The purpose of this Regulation.*?)(?:Previous|Next|Suitable Recitals|Summary|See here for)",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBERED_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(\d+\.\s+.*?)(?:Previous|Next|Suitable Recitals|Summary)")
        .expect("valid regex")
});

/// Same boundary pair over DOM text, where case is reliable.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTAINER_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\d+\.\s+.*?)(?:Previous|Next|Suitable Recitals|Summary)")
        .expect("valid regex")
});

/// Apply a bounded pattern to the raw markup.
fn raw_pattern(page: &Page<'_>, pattern: &Regex) -> Option<String> {
    let captured = pattern.captures(page.raw())?.get(1)?.as_str();
    let text = collapse_whitespace(&strip_tags(captured));
    Some(clean_content_text(&text))
}

fn operative_paragraph(page: &Page<'_>) -> Option<String> {
    raw_pattern(page, &OPERATIVE_PARAGRAPH)
}

fn purpose_paragraph(page: &Page<'_>) -> Option<String> {
    raw_pattern(page, &PURPOSE_PARAGRAPH)
}

fn numbered_paragraph(page: &Page<'_>) -> Option<String> {
    raw_pattern(page, &NUMBERED_PARAGRAPH)
}

/// `<main>`, or the first `div` with a class containing "content".
fn main_container(page: &Page<'_>) -> Option<String> {
    let container = select_visible(page.document(), "main")
        .into_iter()
        .next()
        .or_else(|| {
            select_visible(page.document(), "div")
                .into_iter()
                .find(|div| {
                    div.value()
                        .classes()
                        .any(|class| class.to_lowercase().contains("content"))
                })
        })?;

    let text = raw_text(container);
    let captured = CONTAINER_PARAGRAPH.captures(&text)?.get(1)?.as_str();
    Some(clean_content_text(captured))
}

/// Body text from the purpose anchor to the earliest stop marker.
fn body_scan(page: &Page<'_>) -> Option<String> {
    let body = page.body_text();
    let start = body.find(PURPOSE_ANCHOR)?;
    let rest = &body[start..];
    let end = STOP_MARKERS
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());
    Some(clean_content_text(&rest[..end]))
}

/// Body chain for article pages.
pub fn article_chain() -> Chain<String> {
    Chain::<String>::new("content", |content: &String| {
        char_len(content) > MIN_CONTENT_CHARS
    })
    .with("operative_paragraph", operative_paragraph)
    .with("purpose_paragraph", purpose_paragraph)
    .with("numbered_paragraph", numbered_paragraph)
    .with("main_container", main_container)
    .with("body_scan", body_scan)
}
