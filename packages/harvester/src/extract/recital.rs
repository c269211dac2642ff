//! Recital body strategies.

use super::chain::Chain;
use crate::html::{
    has_class_containing, in_skipped_subtree, raw_text, select_visible, selector, visible_text,
    Page,
};
use crate::text::{collapse_whitespace, contains_any};

/// Minimum characters for a recital paragraph.
pub const MIN_RECITAL_CHARS: usize = 100;

/// Footer and disclaimer phrases that rule out a paragraph.
const FOOTER_PHRASES: [&str; 7] = [
    "this website is maintained",
    "future of life",
    "transparency register",
    "feedback",
    "note:",
    "official text",
    "interinstitutional file",
];

/// Words signalling regulatory prose.
const INDICATORS: [&str; 5] = ["regulation", "charter", "union", "artificial intelligence", "ai"];

/// Indicators for the last-resort scan, where the bare "ai" is too loose.
const FALLBACK_INDICATORS: [&str; 5] = [
    "regulation",
    "charter",
    "union",
    "artificial intelligence",
    "trustworthy",
];

fn is_substantial(text: &str) -> bool {
    text.chars().count() > MIN_RECITAL_CHARS && !contains_any(text, &FOOTER_PHRASES)
}

fn is_regulatory(text: &str) -> bool {
    is_substantial(text) && contains_any(text, &INDICATORS)
}

fn paragraph_text(page: &Page<'_>, css: &str) -> Vec<String> {
    select_visible(page.document(), css)
        .into_iter()
        .map(|p| collapse_whitespace(&visible_text(p, " ")))
        .collect()
}

/// First substantial paragraph of the post body.
fn post_body_paragraph(page: &Page<'_>) -> Option<String> {
    let paragraph = selector("p")?;
    select_visible(page.document(), "div")
        .into_iter()
        .filter(|div| has_class_containing(*div, "et_pb_post_content"))
        .flat_map(|div| div.select(&paragraph).collect::<Vec<_>>())
        .filter(|p| !in_skipped_subtree(*p))
        .map(|p| collapse_whitespace(&visible_text(p, " ")))
        .find(|text| is_substantial(text))
}

/// Any paragraph that reads like regulatory prose.
fn regulatory_paragraph(page: &Page<'_>) -> Option<String> {
    paragraph_text(page, "p")
        .into_iter()
        .find(|text| is_regulatory(text))
}

/// A qualifying line of the main content or post container.
fn content_line(page: &Page<'_>) -> Option<String> {
    let container = select_visible(page.document(), "div")
        .into_iter()
        .find(|div| has_class_containing(*div, "content") || has_class_containing(*div, "post"))?;

    raw_text(container)
        .lines()
        .map(collapse_whitespace)
        .find(|line| is_regulatory(line))
}

/// A qualifying line after any "Recital" heading in the body text.
fn after_heading_line(page: &Page<'_>) -> Option<String> {
    page.body_text()
        .split("Recital")
        .skip(1)
        .flat_map(str::lines)
        .map(collapse_whitespace)
        .find(|line| {
            line.chars().count() > MIN_RECITAL_CHARS
                && !line.chars().all(|c| c.is_ascii_digit())
                && !contains_any(line, &["this website is maintained", "future of life"])
                && !contains_any(line, &["previous", "next"])
                && contains_any(line, &FALLBACK_INDICATORS)
        })
}

/// Body chain for recital pages.
pub fn recital_chain() -> Chain<String> {
    Chain::<String>::new("content", |content: &String| !content.is_empty())
        .with("post_body_paragraph", post_body_paragraph)
        .with("regulatory_paragraph", regulatory_paragraph)
        .with("content_line", content_line)
        .with("after_heading_line", after_heading_line)
}
