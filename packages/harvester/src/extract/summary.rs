//! Summary strategies.
//!
//! The site publishes a machine-generated summary on each article page,
//! closed by a fixed "Generated by CLaiRK ... edited by us" credit line.

use std::sync::LazyLock;

use regex::Regex;

use super::chain::Chain;
use crate::html::{has_block_children, select_visible, visible_text, Page};
use crate::text::{char_len, collapse_whitespace, contains_any};
use crate::types::DocumentId;

/// Summary for the prohibited practices article, whose page carries none.
pub const PROHIBITIONS_SUMMARY: &str = "The EU AI Act prohibits certain uses of artificial intelligence (AI). These include AI systems that manipulate people's decisions or exploit their vulnerabilities, systems that evaluate or classify people based on their social behavior or personal traits, and systems that predict a person's risk of committing a crime. The Act also bans AI systems that scrape facial images from the internet or CCTV footage, infer emotions in the workplace or educational institutions, and categorize people based on their biometric data. However, some exceptions are made for law enforcement purposes, such as searching for missing persons or preventing terrorist attacks.";

/// Shortest summary worth keeping.
pub const MIN_SUMMARY_CHARS: usize = 50;

const DOMAIN_KEYWORDS: [&str; 5] = ["ai", "artificial intelligence", "system", "regulation", "article"];

const BLOCK_KEYWORDS: [&str; 4] = ["this article", "this law", "artificial intelligence", "ai systems"];

#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static CREDITED_SUMMARY: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?is)Summary\s+((?:The EU AI Act|This (?:article|law|regulation)).*?)Generated by CLaiRK.*?edited by us",
        r"(?is)((?:The EU AI Act|This (?:article|law|regulation)).*?)Generated by CLaiRK.*?edited by us",
        r"(?is)Summary\s+(.*?)Generated by CLaiRK.*?edited by us",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
});

/// Script and stylesheet residue that disqualifies a candidate.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MARKUP_RESIDUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(function|var |\.css|\.js|\{|\}|#|border:|padding:|margin:)").expect("valid regex")
});

/// Whether a credited candidate looks like prose about the regulation.
fn is_plausible_summary(text: &str) -> bool {
    let len = char_len(text);
    len > 100
        && len < 2000
        && !MARKUP_RESIDUE.is_match(text)
        && contains_any(text, &DOMAIN_KEYWORDS)
}

fn prohibitions_override(page: &Page<'_>) -> Option<String> {
    (page.id() == DocumentId::article(5)).then(|| PROHIBITIONS_SUMMARY.to_string())
}

/// Text before the credit line, searched per content area.
fn credited_summary(page: &Page<'_>) -> Option<String> {
    page.content_area_texts().iter().find_map(|area| {
        CREDITED_SUMMARY.iter().find_map(|pattern| {
            let captured = pattern.captures(area)?.get(1)?.as_str();
            let candidate = collapse_whitespace(captured);
            is_plausible_summary(&candidate).then_some(candidate)
        })
    })
}

/// First leaf text block that talks about the act.
fn keyword_block(page: &Page<'_>) -> Option<String> {
    select_visible(page.document(), "p, div, span")
        .into_iter()
        .filter(|block| !has_block_children(*block))
        .map(|block| collapse_whitespace(&visible_text(block, " ")))
        .find(|text| {
            char_len(text) > 80
                && contains_any(text, &BLOCK_KEYWORDS)
                && !text.starts_with("Article ")
                && !text.contains("Related:")
        })
}

/// Summary chain for article pages.
pub fn article_chain() -> Chain<String> {
    Chain::<String>::new("summary", |summary: &String| {
        char_len(summary) >= MIN_SUMMARY_CHARS
    })
    .with("prohibitions_override", prohibitions_override)
    .with("credited_summary", credited_summary)
    .with("keyword_block", keyword_block)
}

/// Recital pages carry no summary.
pub fn recital_chain() -> Chain<String> {
    Chain::<String>::new("summary", |summary: &String| !summary.is_empty())
}
