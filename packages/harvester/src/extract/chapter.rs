//! Chapter strategies.

use std::sync::LazyLock;

use regex::Regex;

use super::chain::Chain;
use crate::html::{raw_text, select_visible, Page};
use crate::text::collapse_whitespace;
use crate::types::DocumentId;

const INHERITED_LABEL: &str = "Inherited from:";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Chapter\s+([IVX]+):\s*([^→\n<]+)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PART_OF_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Part\s+of\s+Chapter\s+([IVX]+)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARROW_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)→\s*Chapter\s+([IVX]+):\s*([^→\n<]+)").expect("valid regex")
});

/// Prohibited practices sit in chapter II, but the page names no chapter.
fn prohibitions_chapter(page: &Page<'_>) -> Option<String> {
    (page.id() == DocumentId::article(5)).then(|| "Part of Chapter II".to_string())
}

/// "Inherited from:" line of the article metadata block.
fn inherited_metadata(page: &Page<'_>) -> Option<String> {
    select_visible(page.document(), "div.article-metadata p")
        .into_iter()
        .map(|p| collapse_whitespace(&raw_text(p)))
        .find_map(|text| {
            let (_, inherited) = text.split_once(INHERITED_LABEL)?;
            let inherited = inherited.trim();
            Some(if inherited.starts_with("Chapter") {
                inherited.to_string()
            } else {
                format!("Part of {inherited}")
            })
        })
}

fn breadcrumb(page: &Page<'_>) -> Option<String> {
    select_visible(page.document(), "div.breadcrumbs a")
        .into_iter()
        .map(|link| collapse_whitespace(&raw_text(link)))
        .find(|text| text.contains("Chapter"))
}

/// `Chapter {ROMAN}: {name}` rebuilt from a two-group match.
fn numbered_heading(pattern: &Regex, raw: &str) -> Option<String> {
    let captures = pattern.captures(raw)?;
    let roman = captures.get(1)?.as_str();
    let name = captures.get(2)?.as_str().trim();
    Some(format!("Chapter {roman}: {name}"))
}

fn chapter_heading(page: &Page<'_>) -> Option<String> {
    numbered_heading(&CHAPTER_HEADING, page.raw())
}

fn part_of_chapter(page: &Page<'_>) -> Option<String> {
    PART_OF_CHAPTER
        .find(page.raw())
        .map(|found| found.as_str().trim().to_string())
}

fn arrow_chapter(page: &Page<'_>) -> Option<String> {
    numbered_heading(&ARROW_CHAPTER, page.raw())
}

/// Chapter chain for article pages.
pub fn article_chain() -> Chain<String> {
    Chain::<String>::new("chapter", |chapter: &String| !chapter.is_empty())
        .with("prohibitions_chapter", prohibitions_chapter)
        .with("inherited_metadata", inherited_metadata)
        .with("breadcrumb", breadcrumb)
        .with("chapter_heading", chapter_heading)
        .with("part_of_chapter", part_of_chapter)
        .with("arrow_chapter", arrow_chapter)
}

/// Recitals belong to the preamble, outside any chapter.
pub fn recital_chain() -> Chain<String> {
    Chain::<String>::new("chapter", |chapter: &String| !chapter.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(id: DocumentId, raw: &str) -> Option<(String, &'static str)> {
        let page = Page::parse(id, raw);
        article_chain().run(&page).map(|e| (e.value, e.strategy))
    }

    #[test]
    fn test_prohibitions_chapter_by_id() {
        assert_eq!(
            run(DocumentId::article(5), "<p>Chapter I: General Provisions</p>"),
            Some(("Part of Chapter II".to_string(), "prohibitions_chapter"))
        );
    }

    #[test]
    fn test_inherited_metadata() {
        let raw = r#"<div class="article-metadata"><p>Date of entry into force: 2 August 2026</p><p>Inherited from: Section 2: Requirements for High-Risk AI Systems</p></div>"#;
        assert_eq!(
            run(DocumentId::article(9), raw),
            Some((
                "Part of Section 2: Requirements for High-Risk AI Systems".to_string(),
                "inherited_metadata"
            ))
        );

        let raw = r#"<div class="article-metadata"><p>Inherited from: Chapter IV: Transparency Obligations</p></div>"#;
        assert_eq!(
            run(DocumentId::article(50), raw).map(|(chapter, _)| chapter),
            Some("Chapter IV: Transparency Obligations".to_string())
        );
    }

    #[test]
    fn test_breadcrumb() {
        let raw = r#"<div class="breadcrumbs"><a href="/">Home</a><a href="/chapter/3/">Chapter III: High-Risk AI Systems</a></div>"#;
        assert_eq!(
            run(DocumentId::article(6), raw),
            Some(("Chapter III: High-Risk AI Systems".to_string(), "breadcrumb"))
        );
    }

    #[test]
    fn test_heading_in_markup() {
        let raw = "<span>Chapter I: General Provisions</span>";
        assert_eq!(
            run(DocumentId::article(1), raw),
            Some(("Chapter I: General Provisions".to_string(), "chapter_heading"))
        );
    }

    #[test]
    fn test_part_of_chapter_in_markup() {
        let raw = "<span>Part of Chapter VI</span>";
        assert_eq!(
            run(DocumentId::article(58), raw),
            Some(("Part of Chapter VI".to_string(), "part_of_chapter"))
        );
    }

    #[test]
    fn test_unknown_chapter() {
        assert_eq!(run(DocumentId::article(2), "<p>No structure</p>"), None);
        assert_eq!(recital_chain().names().count(), 0);
    }
}
