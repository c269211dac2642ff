//! Title strategies.

use std::sync::LazyLock;

use regex::Regex;

use super::chain::Chain;
use crate::html::{first_text, Page};
use crate::text::collapse_whitespace;

/// Heading selectors, most specific first.
pub const TITLE_SELECTORS: [&str; 6] = [
    "h1.entry-title",
    "h1",
    ".entry-title",
    ".title",
    "#title",
    ".post-title",
];

/// Site name appended to every `<title>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\|\s*EU Artificial Intelligence Act.*$").expect("valid regex")
});

/// First element matching `css`, unless it is a chapter heading.
fn by_selector(page: &Page<'_>, css: &str) -> Option<String> {
    let title = collapse_whitespace(&first_text(page.document(), css)?);
    (!title.starts_with("Chapter")).then_some(title)
}

/// Document `<title>` without the site suffix.
fn page_title(page: &Page<'_>) -> Option<String> {
    let title = collapse_whitespace(&first_text(page.document(), "title")?);
    Some(TITLE_SUFFIX.replace(&title, "").into_owned())
}

/// Title chain for article pages.
pub fn article_chain() -> Chain<String> {
    let chain = Chain::<String>::new("title", |title: &String| !title.is_empty());
    TITLE_SELECTORS
        .into_iter()
        .fold(chain, |chain, css| {
            chain.with(css, move |page: &Page<'_>| by_selector(page, css))
        })
        .with("page_title", page_title)
}

/// Recital pages are titled by number.
pub fn recital_chain() -> Chain<String> {
    Chain::<String>::new("title", |title: &String| !title.is_empty()).with(
        "recital_number",
        |page: &Page<'_>| Some(format!("Recital {}", page.id().number)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;

    fn title_of(raw: &str) -> Option<(String, &'static str)> {
        let page = Page::parse(DocumentId::article(1), raw);
        article_chain()
            .run(&page)
            .map(|extraction| (extraction.value, extraction.strategy))
    }

    #[test]
    fn test_entry_title_first() {
        let raw = r#"<h1>Other</h1><h1 class="entry-title">Article 1:  Subject
            Matter</h1>"#;
        assert_eq!(
            title_of(raw),
            Some(("Article 1: Subject Matter".to_string(), "h1.entry-title"))
        );
    }

    #[test]
    fn test_chapter_heading_is_skipped() {
        let raw = r#"<h1>Chapter I: General Provisions</h1><div class="post-title">Article 3: Definitions</div>"#;
        assert_eq!(
            title_of(raw),
            Some(("Article 3: Definitions".to_string(), ".post-title"))
        );
    }

    #[test]
    fn test_page_title_suffix_is_stripped() {
        let raw = "<html><head><title>Article 6: Classification Rules | EU Artificial Intelligence Act</title></head><body></body></html>";
        assert_eq!(
            title_of(raw),
            Some(("Article 6: Classification Rules".to_string(), "page_title"))
        );
    }

    #[test]
    fn test_no_title() {
        assert_eq!(title_of("<p>nothing here</p>"), None);
    }

    #[test]
    fn test_recital_title() {
        let page = Page::parse(DocumentId::recital(47), "<h1>Whatever</h1>");
        assert_eq!(recital_chain().run(&page).unwrap().value, "Recital 47");
    }
}
