//! HTML utility functions for navigating and extracting text from DOM trees.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose subtree never counts as page text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer"];

/// Classes that mark a navigation container.
const SKIPPED_CLASSES: &[&str] = &["nav", "navigation"];

/// Elements that start a new text block.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "figure", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "ul",
];

/// Class names marking a main content area.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTENT_AREA_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|main|post|article").expect("valid regex"));

/// Parse a CSS selector, logging instead of failing on a bad one.
///
/// # Examples
/// ```
/// use aiact_harvester::html::selector;
///
/// assert!(selector("h1.entry-title").is_some());
/// assert!(selector("h1[").is_none());
/// ```
pub fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css)
        .map_err(|e| tracing::warn!(css, error = ?e, "Invalid CSS selector"))
        .ok()
}

/// Whether this element is a navigation, script or page chrome container.
pub fn is_skipped(element: ElementRef<'_>) -> bool {
    let value = element.value();
    SKIPPED_TAGS.contains(&value.name()) || value.classes().any(|c| SKIPPED_CLASSES.contains(&c))
}

/// Whether the element or one of its ancestors is skipped.
pub fn in_skipped_subtree(element: ElementRef<'_>) -> bool {
    is_skipped(element) || element.ancestors().filter_map(ElementRef::wrap).any(is_skipped)
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push(&**text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !is_skipped(child) {
                        collect_text(child, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Concatenate the visible text nodes under an element, as-is.
///
/// Source whitespace and newlines are kept, so callers can work line by line.
///
/// # Examples
/// ```
/// use scraper::Html;
/// use aiact_harvester::html::raw_text;
///
/// let html = Html::parse_document("<p>Suitable<script>x()</script>\nRecitals</p>");
/// assert_eq!(raw_text(html.root_element()), "Suitable\nRecitals");
/// ```
pub fn raw_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.concat()
}

/// Visible text nodes under an element, trimmed and joined with `separator`.
///
/// Empty nodes are dropped.
pub fn visible_text(element: ElementRef<'_>, separator: &str) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Whether any class of the element contains `needle`.
pub fn has_class_containing(element: ElementRef<'_>, needle: &str) -> bool {
    element.value().classes().any(|class| class.contains(needle))
}

/// Whether any direct child element is a block-level element.
pub fn has_block_children(element: ElementRef<'_>) -> bool {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| BLOCK_TAGS.contains(&child.value().name()))
}

/// All visible elements matching `css`, in document order.
pub fn select_visible<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = selector(css) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter(|element| !in_skipped_subtree(*element))
        .collect()
}

/// Text of the first visible element matching `css`.
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    select_visible(document, css)
        .into_iter()
        .next()
        .map(raw_text)
}

/// Main content areas of a page.
///
/// These are `article`, `main` and `div` elements with a content-like class.
/// Falls back to `<body>`, then to the document root.
pub fn content_areas(document: &Html) -> Vec<ElementRef<'_>> {
    let areas: Vec<_> = select_visible(document, "article, main, div")
        .into_iter()
        .filter(|element| {
            element
                .value()
                .classes()
                .any(|class| CONTENT_AREA_CLASS.is_match(class))
        })
        .collect();

    if !areas.is_empty() {
        return areas;
    }

    select_visible(document, "body")
        .into_iter()
        .next()
        .map_or_else(|| vec![document.root_element()], |body| vec![body])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><head><title>T</title><style>p { margin: 0 }</style></head>
<body>
  <header><h1>Site header</h1></header>
  <nav><a href="/">Home</a></nav>
  <div class="menu nav"><a href="/x">Menu</a></div>
  <div class="entry-content">
    <h1 class="entry-title">Article 1: Subject Matter</h1>
    <p>First <em>paragraph</em>.</p>
  </div>
  <footer>Footer text</footer>
</body></html>"#;

    #[test]
    fn test_raw_text_skips_chrome() {
        let html = Html::parse_document(PAGE);
        let text = raw_text(html.root_element());
        assert!(text.contains("First paragraph."));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Menu"));
        assert!(!text.contains("Footer text"));
        assert!(!text.contains("margin"));
    }

    #[test]
    fn test_visible_text_joins_trimmed_parts() {
        let html = Html::parse_document("<div><p> a </p>\n<p>b</p><p>   </p></div>");
        let div = select_visible(&html, "div")[0];
        assert_eq!(visible_text(div, " "), "a b");
    }

    #[test]
    fn test_in_skipped_subtree() {
        let html = Html::parse_document(PAGE);
        assert_eq!(select_visible(&html, "h1").len(), 1);
        assert_eq!(
            first_text(&html, "h1").as_deref(),
            Some("Article 1: Subject Matter")
        );
    }

    #[test]
    fn test_has_block_children() {
        let html = Html::parse_document("<div id='a'><p>x</p></div><div id='b'><em>y</em></div>");
        assert!(has_block_children(select_visible(&html, "#a")[0]));
        assert!(!has_block_children(select_visible(&html, "#b")[0]));
    }

    #[test]
    fn test_content_areas() {
        let html = Html::parse_document(PAGE);
        let areas = content_areas(&html);
        assert_eq!(areas.len(), 1);
        assert!(has_class_containing(areas[0], "content"));
    }

    #[test]
    fn test_content_areas_fall_back_to_body() {
        let html = Html::parse_document("<html><body><p>Only text</p></body></html>");
        let areas = content_areas(&html);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].value().name(), "body");
    }
}
