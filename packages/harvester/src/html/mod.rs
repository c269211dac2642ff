//! Parsed HTML pages and DOM helpers.

mod utils;

use std::cell::OnceCell;

use scraper::{ElementRef, Html};

use crate::types::DocumentId;

pub use utils::{
    content_areas, first_text, has_block_children, has_class_containing, in_skipped_subtree,
    is_skipped, raw_text, select_visible, selector, visible_text,
};

/// One fetched page, parsed once and shared by every extraction strategy.
///
/// `scraper::Html` is not `Send`; a page lives inside a synchronous extraction
/// pass and is dropped before the next network await.
pub struct Page<'a> {
    id: DocumentId,
    raw: &'a str,
    document: Html,
    body_text: OnceCell<String>,
    content_texts: OnceCell<Vec<String>>,
}

impl<'a> Page<'a> {
    #[must_use]
    pub fn parse(id: DocumentId, raw: &'a str) -> Self {
        Self {
            id,
            raw,
            document: Html::parse_document(raw),
            body_text: OnceCell::new(),
            content_texts: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Unparsed markup, for the regex strategies.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    #[must_use]
    pub fn document(&self) -> &Html {
        &self.document
    }

    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Visible text of the whole page with source line breaks intact.
    pub fn body_text(&self) -> &str {
        self.body_text.get_or_init(|| raw_text(self.root()))
    }

    /// Space-joined text of each main content area, in document order.
    pub fn content_area_texts(&self) -> &[String] {
        self.content_texts.get_or_init(|| {
            content_areas(&self.document)
                .into_iter()
                .map(|area| visible_text(area, " "))
                .collect()
        })
    }
}
