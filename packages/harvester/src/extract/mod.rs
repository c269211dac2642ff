//! Field extraction from parsed pages.
//!
//! Every field has a [`Chain`] of ranked strategies. Extraction never fails:
//! a field whose chain is exhausted takes its sentinel value.

mod chain;
pub mod chapter;
pub mod content;
pub mod recital;
pub mod references;
pub mod summary;
pub mod title;

pub use chain::{Chain, Extraction, Strategy, SENTINEL_STRATEGY};
pub use references::ReferenceValidator;

use crate::html::Page;
use crate::types::{DocumentId, DocumentKind, NO_SUMMARY, UNKNOWN_CHAPTER, UNTITLED};

/// The chains used for one document kind.
#[derive(Debug)]
pub struct FieldChains {
    pub title: Chain<String>,
    pub content: Chain<String>,
    pub summary: Chain<String>,
    pub chapter: Chain<String>,
}

impl FieldChains {
    #[must_use]
    pub fn articles() -> Self {
        Self {
            title: title::article_chain(),
            content: content::article_chain(),
            summary: summary::article_chain(),
            chapter: chapter::article_chain(),
        }
    }

    #[must_use]
    pub fn recitals() -> Self {
        Self {
            title: title::recital_chain(),
            content: recital::recital_chain(),
            summary: summary::recital_chain(),
            chapter: chapter::recital_chain(),
        }
    }
}

/// All fields of one page, with the strategy that produced each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Extraction<String>,
    pub content: Extraction<String>,
    pub summary: Extraction<String>,
    pub chapter: Extraction<String>,
    pub references: Vec<DocumentId>,
}

impl ExtractedFields {
    /// `(field, strategy)` pairs for diagnostics.
    #[must_use]
    pub fn strategies(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("title", self.title.strategy),
            ("content", self.content.strategy),
            ("summary", self.summary.strategy),
            ("chapter", self.chapter.strategy),
        ]
    }
}

/// Runs the field chains for either document kind.
#[derive(Debug)]
pub struct Extractor {
    articles: FieldChains,
    recitals: FieldChains,
    references: ReferenceValidator,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ReferenceValidator::default())
    }
}

impl Extractor {
    #[must_use]
    pub fn new(references: ReferenceValidator) -> Self {
        Self {
            articles: FieldChains::articles(),
            recitals: FieldChains::recitals(),
            references,
        }
    }

    #[must_use]
    pub fn chains(&self, kind: DocumentKind) -> &FieldChains {
        match kind {
            DocumentKind::Article => &self.articles,
            DocumentKind::Recital => &self.recitals,
        }
    }

    /// Extract every field of a page.
    pub fn extract(&self, page: &Page<'_>) -> ExtractedFields {
        let kind = page.id().kind;
        let chains = self.chains(kind);

        let references = match kind {
            DocumentKind::Article => self.references.extract(page.body_text()),
            DocumentKind::Recital => Vec::new(),
        };

        ExtractedFields {
            title: chains.title.run_or(page, || UNTITLED.to_string()),
            content: chains.content.run_or(page, String::new),
            summary: chains.summary.run_or(page, || NO_SUMMARY.to_string()),
            chapter: chains.chapter.run_or(page, || UNKNOWN_CHAPTER.to_string()),
            references,
        }
    }
}
