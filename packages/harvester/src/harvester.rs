//! Main harvester service that ties all components together.

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;

use crate::config::{document_url, ScrapeConfig};
use crate::dates::{phase_for_date, today, DateResolver, DateSource, MilestoneResolver};
use crate::error::Result;
use crate::extract::{Extractor, ReferenceValidator};
use crate::html::Page;
use crate::http::{HttpFetcher, PageSource};
use crate::types::{
    Document, DocumentId, DocumentKind, IdRange, RunMetadata, ScrapeRun, Status,
};

/// One extracted document plus how each field was obtained.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub document: Document,

    /// `(field, strategy)` pairs in field order.
    pub strategies: Vec<(&'static str, &'static str)>,
    pub date_source: DateSource,
}

/// Fetches and extracts documents over an id range.
///
/// The page source and date resolver are injected so tests can run without
/// network access or a fixed clock.
pub struct Harvester<S, R = MilestoneResolver> {
    source: S,
    resolver: R,
    extractor: Extractor,
    config: ScrapeConfig,
    progress: ProgressBar,
}

impl Harvester<HttpFetcher> {
    /// Validate the configuration and build the HTTP-backed harvester.
    ///
    /// Configuration errors surface here, before any request is made.
    pub fn from_config(config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpFetcher::from_config(&config)?;
        Ok(Self::new(source, MilestoneResolver, config))
    }
}

impl<S: PageSource, R: DateResolver> Harvester<S, R> {
    #[must_use]
    pub fn new(source: S, resolver: R, config: ScrapeConfig) -> Self {
        let extractor = Extractor::new(ReferenceValidator::new(config.reference_ceiling));
        Self {
            source,
            resolver,
            extractor,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-document progress on `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    #[must_use]
    pub fn document_url(&self, id: DocumentId) -> String {
        document_url(&self.config.base_url, id)
    }

    /// Date used to derive status: the configured reference date, or today.
    #[must_use]
    pub fn current_date(&self) -> String {
        self.config.reference_date.clone().unwrap_or_else(today)
    }

    /// Turn a fetched page into a document.
    ///
    /// Synchronous: the parsed DOM is dropped before the caller awaits again.
    pub fn extract_document(
        &self,
        id: DocumentId,
        url: String,
        raw: &str,
        current_date: &str,
    ) -> Inspection {
        let page = Page::parse(id, raw);
        let fields = self.extractor.extract(&page);
        let resolved = self.resolver.resolve(&page);
        let strategies = fields.strategies();

        let document = Document {
            id,
            title: fields.title.value,
            content: fields.content.value,
            summary: fields.summary.value,
            chapter: fields.chapter.value,
            references: fields.references,
            phase: phase_for_date(&resolved.active_date),
            status: Status::from_dates(&resolved.active_date, current_date),
            active_date: resolved.active_date,
            url,
        };

        Inspection {
            document,
            strategies,
            date_source: resolved.source,
        }
    }

    async fn fetch_document(&self, id: DocumentId, current_date: &str) -> Result<Inspection> {
        let url = self.document_url(id);
        let raw = self
            .source
            .fetch(&url, self.config.timeout_for(id.kind))
            .await?;
        Ok(self.extract_document(id, url, &raw, current_date))
    }

    /// Fetch and extract a single document.
    pub async fn scrape_document(&self, id: DocumentId) -> Result<Document> {
        let inspection = self.inspect(id).await?;
        Ok(inspection.document)
    }

    /// Fetch a single document and report how each field was extracted.
    pub async fn inspect(&self, id: DocumentId) -> Result<Inspection> {
        self.fetch_document(id, &self.current_date()).await
    }

    /// Scrape articles through a bounded pool of concurrent fetches.
    pub async fn scrape_articles(&self, range: &IdRange) -> ScrapeRun {
        let current_date = self.current_date();
        let current_date = current_date.as_str();
        let workers = self.config.article_workers.max(1);

        tracing::info!(count = range.len(), workers, "Scraping articles");
        self.progress.set_length(range.len() as u64);

        let mut results = stream::iter(range.iter())
            .map(|number| {
                let id = DocumentId::article(number);
                async move { (id, self.fetch_document(id, current_date).await) }
            })
            .buffer_unordered(workers);

        let mut documents = Vec::with_capacity(range.len());
        while let Some((id, result)) = results.next().await {
            self.record(id, result, &mut documents);
        }

        self.finish(DocumentKind::Article, documents)
    }

    /// Scrape recitals one at a time.
    pub async fn scrape_recitals(&self, range: &IdRange) -> ScrapeRun {
        self.scrape_serial(DocumentKind::Recital, range, self.config.recital_delay)
            .await
    }

    /// Scrape the first `count` articles one at a time, for quick checks.
    pub async fn scrape_limited(&self, count: usize) -> ScrapeRun {
        let range = DocumentKind::Article.full_range().take(count);
        self.scrape_serial(DocumentKind::Article, &range, self.config.limited_delay)
            .await
    }

    /// Scrape the complete id space of a kind.
    pub async fn scrape_all(&self, kind: DocumentKind) -> ScrapeRun {
        let range = kind.full_range();
        match kind {
            DocumentKind::Article => self.scrape_articles(&range).await,
            DocumentKind::Recital => self.scrape_recitals(&range).await,
        }
    }

    async fn scrape_serial(
        &self,
        kind: DocumentKind,
        range: &IdRange,
        delay: std::time::Duration,
    ) -> ScrapeRun {
        let current_date = self.current_date();

        tracing::info!(kind = %kind, count = range.len(), "Scraping serially");
        self.progress.set_length(range.len() as u64);

        let mut documents = Vec::with_capacity(range.len());
        for (index, number) in range.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let id = DocumentId::new(kind, number);
            let result = self.fetch_document(id, &current_date).await;
            self.record(id, result, &mut documents);
        }

        self.finish(kind, documents)
    }

    /// Keep a successful document; log and drop a failed one.
    fn record(&self, id: DocumentId, result: Result<Inspection>, documents: &mut Vec<Document>) {
        self.progress.inc(1);
        match result {
            Ok(inspection) => {
                tracing::debug!(id = %id, "Document scraped");
                self.progress.set_message(id.to_string());
                documents.push(inspection.document);
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Skipping document");
            }
        }
    }

    /// Sort by id, keep one document per id, and attach run metadata.
    fn finish(&self, kind: DocumentKind, mut documents: Vec<Document>) -> ScrapeRun {
        documents.sort_by_key(|document| document.id);
        documents.dedup_by_key(|document| document.id);

        let metadata = RunMetadata {
            schema_version: kind.schema_version().to_string(),
            kind,
            total: documents.len(),
            scraped_at: chrono::Local::now().to_rfc3339(),
            continent: crate::config::CONTINENT.to_string(),
            source_type: crate::config::SOURCE_TYPE.to_string(),
        };

        tracing::info!(kind = %kind, total = metadata.total, "Scrape finished");
        ScrapeRun {
            metadata,
            documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::HarvesterError;
    use crate::types::Phase;

    const BASE: &str = "http://stub.test";

    /// Serves canned pages, optionally slowed down to scramble completion order.
    #[derive(Default)]
    struct StubSource {
        pages: HashMap<String, (String, Duration)>,
        requests: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn page(mut self, id: DocumentId, body: &str, delay_ms: u64) -> Self {
            self.pages.insert(
                document_url(BASE, id),
                (body.to_string(), Duration::from_millis(delay_ms)),
            );
            self
        }
    }

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(url) {
                Some((body, delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(body.clone())
                }
                None => Err(HarvesterError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn config() -> ScrapeConfig {
        ScrapeConfig::builder()
            .base_url(BASE)
            .recital_delay(Duration::ZERO)
            .limited_delay(Duration::ZERO)
            .reference_date("2027-01-01")
            .build()
    }

    fn article_page(number: u32) -> String {
        format!("<html><head><title>Article {number}: Test | EU Artificial Intelligence Act</title></head><body></body></html>")
    }

    #[tokio::test]
    async fn test_articles_sorted_despite_completion_order() {
        let source = StubSource::default()
            .page(DocumentId::article(1), &article_page(1), 40)
            .page(DocumentId::article(2), &article_page(2), 0)
            .page(DocumentId::article(3), &article_page(3), 20)
            .page(DocumentId::article(10), &article_page(10), 0);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let run = harvester
            .scrape_articles(&IdRange::from_numbers([10, 3, 2, 1]))
            .await;

        let ids: Vec<_> = run.documents.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3", "A10"]);
        assert_eq!(run.metadata.total, 4);
        assert_eq!(run.metadata.schema_version, "articles_flattened_v1");
    }

    #[tokio::test]
    async fn test_repeated_ids_are_fetched_once() {
        let source = StubSource::default()
            .page(DocumentId::article(1), &article_page(1), 0)
            .page(DocumentId::article(3), &article_page(3), 0);
        let requests = Arc::clone(&source.requests);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let run = harvester
            .scrape_articles(&IdRange::from_numbers([3, 1, 3]))
            .await;

        let ids: Vec<_> = run.documents.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(run.metadata.total, 2);
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_finish_keeps_one_document_per_id() {
        let harvester = Harvester::new(StubSource::default(), MilestoneResolver, config());
        let current_date = harvester.current_date();
        let document = |number: u32| {
            let id = DocumentId::article(number);
            harvester
                .extract_document(id, document_url(BASE, id), &article_page(number), &current_date)
                .document
        };

        let run = harvester.finish(
            DocumentKind::Article,
            vec![document(3), document(1), document(3)],
        );

        let ids: Vec<_> = run.documents.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(run.metadata.total, 2);
    }

    #[tokio::test]
    async fn test_failed_ids_are_omitted() {
        let source = StubSource::default()
            .page(DocumentId::article(1), &article_page(1), 0)
            .page(DocumentId::article(3), &article_page(3), 0);
        let requests = Arc::clone(&source.requests);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let run = harvester.scrape_articles(&IdRange::new(1, 3)).await;

        assert_eq!(requests.load(Ordering::SeqCst), 3);
        assert_eq!(run.documents.len(), 2);
        assert!(run.documents.iter().all(|d| d.id != DocumentId::article(2)));
    }

    #[tokio::test]
    async fn test_document_fields() {
        let source = StubSource::default().page(DocumentId::article(5), &article_page(5), 0);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let inspection = harvester.inspect(DocumentId::article(5)).await.unwrap();
        let document = inspection.document;

        assert_eq!(document.title, "Article 5: Test");
        assert_eq!(document.url, "http://stub.test/article/5/");
        assert_eq!(document.chapter, "Part of Chapter II");
        assert_eq!(document.active_date, "2025-02-02");
        assert_eq!(document.phase, Phase::Prohibitions);
        assert_eq!(document.status, Status::Active);
        assert_eq!(inspection.date_source, DateSource::Milestone);
        assert!(inspection
            .strategies
            .contains(&("summary", "prohibitions_override")));
    }

    #[tokio::test]
    async fn test_inspect_reports_network_error() {
        let harvester = Harvester::new(StubSource::default(), MilestoneResolver, config());
        let err = harvester.inspect(DocumentId::recital(1)).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_recitals_serial() {
        let source = StubSource::default()
            .page(DocumentId::recital(2), "<p>Recital 2</p>", 0)
            .page(DocumentId::recital(1), "<p>Recital 1</p>", 0);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let run = harvester.scrape_recitals(&IdRange::new(1, 3)).await;

        assert_eq!(run.metadata.kind, DocumentKind::Recital);
        assert_eq!(run.metadata.schema_version, "recitals_flattened_v1");
        assert_eq!(run.documents.len(), 2);
        assert_eq!(run.documents[0].title, "Recital 1");
        assert_eq!(run.documents[1].active_date, "2026-08-02");
        assert_eq!(run.documents[1].status, Status::Active);
    }

    #[tokio::test]
    async fn test_limited_takes_first_articles() {
        let source = StubSource::default()
            .page(DocumentId::article(1), &article_page(1), 0)
            .page(DocumentId::article(2), &article_page(2), 0)
            .page(DocumentId::article(3), &article_page(3), 0);
        let requests = Arc::clone(&source.requests);
        let harvester = Harvester::new(source, MilestoneResolver, config());

        let run = harvester.scrape_limited(2).await;

        assert_eq!(requests.load(Ordering::SeqCst), 2);
        assert_eq!(run.documents.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_status_before_reference_date() {
        let config = ScrapeConfig::builder()
            .base_url(BASE)
            .reference_date("2025-06-01")
            .build();
        let source = StubSource::default().page(DocumentId::article(53), &article_page(53), 0);
        let harvester = Harvester::new(source, MilestoneResolver, config);

        let document = harvester
            .scrape_document(DocumentId::article(53))
            .await
            .unwrap();
        assert_eq!(document.active_date, "2025-08-02");
        assert_eq!(document.status, Status::Pending);
    }

    #[test]
    fn test_from_config_rejects_bad_base_url() {
        let config = ScrapeConfig::builder().base_url("not-a-url").build();
        assert!(matches!(
            Harvester::from_config(config),
            Err(HarvesterError::InvalidBaseUrl(_))
        ));
    }
}
