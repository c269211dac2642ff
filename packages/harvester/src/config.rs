//! Configuration constants and validation functions for the harvester.

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;

use crate::error::{HarvesterError, Result};
use crate::types::{DocumentId, DocumentKind};

/// Public site hosting the consolidated AI Act text.
pub const DEFAULT_BASE_URL: &str = "https://artificialintelligenceact.eu";

/// Browser-like identity; the site serves stripped pages to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Number of articles in the regulation.
pub const ARTICLE_COUNT: u32 = 113;

/// Number of recitals in the preamble.
pub const RECITAL_COUNT: u32 = 180;

/// Per-request timeout for article pages, in seconds.
pub const ARTICLE_TIMEOUT_SECS: u64 = 30;

/// Per-request timeout for recital pages, in seconds.
pub const RECITAL_TIMEOUT_SECS: u64 = 10;

/// Worker pool size for the article range.
///
/// Kept small to avoid overwhelming the remote source.
pub const DEFAULT_ARTICLE_WORKERS: usize = 2;

/// Largest plausible number of linked recitals for one article.
///
/// Bigger sets come from navigation menus being picked up as references.
pub const DEFAULT_REFERENCE_CEILING: usize = 100;

/// Characters scanned after the "Suitable Recitals" anchor.
pub const REFERENCE_WINDOW_CHARS: usize = 500;

/// Delay between serial recital requests, in milliseconds.
pub const RECITAL_DELAY_MS: u64 = 500;

/// Delay between requests of a limited article scrape, in milliseconds.
pub const LIMITED_DELAY_MS: u64 = 1000;

/// Default number of articles in a limited scrape.
pub const DEFAULT_LIMITED_COUNT: u32 = 5;

/// Provenance tags carried on every record.
pub const CONTINENT: &str = "Europe";
pub const SOURCE_TYPE: &str = "NGO";

/// Output file of a limited scrape.
pub const LIMITED_OUTPUT_FILE: &str = "articles_limited.json";

/// Output file of a full article scrape.
pub const ARTICLES_OUTPUT_FILE: &str = "eu_ai_act.json";

/// Output file of a full recital scrape.
pub const RECITALS_OUTPUT_FILE: &str = "eu_ai_act_recitals.json";

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate that a base URL is an absolute http(s) URL.
///
/// # Examples
/// ```
/// use aiact_harvester::config::validate_base_url;
///
/// assert!(validate_base_url("https://artificialintelligenceact.eu").is_ok());
/// assert!(validate_base_url("artificialintelligenceact.eu").is_err());
/// ```
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed =
        Url::parse(base_url).map_err(|_| HarvesterError::InvalidBaseUrl(base_url.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(HarvesterError::InvalidBaseUrl(base_url.to_string())),
    }
}

/// Validate date format (YYYY-MM-DD) and that it is a real calendar date.
///
/// # Examples
/// ```
/// use aiact_harvester::config::validate_date;
///
/// assert!(validate_date("2025-02-02").is_ok());
/// assert!(validate_date("2025-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    Ok(())
}

/// Build the page URL of a document.
///
/// # Examples
/// ```
/// use aiact_harvester::config::document_url;
/// use aiact_harvester::types::DocumentId;
///
/// assert_eq!(
///     document_url("https://artificialintelligenceact.eu/", DocumentId::article(5)),
///     "https://artificialintelligenceact.eu/article/5/"
/// );
/// ```
pub fn document_url(base_url: &str, id: DocumentId) -> String {
    format!(
        "{}/{}/{}/",
        base_url.trim_end_matches('/'),
        id.kind.as_str(),
        id.number
    )
}

/// Runtime configuration of a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub article_timeout: Duration,
    pub recital_timeout: Duration,
    pub article_workers: usize,
    pub reference_ceiling: usize,
    pub recital_delay: Duration,
    pub limited_delay: Duration,

    /// Override for "today" when deriving status; local date when `None`.
    pub reference_date: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            article_timeout: Duration::from_secs(ARTICLE_TIMEOUT_SECS),
            recital_timeout: Duration::from_secs(RECITAL_TIMEOUT_SECS),
            article_workers: DEFAULT_ARTICLE_WORKERS,
            reference_ceiling: DEFAULT_REFERENCE_CEILING,
            recital_delay: Duration::from_millis(RECITAL_DELAY_MS),
            limited_delay: Duration::from_millis(LIMITED_DELAY_MS),
            reference_date: None,
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            base_url: std::env::var("AIACT_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: std::env::var("AIACT_USER_AGENT").unwrap_or(defaults.user_agent),
            article_timeout: Duration::from_secs(env_or(
                "AIACT_ARTICLE_TIMEOUT_SECS",
                ARTICLE_TIMEOUT_SECS,
            )?),
            recital_timeout: Duration::from_secs(env_or(
                "AIACT_RECITAL_TIMEOUT_SECS",
                RECITAL_TIMEOUT_SECS,
            )?),
            article_workers: env_or("AIACT_ARTICLE_WORKERS", DEFAULT_ARTICLE_WORKERS)?,
            reference_ceiling: env_or("AIACT_REFERENCE_CEILING", DEFAULT_REFERENCE_CEILING)?,
            reference_date: std::env::var("AIACT_REFERENCE_DATE").ok(),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a config builder, mostly for tests.
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder {
            config: Self::default(),
        }
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;

        if self.article_workers == 0 {
            return Err(HarvesterError::InvalidConfig(
                "article worker pool needs at least one worker".to_string(),
            ));
        }

        if let Some(date) = &self.reference_date {
            validate_date(date)?;
        }

        Ok(())
    }

    /// Per-request timeout for a document kind.
    #[must_use]
    pub fn timeout_for(&self, kind: DocumentKind) -> Duration {
        match kind {
            DocumentKind::Article => self.article_timeout,
            DocumentKind::Recital => self.recital_timeout,
        }
    }
}

/// Read and parse an environment variable, using `default` when it is unset.
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| HarvesterError::InvalidConfig(format!("{key}='{value}' is not valid"))),
        Err(_) => Ok(default),
    }
}

/// Builder for constructing `ScrapeConfig`.
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn article_timeout(mut self, timeout: Duration) -> Self {
        self.config.article_timeout = timeout;
        self
    }

    pub fn recital_timeout(mut self, timeout: Duration) -> Self {
        self.config.recital_timeout = timeout;
        self
    }

    pub fn article_workers(mut self, workers: usize) -> Self {
        self.config.article_workers = workers;
        self
    }

    pub fn reference_ceiling(mut self, ceiling: usize) -> Self {
        self.config.reference_ceiling = ceiling;
        self
    }

    pub fn recital_delay(mut self, delay: Duration) -> Self {
        self.config.recital_delay = delay;
        self
    }

    pub fn limited_delay(mut self, delay: Duration) -> Self {
        self.config.limited_delay = delay;
        self
    }

    pub fn reference_date(mut self, date: impl Into<String>) -> Self {
        self.config.reference_date = Some(date.into());
        self
    }

    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}
