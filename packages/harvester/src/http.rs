//! HTTP fetching of article and recital pages.
//!
//! Exactly one request per document: no retries. The orchestrator isolates
//! failures per id, so a failed fetch only drops that one document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::error::{HarvesterError, Result};

/// Source of raw page bodies, enabling mocking in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the body at `url`, giving up after `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::Client` with the given identity and default timeout.
pub fn create_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Convert a response body to a string.
///
/// Pages that are not valid UTF-8 are decoded lossily; a warning is logged.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(
                context,
                error = %e,
                "Response is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Page source backed by a single shared `reqwest::Client`.
///
/// The client pools connections, so one instance is reused for a whole run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from the run configuration.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        let client = create_client(&config.user_agent, config.article_timeout)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!(url, timeout_secs = timeout.as_secs(), "Fetching page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| HarvesterError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvesterError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| HarvesterError::Network {
                url: url.to_string(),
                source,
            })?;

        Ok(bytes_to_string(&bytes, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client("test-agent", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_bytes_to_string_valid_utf8() {
        assert_eq!(bytes_to_string("Artikel één".as_bytes(), "test"), "Artikel één");
    }

    #[test]
    fn test_bytes_to_string_lossy() {
        let bytes = [b'A', 0xFF, b'B'];
        assert_eq!(bytes_to_string(&bytes, "test"), "A\u{FFFD}B");
    }
}
