//! Error types for the harvester.
//!
//! Only configuration errors are fatal to a run. Network errors are raised per
//! document and isolated by the orchestrator; extraction never fails, it
//! degrades to sentinel values instead.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: '{0}'. Expected an absolute http(s) URL (e.g., https://artificialintelligenceact.eu)")]
    InvalidBaseUrl(String),

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2025-02-02)")]
    InvalidDate(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request failed before a response arrived (timeout, connection refused, ...).
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvesterError {
    /// Whether this error came from fetching a page.
    ///
    /// Network errors are never fatal to a batch; the orchestrator logs them
    /// and omits the affected document.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvesterError::InvalidBaseUrl("ftp://nope".to_string());
        assert!(err.to_string().contains("ftp://nope"));
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_http_status_display() {
        let err = HarvesterError::HttpStatus {
            url: "https://artificialintelligenceact.eu/article/999/".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Request to https://artificialintelligenceact.eu/article/999/ returned HTTP 404"
        );
    }

    #[test]
    fn test_is_network() {
        let status = HarvesterError::HttpStatus {
            url: "u".to_string(),
            status: 500,
        };
        assert!(status.is_network());
        assert!(!HarvesterError::InvalidConfig("workers".to_string()).is_network());
        assert!(!HarvesterError::InvalidDate("x".to_string()).is_network());
    }
}
