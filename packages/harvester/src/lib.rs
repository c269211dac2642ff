//! AI Act Harvester - Scrape the EU AI Act into structured JSON records.
//!
//! This crate fetches article and recital pages from
//! artificialintelligenceact.eu. It extracts title, body, summary, chapter and
//! recital cross-references with ranked fallback heuristics. It then resolves
//! each document's effective date, lifecycle phase and status.
//!
//! # Example
//!
//! ```
//! use aiact_harvester::config;
//!
//! // Validate the base URL and a reference date
//! assert!(config::validate_base_url("https://artificialintelligenceact.eu").is_ok());
//! assert!(config::validate_date("2027-01-01").is_ok());
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Configuration constants, validation and [`ScrapeConfig`]
//! - [`types`]: Core data types (Document, DocumentId, Phase, Status, etc.)
//! - [`error`]: Error types and Result alias
//! - [`http`]: Page fetching over HTTP
//! - [`html`]: Parsed pages and DOM helpers
//! - [`text`]: Text normalization
//! - [`extract`]: Field extraction chains and the reference validator
//! - [`dates`]: Effective date, phase and status resolution
//! - [`output`]: JSON output generation
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod html;
pub mod http;
pub mod output;
pub mod text;
pub mod types;

// Re-export the service
pub use harvester::{Harvester, Inspection};

// Re-export commonly used items
pub use config::{validate_base_url, validate_date, ScrapeConfig};
pub use error::{HarvesterError, Result};
pub use types::{Document, DocumentId, DocumentKind, IdRange, Phase, ScrapeRun, Status};
