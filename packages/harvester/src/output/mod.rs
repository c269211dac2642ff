//! JSON output generation for scrape runs.

mod writer;

pub use writer::{generate_json, metadata_path, save_run};
