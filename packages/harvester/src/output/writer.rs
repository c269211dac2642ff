//! JSON writer for scrape runs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{CONTINENT, SOURCE_TYPE};
use crate::error::Result;
use crate::text::char_len;
use crate::types::{Document, DocumentId, DocumentKind, Phase, RunMetadata, ScrapeRun, Status};

/// Flat record consumed by the downstream uploader.
#[derive(Debug, Serialize)]
struct DocumentRecord<'a> {
    id: DocumentId,
    #[serde(rename = "type")]
    kind: DocumentKind,
    title: &'a str,
    continent: &'static str,
    #[serde(rename = "sourceType")]
    source_type: &'static str,
    content: &'a str,
    content_length: usize,
    summary: &'a str,
    summary_length: usize,
    chapter: &'a str,
    connected_to: &'a [DocumentId],
    active_date: &'a str,
    phase: Phase,
    status: Status,
    url: &'a str,
}

impl<'a> From<&'a Document> for DocumentRecord<'a> {
    fn from(document: &'a Document) -> Self {
        Self {
            id: document.id,
            kind: document.kind(),
            title: &document.title,
            continent: CONTINENT,
            source_type: SOURCE_TYPE,
            content: &document.content,
            content_length: char_len(&document.content),
            summary: &document.summary,
            summary_length: char_len(&document.summary),
            chapter: &document.chapter,
            connected_to: &document.references,
            active_date: &document.active_date,
            phase: document.phase,
            status: document.status,
            url: &document.url,
        }
    }
}

/// Serialize documents as a pretty-printed JSON array, in the given order.
pub fn generate_json(documents: &[Document]) -> Result<String> {
    let records: Vec<DocumentRecord<'_>> = documents.iter().map(DocumentRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Path of the metadata sidecar next to an output file (`<stem>.meta.json`).
///
/// # Examples
/// ```
/// use std::path::Path;
/// use aiact_harvester::output::metadata_path;
///
/// assert_eq!(
///     metadata_path(Path::new("out/eu_ai_act.json")),
///     Path::new("out/eu_ai_act.meta.json")
/// );
/// ```
pub fn metadata_path(output_file: &Path) -> PathBuf {
    let stem = output_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_file.with_file_name(format!("{stem}.meta.json"))
}

/// Write `content` to `path` via a temp file, sync, then rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?; // Ensure data is flushed to disk
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

fn metadata_json(metadata: &RunMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}

/// Save a run as `<output_dir>/<file_name>` plus its metadata sidecar.
///
/// # Returns
/// Path of the written document file.
pub fn save_run(run: &ScrapeRun, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let output_file = output_dir.join(file_name);
    write_atomic(&output_file, &generate_json(&run.documents)?)?;
    write_atomic(&metadata_path(&output_file), &metadata_json(&run.metadata)?)?;

    tracing::debug!(path = %output_file.display(), total = run.documents.len(), "Run saved");
    Ok(output_file)
}
