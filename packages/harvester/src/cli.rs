//! Command-line interface for the harvester.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    ScrapeConfig, ARTICLES_OUTPUT_FILE, DEFAULT_LIMITED_COUNT, LIMITED_OUTPUT_FILE,
    RECITALS_OUTPUT_FILE,
};
use crate::error::{HarvesterError, Result};
use crate::harvester::Harvester;
use crate::output::save_run;
use crate::types::{DocumentId, DocumentKind, ScrapeRun};

/// AI Act Harvester - Scrape EU AI Act articles and recitals into JSON records.
#[derive(Parser)]
#[command(name = "aiact-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape the first few articles, one at a time.
    Limited {
        /// Number of articles to scrape
        #[arg(short, long, default_value_t = DEFAULT_LIMITED_COUNT)]
        count: u32,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Scrape every article or every recital.
    Full {
        /// Document type to scrape
        #[arg(short, long, value_enum, default_value_t = DocumentKind::Article)]
        kind: DocumentKind,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Fetch one page and show every extracted field.
    Inspect {
        /// Document type
        #[arg(value_enum)]
        kind: DocumentKind,

        /// Article or recital number
        number: u32,
    },
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ScrapeConfig::from_env()?;

    match cli.command {
        Commands::Limited { count, output_dir } => {
            let output_dir = resolve_output_dir(output_dir.as_deref())?;
            let harvester = Harvester::from_config(config)?;
            let progress = progress_bar(u64::from(count));
            let run = harvester
                .with_progress(progress.clone())
                .scrape_limited(count as usize)
                .await;
            progress.finish_and_clear();
            report_and_save(&run, &output_dir, LIMITED_OUTPUT_FILE)
        }
        Commands::Full { kind, output_dir } => {
            let output_dir = resolve_output_dir(output_dir.as_deref())?;
            let harvester = Harvester::from_config(config)?;
            let progress = progress_bar(kind.full_range().len() as u64);
            let run = harvester
                .with_progress(progress.clone())
                .scrape_all(kind)
                .await;
            progress.finish_and_clear();
            let file_name = match kind {
                DocumentKind::Article => ARTICLES_OUTPUT_FILE,
                DocumentKind::Recital => RECITALS_OUTPUT_FILE,
            };
            report_and_save(&run, &output_dir, file_name)
        }
        Commands::Inspect { kind, number } => {
            inspect_command(config, DocumentId::new(kind, number)).await
        }
    }
}

/// Output directory must already exist; it is checked before any request.
fn resolve_output_dir(output_dir: Option<&Path>) -> Result<PathBuf> {
    let Some(output_dir) = output_dir else {
        return Ok(PathBuf::from("."));
    };

    if !output_dir.exists() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(output_dir.to_path_buf())
}

fn progress_bar(length: u64) -> ProgressBar {
    let pb = ProgressBar::new(length);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn report_and_save(run: &ScrapeRun, output_dir: &Path, file_name: &str) -> Result<()> {
    println!(
        "{} {} {}s",
        style("Scraped").bold(),
        style(run.metadata.total).cyan(),
        run.metadata.kind
    );

    let mut dates: BTreeMap<&str, usize> = BTreeMap::new();
    for document in &run.documents {
        *dates.entry(document.active_date.as_str()).or_default() += 1;
    }
    for (date, count) in dates {
        println!("  {}: {count}", style(date).green());
    }

    let output_path = save_run(run, output_dir, file_name)?;

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );
    Ok(())
}

async fn inspect_command(config: ScrapeConfig, id: DocumentId) -> Result<()> {
    let harvester = Harvester::from_config(config)?;

    println!(
        "{} {}",
        style("Inspecting").bold(),
        style(harvester.document_url(id)).cyan()
    );
    println!();

    let inspection = harvester.inspect(id).await?;
    let document = &inspection.document;

    println!("  Id: {}", style(document.id).green());
    println!("  Title: {}", style(&document.title).green());
    println!("  Chapter: {}", document.chapter);
    println!(
        "  Active date: {} ({}, {})",
        document.active_date,
        document.phase.as_str(),
        document.status.as_str()
    );
    println!("  Date source: {}", inspection.date_source.as_str());

    let references: Vec<String> = document.references.iter().map(ToString::to_string).collect();
    println!("  Connected to: [{}]", references.join(", "));
    println!("  Summary: {}", preview(&document.summary));
    println!("  Content: {}", preview(&document.content));

    println!();
    println!("{}", style("Strategies:").bold());
    for (field, strategy) in &inspection.strategies {
        println!("  {field}: {}", style(strategy).yellow());
    }

    Ok(())
}

/// First characters of a long text.
fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 120;
    if text.is_empty() {
        return "[blank]".to_string();
    }
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_limited_defaults() {
        let cli = Cli::parse_from(["aiact-harvester", "limited"]);

        let Commands::Limited { count, output_dir } = cli.command else {
            panic!("expected limited command");
        };
        assert_eq!(count, 5);
        assert!(output_dir.is_none());
    }

    #[test]
    fn test_cli_parse_full_recitals() {
        let cli = Cli::parse_from([
            "aiact-harvester",
            "full",
            "--kind",
            "recitals",
            "--output-dir",
            "out",
        ]);

        let Commands::Full { kind, output_dir } = cli.command else {
            panic!("expected full command");
        };
        assert_eq!(kind, DocumentKind::Recital);
        assert_eq!(output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["aiact-harvester", "inspect", "article", "5"]);

        let Commands::Inspect { kind, number } = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(kind, DocumentKind::Article);
        assert_eq!(number, 5);
    }

    #[test]
    fn test_resolve_output_dir() {
        assert_eq!(resolve_output_dir(None).unwrap(), PathBuf::from("."));
        assert!(resolve_output_dir(Some(Path::new("/definitely/not/here"))).is_err());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview(""), "[blank]");
        assert_eq!(preview("short"), "short");
        assert!(preview(&"x".repeat(200)).ends_with("..."));
    }
}
