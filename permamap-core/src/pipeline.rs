//! Pipeline orchestration
//!
//! Runs the collect -> resolve -> write pass and decides which failures
//! are fatal. Progress lines go to stdout; per-file and fatal
//! diagnostics go to the tracing subscriber on stderr.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

use crate::collector::{self, CollectError, FileOutcome};
use crate::config::{Config, Settings};
use crate::manifest::Manifest;
use crate::resolver;
use crate::writer::{self, WriteError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("no transactions found in {}", .0.display())]
    NoRecords(PathBuf),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Summary of one completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_failed: usize,
    pub total_items: usize,
    pub output: PathBuf,
}

/// Run the full manifest pipeline.
///
/// Fatal conditions: missing input directory, zero records collected
/// across all files, or a write failure. Per-file parse failures are
/// reported and the run continues.
pub async fn run(config: &Config, settings: &Settings) -> Result<RunSummary, PipelineError> {
    println!("Generating manifest from {}...", config.input_dir.display());
    println!("Output: {}\n", config.output.display());

    let collection = collector::collect(&config.input_dir).await?;

    if collection.reports.is_empty() {
        warn!("no log files found in {}", config.input_dir.display());
    } else {
        println!(
            "Found {} log file(s), reading transactions...",
            collection.reports.len()
        );
    }

    for report in &collection.reports {
        match &report.outcome {
            FileOutcome::Parsed { count } => {
                println!("  ✓ {}: {} transaction(s)", report.name, count);
            }
            FileOutcome::Failed { reason } => {
                error!("✗ error reading {}: {}", report.name, reason);
            }
        }
    }

    if collection.records.is_empty() {
        return Err(PipelineError::NoRecords(config.input_dir.clone()));
    }

    let files_found = collection.reports.len();
    let files_failed = collection.files_failed();

    let winners = resolver::resolve(collection.records);
    let manifest = Manifest::build(winners, &settings.gateway_url);
    writer::write_manifest(&manifest, &config.output).await?;

    println!("\n✓ Manifest written to {}", config.output.display());
    println!("  Total items: {}", manifest.total_items);

    Ok(RunSummary {
        files_found,
        files_failed,
        total_items: manifest.total_items,
        output: config.output.clone(),
    })
}
