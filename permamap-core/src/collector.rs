//! Upload log collection
//!
//! Scans an input directory for transaction log files and parses each
//! into a flat sequence of upload records. Malformed files are reported
//! per file and never abort the rest of the run.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::record::UploadRecord;

/// File extension eligible log files must carry.
const LOG_EXTENSION: &str = ".json";

/// Files with this substring in their name are generated manifests, not
/// logs, and must not be re-ingested as input.
const MANIFEST_MARKER: &str = "manifest";

/// Wrapper field accepted around an array of records.
const TRANSACTIONS_FIELD: &str = "transactions";

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("input directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized log format: expected an array of records, a transactions wrapper, or a single record")]
    UnrecognizedShape,
}

/// Outcome of reading one discovered log file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Parsed cleanly, contributing this many records.
    Parsed { count: usize },
    /// Failed to read or parse; the file contributes nothing.
    Failed { reason: CollectError },
}

/// A discovered log file together with its outcome.
#[derive(Debug)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

/// Everything collected from one input directory.
#[derive(Debug, Default)]
pub struct Collection {
    /// All records from successfully parsed files, in sorted-file-name
    /// order then in-file order.
    pub records: Vec<UploadRecord>,
    /// One report per eligible file, in the same order.
    pub reports: Vec<FileReport>,
}

impl Collection {
    pub fn files_failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| matches!(report.outcome, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Name-based eligibility check for directory entries.
fn is_log_file(name: &str) -> bool {
    name.ends_with(LOG_EXTENSION) && !name.contains(MANIFEST_MARKER)
}

fn has_string_value(object: &serde_json::Map<String, Value>, key: &str) -> bool {
    matches!(object.get(key), Some(Value::String(s)) if !s.is_empty())
}

/// Parse the contents of one log file into records.
///
/// Three shapes are accepted transparently: a top-level array of
/// records, an object wrapping an array under `transactions`, or a bare
/// single record carrying both `archiveId` and `storageTxId`. Anything
/// else is an unrecognized-shape error for that file.
pub fn parse_log(content: &str) -> Result<Vec<UploadRecord>, CollectError> {
    let value: Value = serde_json::from_str(content)?;

    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(object) => {
            if let Some(transactions) = object.get(TRANSACTIONS_FIELD) {
                if transactions.is_array() {
                    return Ok(serde_json::from_value(transactions.clone())?);
                }
            }
            if has_string_value(&object, "archiveId") && has_string_value(&object, "storageTxId") {
                let record: UploadRecord = serde_json::from_value(Value::Object(object))?;
                return Ok(vec![record]);
            }
            Err(CollectError::UnrecognizedShape)
        }
        _ => Err(CollectError::UnrecognizedShape),
    }
}

/// Collect all upload records from the eligible files in `input_dir`.
///
/// Discovered file names are sorted before reading so record order is
/// reproducible across platforms. A missing directory is fatal; an
/// empty one yields an empty collection (the caller decides fatality
/// from the final record count).
pub async fn collect(input_dir: &Path) -> Result<Collection, CollectError> {
    let mut dir = match tokio::fs::read_dir(input_dir).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CollectError::MissingDir(input_dir.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_log_file(&name) && entry.file_type().await?.is_file() {
            names.push(name);
        }
    }
    names.sort();

    let mut collection = Collection::default();
    for name in names {
        let outcome = match read_log(&input_dir.join(&name)).await {
            Ok(records) => {
                let count = records.len();
                collection.records.extend(records);
                FileOutcome::Parsed { count }
            }
            Err(reason) => FileOutcome::Failed { reason },
        };
        collection.reports.push(FileReport { name, outcome });
    }

    Ok(collection)
}

async fn read_log(path: &Path) -> Result<Vec<UploadRecord>, CollectError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_log(&content)
}
