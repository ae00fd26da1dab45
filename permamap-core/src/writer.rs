//! Durable manifest output
//!
//! Serializes the manifest and writes it with atomic-replace semantics:
//! the document lands at a sibling temporary path first and is renamed
//! into place, so a crash mid-write never leaves a truncated manifest
//! as the only instance of the output path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::manifest::Manifest;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize `manifest` and atomically replace the file at `output`.
///
/// The whole document is built in memory and written in one operation;
/// there is no partial or streaming write.
pub async fn write_manifest(manifest: &Manifest, output: &Path) -> Result<(), WriteError> {
    let json = serde_json::to_string_pretty(manifest)?;

    let tmp = tmp_path(output);
    tokio::fs::write(&tmp, json.as_bytes())
        .await
        .map_err(|source| WriteError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, output)
        .await
        .map_err(|source| WriteError::Io {
            path: output.to_path_buf(),
            source,
        })?;

    debug!("manifest written to {}", output.display());
    Ok(())
}

/// Sibling temporary path in the same directory, so the final rename
/// never crosses a filesystem boundary.
fn tmp_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "manifest.json".into());
    name.push(".tmp");
    output.with_file_name(name)
}
