//! Permamap Core
//!
//! Collection, duplicate resolution, and manifest output for
//! permanent-storage upload transaction logs.

pub mod collector;
pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod writer;

pub use collector::{collect, parse_log, CollectError, Collection, FileOutcome, FileReport};
pub use config::{Config, ConfigError, Settings, DEFAULT_GATEWAY, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_FILE};
pub use manifest::{Manifest, ManifestEntry, Metadata, CATALOG_BASE, MANIFEST_VERSION};
pub use pipeline::{run, PipelineError, RunSummary};
pub use record::{RecordError, UploadRecord, ValidRecord};
pub use resolver::{pick_winner, resolve};
pub use writer::{write_manifest, WriteError};
