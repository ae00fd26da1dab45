//! Configuration management for Permamap
//!
//! Handles CLI argument parsing and the process-wide environment
//! settings shared with the surrounding services. Settings are
//! resolved once at startup and the process fails fast on malformed
//! values.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Default directory scanned for upload transaction logs.
pub const DEFAULT_INPUT_DIR: &str = "./data/upload-logs";

/// Default output path for the generated manifest.
pub const DEFAULT_OUTPUT_FILE: &str = "./data/manifest.json";

/// Default permanent-storage gateway.
pub const DEFAULT_GATEWAY: &str = "https://arweave.net";

const DEFAULT_PORT: u16 = 3000;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "permamap")]
#[command(about = "Generate a manifest from permanent-storage upload logs", long_about = None)]
#[command(version)]
pub struct Config {
    /// Directory containing transaction log files
    #[arg(long = "input-dir", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Output manifest file path
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,
}

impl Config {
    /// Parse configuration from CLI arguments.
    pub fn from_cli() -> Self {
        Self::parse()
    }
}

/// Typed settings resolved from the process environment.
///
/// This is the configuration contract shared with the surrounding
/// services; the pipeline itself only consumes `gateway_url` and
/// `log_level`, but every value read is validated so a misconfigured
/// deployment fails at startup rather than mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub log_level: String,
    pub gateway_url: String,
    pub database_url: Option<String>,
    pub rpc_url: Option<String>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("expected a port number, got {raw:?}"),
            })?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::Invalid {
                name: "LOG_LEVEL",
                reason: format!("expected one of {LOG_LEVELS:?}, got {log_level:?}"),
            });
        }

        let gateway_url = lookup("ARWEAVE_GATEWAY").unwrap_or_else(|| DEFAULT_GATEWAY.to_string());
        require_http_url("ARWEAVE_GATEWAY", &gateway_url)?;
        // Trailing slashes would double up in derived URLs.
        let gateway_url = gateway_url.trim_end_matches('/').to_string();

        let database_url = lookup("DATABASE_URL");
        if let Some(ref url) = database_url {
            require_connection_string("DATABASE_URL", url)?;
        }

        let rpc_url = lookup("BASE_RPC_URL");
        if let Some(ref url) = rpc_url {
            require_http_url("BASE_RPC_URL", url)?;
        }

        Ok(Self {
            port,
            log_level,
            gateway_url,
            database_url,
            rpc_url,
        })
    }
}

fn require_http_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            reason: format!("expected an http(s) URL, got {value:?}"),
        })
    }
}

fn require_connection_string(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.contains("://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            reason: format!("expected a connection URL, got {value:?}"),
        })
    }
}
