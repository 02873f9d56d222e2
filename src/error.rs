//! Error types for the slop detector library

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the library
///
/// Parse failures are deliberately absent: they are folded into a
/// `CRITICAL_DEFICIT` analysis instead of being raised.
#[derive(Error, Debug)]
pub enum SlopError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid jargon term '{term}': {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SlopResult<T> = Result<T, SlopError>;
