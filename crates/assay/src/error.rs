//! Error types for the Assay library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Assay operations.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to check.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// No persisted descriptor under the given key. Recoverable:
    /// run the build flow and retry.
    #[error("no descriptor found for key '{key}'; run setup first")]
    ConfigNotFound { key: String },

    /// A row's cohort is missing from the threshold descriptor.
    /// Recoverable: rebuild the thresholds from a current reference file.
    #[error("group '{key}' not covered by the threshold descriptor; rebuild thresholds")]
    GroupKeyNotFound { key: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;
