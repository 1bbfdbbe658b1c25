//! Error types for sweep-aggregate
//!
//! Parse failures and empty runs abort the whole aggregation pass: a dropped
//! run would silently change the denominator of every cross-run mean.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// sweep-aggregate error types
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unreadable run file, wrong field count, non-numeric token or bad filename
    #[error("Format error: {0}")]
    Format(String),

    /// A run file (or in-memory run) produced zero day records
    #[error("Empty run: {}\nA run with zero day records cannot join an experiment group", path.display())]
    EmptyRun {
        /// Source of the offending run
        path: PathBuf,
    },

    /// Invalid configuration or API input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (Parquet/Arrow export)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::Format`] that names the offending file.
    pub(crate) fn format_in(path: &std::path::Path, detail: impl std::fmt::Display) -> Self {
        Self::Format(format!("{}: {detail}", path.display()))
    }

    /// Prefix a [`Error::Format`] message with the offending file.
    pub(crate) fn in_file(self, path: &std::path::Path) -> Self {
        match self {
            Self::Format(detail) => Self::format_in(path, detail),
            other => other,
        }
    }

    /// Whether this error came from malformed input data.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Whether this error reports a run with no records.
    #[must_use]
    pub const fn is_empty_run(&self) -> bool {
        matches!(self, Self::EmptyRun { .. })
    }
}
