//! Error types for dataset readers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the dataset or reference pools.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row does not have the expected number of columns
    #[error("Malformed row at line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A GeoJSON feature lacks a required property
    #[error("Feature {feature} is missing string property '{property}'")]
    MissingProperty {
        feature: usize,
        property: &'static str,
    },

    /// Batches must hold at least one event
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }
}
