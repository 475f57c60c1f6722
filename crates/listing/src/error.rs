//! Error types for the Listing library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Listing operations.
///
/// Per-row validation failures are never reported through this type; they are
/// collected as data in a [`ValidationReport`](crate::validation::ValidationReport).
#[derive(Debug, Error)]
pub enum ListingError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A referenced template, file, mapping or blob does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Error parsing tabular data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error decoding a spreadsheet workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Attribute schema is malformed.
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// Uniqueness violation (e.g., duplicate template name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Error persisting or loading the catalog.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ListingError {
    /// Returns true if the error means the source bytes could not be decoded.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            ListingError::Parse { .. }
                | ListingError::Csv(_)
                | ListingError::Spreadsheet(_)
                | ListingError::EmptyData(_)
        )
    }
}

/// Result type alias for Listing operations.
pub type Result<T> = std::result::Result<T, ListingError>;
