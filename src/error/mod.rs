//! Error handling for the lab KPI pipelines.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use chrono::NaiveDate;
use parquet::errors::ParquetError;

/// Errors raised while loading or transforming laboratory data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding or converting Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading a Parquet file
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error reading or writing JSON (configuration, reports)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is missing from the input
    #[error("Column '{column}' not found")]
    ColumnNotFound {
        /// Normalized column name
        column: String,
    },

    /// A cell could not be parsed into the expected type
    #[error("Malformed value {value:?} in column '{column}' at row {row}")]
    MalformedValue {
        /// Zero-based data row (header excluded)
        row: usize,
        /// Column name
        column: String,
        /// Raw cell content, empty for nulls
        value: String,
    },

    /// The requested date window starts after it ends
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Window start
        start: NaiveDate,
        /// Window end
        end: NaiveDate,
    },

    /// The input file has no header row
    #[error("Input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    /// The input file extension is not a supported format
    #[error("Unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A blocking load task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    /// Shorthand for a malformed cell error
    pub fn malformed(row: usize, column: &str, value: impl Into<String>) -> Self {
        Self::MalformedValue {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }

    /// Whether the error concerns a single row rather than the whole input
    #[must_use]
    pub const fn is_row_level(&self) -> bool {
        matches!(self, Self::MalformedValue { .. })
    }
}

/// Result type for lab KPI operations
pub type Result<T> = std::result::Result<T, Error>;
