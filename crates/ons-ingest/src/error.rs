//! Error types for release ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or reading release workbooks.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File name does not carry a `_v<N>.` version marker.
    #[error("cannot parse a release version from file name '{file_name}'")]
    InvalidFileName { file_name: String },

    // === Workbook Errors ===
    /// Workbook could not be opened.
    #[error("failed to open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// Requested sheet is not part of the workbook.
    #[error("sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    /// Sheet exists but could not be decoded.
    #[error("failed to read sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    /// A header row lies beyond the last row of the sheet.
    #[error("header row {row} is out of range for sheet '{sheet}' ({available} rows)")]
    HeaderOutOfRange {
        sheet: String,
        row: usize,
        available: usize,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
