//! Error types for release extraction and grouping.

use ons_ingest::IngestError;
use ons_model::ArrayError;
use thiserror::Error;

/// Errors raised while turning a workbook into a canonical array.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No layout is registered for a legacy release version.
    #[error("no layout registered for release version {version}")]
    UnknownLayout { version: u32 },

    /// A required column is absent from a sheet.
    #[error("column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// A row label could not be read as a date.
    #[error("cannot read '{value}' as a date in sheet '{sheet}'")]
    InvalidDate { sheet: String, value: String },

    /// A label is not part of the harmonization tables (strict mode).
    #[error("unrecognized {dim} label '{label}'")]
    UnrecognizedLabel { dim: String, label: String },

    /// Header levels do not have the expected shape.
    #[error("unexpected header in sheet '{sheet}': {reason}")]
    UnexpectedHeader { sheet: String, reason: String },

    /// A value column holds a cell that is neither a number nor a sentinel.
    #[error("column '{column}' in sheet '{sheet}' holds non-numeric value '{value}'")]
    NonNumericColumn {
        sheet: String,
        column: String,
        value: String,
    },

    /// The layout expects a row index but the sheet has none.
    #[error("sheet '{sheet}' has no row index")]
    MissingIndex { sheet: String },

    /// Workbook or sheet reading failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Building or combining arrays failed.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_sheet() {
        let err = TransformError::MissingColumn {
            sheet: "Table 2".to_string(),
            column: "Year".to_string(),
        };
        assert_eq!(err.to_string(), "column 'Year' not found in sheet 'Table 2'");
    }

    #[test]
    fn array_errors_pass_through() {
        let err: TransformError = ArrayError::EmptyConcat.into();
        assert_eq!(err.to_string(), "cannot concatenate an empty list of arrays");
    }
}
