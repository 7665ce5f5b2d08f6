//! Errors raised by labeled array operations.

use thiserror::Error;

/// Shape, alignment and lookup failures of [`crate::LabeledArray`].
#[derive(Debug, Error)]
pub enum ArrayError {
    /// Value buffer does not match the product of dimension lengths.
    #[error("shape mismatch: dimensions describe {expected} cells but {found} values were given")]
    ShapeMismatch { expected: usize, found: usize },

    /// A dimension name appears twice.
    #[error("duplicate dimension '{name}'")]
    DuplicateDimension { name: String },

    /// A label appears twice along one dimension.
    #[error("duplicate label '{label}' in dimension '{dim}'")]
    DuplicateLabel { dim: String, label: String },

    /// Two observations address the same cell.
    #[error("duplicate coordinate ({coordinate})")]
    DuplicateCoordinate { coordinate: String },

    /// Arrays being combined do not expose the same dimensions.
    #[error("dimension mismatch: expected [{expected}], found [{found}]")]
    DimensionMismatch { expected: String, found: String },

    /// Dimension name not present on the array.
    #[error("unknown dimension '{name}'")]
    UnknownDimension { name: String },

    /// Label not present along a dimension.
    #[error("label '{label}' not found in dimension '{dim}'")]
    UnknownLabel { dim: String, label: String },

    /// An observation carries the wrong number of coordinates.
    #[error("observation has {found} coordinates, expected {expected}")]
    CoordinateArity { expected: usize, found: usize },

    /// A cell lookup did not name every dimension.
    #[error("selection does not name dimension '{missing}'")]
    IncompleteSelection { missing: String },

    /// Concatenation was asked to combine nothing.
    #[error("cannot concatenate an empty list of arrays")]
    EmptyConcat,
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, ArrayError>;
