//! Data model for the ONS mortality corpus.
//!
//! - **coord**: dimension labels (text or calendar dates)
//! - **dims**: canonical dimension names shared by every release
//! - **array**: [`LabeledArray`], the labeled n-dimensional array that holds
//!   one release (canonical array) or all releases (corpus array)
//! - **error**: shape and alignment errors raised by array operations

pub mod array;
pub mod coord;
pub mod dims;
pub mod error;

pub use array::{Dimension, LabeledArray};
pub use coord::Coord;
pub use dims::{
    AGE_GROUP, CANONICAL_DIMS, DATE, DEATH, SUB_VAX_STATUS, VARIABLE, VAX_STATUS, VERSION,
};
pub use error::{ArrayError, Result};
