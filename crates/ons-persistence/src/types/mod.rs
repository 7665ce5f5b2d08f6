//! Persistence types for corpus serialization.
//!
//! These mirror the runtime [`ons_model::LabeledArray`] in a form rkyv can
//! archive: plain vectors, integer day numbers for dates and a flat value
//! buffer.

mod corpus;
mod source;

pub use corpus::{ArraySnapshot, CoordSnapshot, CorpusFile, DimensionSnapshot};
pub use source::SourceRecord;

/// Current schema version.
///
/// The loader rejects files with a version above this one.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Magic bytes at the start of corpus files: "ONS" and a format byte.
pub const MAGIC_BYTES: [u8; 4] = [b'O', b'N', b'S', 0x01];
