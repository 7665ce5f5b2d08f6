//! Persistent storage for the assembled ONS mortality corpus.
//!
//! The corpus array of every release is expensive to rebuild (each release is
//! a spreadsheet), so it is written once and loaded on later runs until a
//! rebuild is forced.
//!
//! # File Format
//!
//! ```text
//! +------------------+
//! | Magic: "ONS\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | rkyv Payload     | Variable - CorpusFile
//! +------------------+
//! ```
//!
//! The payload holds the dimension names and labels, the shape, the
//! row-major cell values, the creation timestamp and one [`SourceRecord`]
//! per release (file name, version token, SHA-256 of the file).
//!
//! # Example
//!
//! ```ignore
//! use ons_persistence::{CorpusFile, SourceRecord, load_corpus, save_corpus};
//!
//! let sources = vec![SourceRecord::capture(Path::new("data/deaths_v0.xlsx"), "v0")?];
//! save_corpus(&CorpusFile::new(&array, sources), Path::new("data/ONS_dataset.nc"))?;
//! let array = load_corpus(Path::new("data/ONS_dataset.nc"))?.to_array()?;
//! ```

mod convert;
mod error;
mod io;
mod types;

pub use convert::{FromSnapshot, ToSnapshot};
pub use error::{PersistenceError, Result};
pub use io::{hash_bytes, hash_file, load_corpus, save_corpus, verify_file_hash};
pub use types::{
    ArraySnapshot, CURRENT_SCHEMA_VERSION, CoordSnapshot, CorpusFile, DimensionSnapshot,
    MAGIC_BYTES, SourceRecord,
};
