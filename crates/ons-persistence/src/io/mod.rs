//! File I/O for the corpus file.
//!
//! - saving with atomic writes
//! - loading with format validation
//! - release file hashing for change detection

mod hash;
mod load;
mod save;

pub use hash::{hash_bytes, hash_file, verify_file_hash};
pub use load::load_corpus;
pub use save::save_corpus;

/// Length of the magic bytes plus the schema version.
const HEADER_LEN: usize = 8;
