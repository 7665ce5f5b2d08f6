//! Corpus assembly errors.

use std::path::PathBuf;

use ons_ingest::IngestError;
use ons_model::ArrayError;
use ons_persistence::PersistenceError;
use ons_transform::TransformError;
use thiserror::Error;

/// Errors raised while assembling, persisting or verifying the corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Data or graph directory could not be created.
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing the data directory failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A release could not be extracted.
    #[error("failed to extract {file}")]
    Extract {
        file: String,
        #[source]
        source: TransformError,
    },

    /// A release could not be hashed.
    #[error("failed to hash {file}")]
    Hash {
        file: String,
        #[source]
        source: PersistenceError,
    },

    /// Two release files carry the same version.
    #[error("release version {version} appears in both {first} and {second}")]
    DuplicateVersion {
        version: u32,
        first: String,
        second: String,
    },

    /// Nothing to assemble.
    #[error("no release files to assemble")]
    NoReleases,

    /// The corpus file does not exist yet.
    #[error("no corpus at {path}")]
    CorpusMissing { path: PathBuf },

    /// Canonical arrays could not be combined.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Reading or writing the corpus file failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
