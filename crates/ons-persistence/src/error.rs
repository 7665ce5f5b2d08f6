//! Persistence error types.
//!
//! Every variant carries enough context for the CLI to print a short message
//! and a remediation hint.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a corpus file.
    #[error("Invalid corpus file format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Schema version newer than this build understands.
    #[error("Corpus file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// The payload decoded but does not describe a valid array.
    #[error("Corpus payload is inconsistent: {reason}")]
    InvalidPayload { reason: String },

    /// Serialization error.
    #[error("Failed to serialize corpus data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize corpus data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// User-facing message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a corpus file: {}",
                path.display(),
                reason
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "The corpus file was written by a newer build \
                (file version {found}, this build supports up to {max_supported})."
            ),
            Self::InvalidPayload { reason } => {
                format!("The corpus file contents are inconsistent: {reason}")
            }
            Self::Serialization { .. } => {
                "An error occurred while encoding the corpus.".to_string()
            }
            Self::Deserialization { .. } => {
                "An error occurred while reading the corpus. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the corpus to {}. Check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// Suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and is readable.".into())
                } else {
                    Some("Check that the data directory is writable.".into())
                }
            }
            Self::InvalidFormat { .. }
            | Self::UnsupportedVersion { .. }
            | Self::InvalidPayload { .. }
            | Self::Deserialization { .. } => {
                Some("Rebuild the corpus with `build --force`.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose another corpus file location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
