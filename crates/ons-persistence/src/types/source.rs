//! Release files recorded at build time.

use std::path::Path;

use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Result;
use crate::io::hash_file;

/// A release the corpus was built from.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct SourceRecord {
    /// File name inside the data directory.
    pub file_name: String,

    /// Version token (`v<N>`), the label along the `version` dimension.
    pub version: String,

    /// Hex SHA-256 of the file contents when the corpus was built.
    pub sha256: String,
}

impl SourceRecord {
    pub fn new(
        file_name: impl Into<String>,
        version: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            version: version.into(),
            sha256: sha256.into(),
        }
    }

    /// Hashes the file at `path` and records it under `version`.
    pub fn capture(path: &Path, version: impl Into<String>) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, version, hash_file(path)?))
    }
}
