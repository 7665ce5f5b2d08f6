//! Corpus saving.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::HEADER_LEN;
use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, CorpusFile, MAGIC_BYTES};

/// Writes `corpus` to `path`.
///
/// The bytes go to a sibling temp file first and are renamed into place, so a
/// reader never sees a partially written corpus.
pub fn save_corpus(corpus: &CorpusFile, path: &Path) -> Result<()> {
    let bytes = serialize_corpus(corpus)?;
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        releases = corpus.sources.len(),
        "saved corpus"
    );
    Ok(())
}

/// `<path>.tmp`, next to the target so the rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Magic bytes, schema version (u32 LE) and the rkyv payload.
fn serialize_corpus(corpus: &CorpusFile) -> Result<Vec<u8>> {
    let payload = rkyv::to_bytes::<rkyv::rancor::Error>(corpus).map_err(|e| {
        PersistenceError::Serialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;

    let mut output = Vec::with_capacity(HEADER_LEN + payload.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
    output.extend_from_slice(&payload);
    Ok(output)
}
