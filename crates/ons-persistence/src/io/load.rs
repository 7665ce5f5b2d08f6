//! Corpus loading.

use std::fs;
use std::path::Path;

use rkyv::util::AlignedVec;

use super::HEADER_LEN;
use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, CorpusFile, MAGIC_BYTES};

/// Reads and validates the corpus file at `path`.
pub fn load_corpus(path: &Path) -> Result<CorpusFile> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let corpus = parse_corpus_bytes(&bytes, path)?;
    tracing::info!(
        path = %path.display(),
        releases = corpus.sources.len(),
        created_at = %corpus.created_at,
        "loaded corpus"
    );
    Ok(corpus)
}

fn parse_corpus_bytes(bytes: &[u8], path: &Path) -> Result<CorpusFile> {
    if bytes.len() <= HEADER_LEN {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File too small".to_string(),
        });
    }

    if bytes[0..4] != MAGIC_BYTES {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Not a corpus file (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    // rkyv validates alignment; the payload starts at an arbitrary offset of
    // the read buffer.
    let mut payload = AlignedVec::<16>::with_capacity(bytes.len() - HEADER_LEN);
    payload.extend_from_slice(&bytes[HEADER_LEN..]);

    rkyv::from_bytes::<CorpusFile, rkyv::rancor::Error>(&payload).map_err(|e| {
        PersistenceError::Deserialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        }
    })
}
