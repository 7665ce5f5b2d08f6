//! SHA-256 of release files.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{PersistenceError, Result};

/// Hex SHA-256 of the file at `path`, streamed.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut BufReader::new(file), &mut hasher).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(hex::encode(hasher.finalize()))
}

/// Hex SHA-256 of an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Whether the file at `path` still hashes to `expected_hash`.
pub fn verify_file_hash(path: &Path, expected_hash: &str) -> Result<bool> {
    Ok(hash_file(path)? == expected_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn known_digest() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"Hello, World!").unwrap();
        temp_file.flush().unwrap();

        let expected = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";
        assert_eq!(hash_file(temp_file.path()).unwrap(), expected);
        assert_eq!(hash_bytes(b"Hello, World!"), expected);
    }

    #[test]
    fn verify_detects_changes() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"release v0").unwrap();
        temp_file.flush().unwrap();
        let hash = hash_file(temp_file.path()).unwrap();

        assert!(verify_file_hash(temp_file.path(), &hash).unwrap());
        temp_file.write_all(b" amended").unwrap();
        temp_file.flush().unwrap();
        assert!(!verify_file_hash(temp_file.path(), &hash).unwrap());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            hash_file(&dir.path().join("absent.xlsx")),
            Err(PersistenceError::Io { operation: "read", .. })
        ));
    }
}
