//! Release file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// A release workbook found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFile {
    pub path: PathBuf,
    pub file_name: String,
    pub version: u32,
}

impl ReleaseFile {
    /// Builds a release from a path, parsing the version from its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let version = parse_version(&file_name)?;
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            version,
        })
    }

    /// Label used for this release along the `version` dimension.
    pub fn version_token(&self) -> String {
        format!("v{}", self.version)
    }
}

/// Parses the release version: the integer between the first `_v` and the
/// following `.`.
pub fn parse_version(file_name: &str) -> Result<u32> {
    let invalid = || IngestError::InvalidFileName {
        file_name: file_name.to_string(),
    };
    let (_, rest) = file_name.split_once("_v").ok_or_else(invalid)?;
    let (digits, _) = rest.split_once('.').ok_or_else(invalid)?;
    digits.parse::<u32>().map_err(|_| invalid())
}

fn is_release_candidate(path: &Path) -> bool {
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    // Office lock files (`~$name.xlsx`) and temp copies carry a tilde.
    let is_lock = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains('~'));
    is_xlsx && !is_lock
}

/// Lists release workbooks in a directory.
///
/// Returns files sorted by file name. Every listed name must carry a version.
pub fn list_release_files(dir: &Path) -> Result<Vec<ReleaseFile>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_release_candidate(&path) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let files = paths
        .iter()
        .map(|path| ReleaseFile::from_path(path))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(dir = %dir.display(), count = files.len(), "listed release files");
    Ok(files)
}
