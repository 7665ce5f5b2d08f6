//! Corpus assembly, persistence and source verification.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use ons_ingest::{ReleaseFile, WorkbookLoader, XlsxLoader, list_release_files};
use ons_model::{Coord, LabeledArray, VERSION};
use ons_persistence::{CorpusFile, SourceRecord, load_corpus, save_corpus, verify_file_hash};
use ons_transform::extract_release;

use crate::alignment::alignment_report;
use crate::config::AssemblerConfig;
use crate::error::{CorpusError, Result};

/// Builds, persists and reloads the corpus array.
pub struct CorpusAssembler {
    config: AssemblerConfig,
    loader: Box<dyn WorkbookLoader>,
}

impl std::fmt::Debug for CorpusAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusAssembler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CorpusAssembler {
    /// Creates the data and graph directories if needed.
    pub fn new(config: AssemblerConfig) -> Result<Self> {
        for dir in [&config.data_dir, &config.graph_dir] {
            fs::create_dir_all(dir).map_err(|e| CorpusError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(Self {
            config,
            loader: Box::new(XlsxLoader),
        })
    }

    /// Replaces the workbook loader (`.xlsx` through calamine by default).
    #[must_use]
    pub fn with_loader(mut self, loader: impl WorkbookLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.config.corpus_path()
    }

    /// Release workbooks of the data directory, sorted by file name.
    pub fn list_datasets(&self) -> Result<Vec<ReleaseFile>> {
        let files = list_release_files(&self.config.data_dir)?;
        tracing::debug!(
            count = files.len(),
            dir = %self.config.data_dir.display(),
            "listed releases"
        );
        Ok(files)
    }

    /// Extracts and concatenates `files` without touching the corpus file.
    pub fn build(&self, files: &[ReleaseFile]) -> Result<LabeledArray> {
        check_versions(files)?;
        let tokens: Vec<String> = files.iter().map(ReleaseFile::version_token).collect();

        let mut arrays = Vec::with_capacity(files.len());
        for release in files {
            let array = extract_release(release, self.loader.as_ref(), &self.config.extract)
                .map_err(|source| CorpusError::Extract {
                    file: release.file_name.clone(),
                    source,
                })?;
            arrays.push(array);
        }

        let report = alignment_report(&tokens, &arrays)?;
        report.log();

        let labels = tokens.into_iter().map(Coord::from).collect();
        let corpus = LabeledArray::concat(&arrays, VERSION, labels)?;
        tracing::info!(
            releases = files.len(),
            shape = ?corpus.shape(),
            cells = corpus.count_valid(),
            "assembled corpus"
        );
        Ok(corpus)
    }

    /// Returns the persisted corpus, building and saving it first when it
    /// does not exist or `force` is set.
    ///
    /// An existing corpus is returned as stored; it is not compared with
    /// `files` (see [`Self::verify_sources`]).
    pub fn build_or_load(&self, files: &[ReleaseFile], force: bool) -> Result<LabeledArray> {
        let span = tracing::info_span!("corpus", force);
        let _guard = span.enter();

        let path = self.corpus_path();
        if !force && path.exists() {
            let stored = load_corpus(&path)?;
            return Ok(stored.to_array()?);
        }

        let corpus = self.build(files)?;
        let sources = files
            .iter()
            .map(|release| {
                SourceRecord::capture(&release.path, release.version_token()).map_err(|source| {
                    CorpusError::Hash {
                        file: release.file_name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        save_corpus(&CorpusFile::new(&corpus, sources), &path)?;
        Ok(corpus)
    }

    /// Compares the recorded release hashes with `files`.
    pub fn verify_sources(&self, files: &[ReleaseFile]) -> Result<SourceStatus> {
        let path = self.corpus_path();
        if !path.exists() {
            return Err(CorpusError::CorpusMissing { path });
        }
        let stored = load_corpus(&path)?;
        let mut recorded: BTreeMap<&str, &SourceRecord> = stored
            .sources
            .iter()
            .map(|source| (source.file_name.as_str(), source))
            .collect();

        let mut status = SourceStatus::default();
        for release in files {
            let Some(record) = recorded.remove(release.file_name.as_str()) else {
                status.added.push(release.file_name.clone());
                continue;
            };
            let same = verify_file_hash(&release.path, &record.sha256).map_err(|source| {
                CorpusError::Hash {
                    file: release.file_name.clone(),
                    source,
                }
            })?;
            if same {
                status.unchanged.push(release.file_name.clone());
            } else {
                status.changed.push(release.file_name.clone());
            }
        }
        status.removed = recorded.into_keys().map(str::to_string).collect();

        tracing::info!(
            unchanged = status.unchanged.len(),
            changed = status.changed.len(),
            added = status.added.len(),
            removed = status.removed.len(),
            "verified release sources"
        );
        Ok(status)
    }
}

/// Difference between the releases a corpus was built from and the data
/// directory. File names only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStatus {
    pub unchanged: Vec<String>,
    pub changed: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SourceStatus {
    /// True when a rebuild would read exactly the recorded releases.
    pub fn is_current(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}

fn check_versions(files: &[ReleaseFile]) -> Result<()> {
    if files.is_empty() {
        return Err(CorpusError::NoReleases);
    }
    let mut seen: BTreeMap<u32, &str> = BTreeMap::new();
    for release in files {
        if let Some(first) = seen.insert(release.version, &release.file_name) {
            return Err(CorpusError::DuplicateVersion {
                version: release.version,
                first: first.to_string(),
                second: release.file_name.clone(),
            });
        }
    }
    Ok(())
}
