//! Assembler configuration.

use std::path::{Path, PathBuf};

use ons_transform::ExtractOptions;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_GRAPH_DIR: &str = "graph";
pub const DEFAULT_CORPUS_FILE: &str = "ONS_dataset.nc";

/// Where releases live, where the corpus goes and how releases are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Directory holding the release workbooks and the corpus file.
    pub data_dir: PathBuf,
    /// Output directory for plots. Created but not written by the assembler.
    pub graph_dir: PathBuf,
    /// Corpus file name inside `data_dir`.
    pub corpus_file: String,
    pub extract: ExtractOptions,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            graph_dir: PathBuf::from(DEFAULT_GRAPH_DIR),
            corpus_file: DEFAULT_CORPUS_FILE.to_string(),
            extract: ExtractOptions::default(),
        }
    }
}

impl AssemblerConfig {
    /// Default layout below `root` (`root/data`, `root/graph`).
    pub fn with_root(root: &Path) -> Self {
        Self::default()
            .with_data_dir(root.join(DEFAULT_DATA_DIR))
            .with_graph_dir(root.join(DEFAULT_GRAPH_DIR))
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_graph_dir(mut self, graph_dir: impl Into<PathBuf>) -> Self {
        self.graph_dir = graph_dir.into();
        self
    }

    #[must_use]
    pub fn with_corpus_file(mut self, corpus_file: impl Into<String>) -> Self {
        self.corpus_file = corpus_file.into();
        self
    }

    #[must_use]
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Full path of the persisted corpus.
    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join(&self.corpus_file)
    }
}
