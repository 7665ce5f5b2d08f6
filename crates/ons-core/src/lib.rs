//! Corpus assembly for the ONS mortality-by-vaccination-status releases.
//!
//! [`CorpusAssembler`] lists the release workbooks of a data directory,
//! extracts each one into a canonical array, checks that the arrays line up
//! and stacks them along a leading `version` dimension. The result is
//! persisted once and reused until a rebuild is forced.

pub mod alignment;
pub mod config;
pub mod corpus;
pub mod error;

pub use alignment::{AlignmentReport, DimensionAlignment, PartialLabel, alignment_report};
pub use config::{AssemblerConfig, DEFAULT_CORPUS_FILE, DEFAULT_DATA_DIR, DEFAULT_GRAPH_DIR};
pub use corpus::{CorpusAssembler, SourceStatus};
pub use error::{CorpusError, Result};
