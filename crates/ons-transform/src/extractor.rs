//! Per-release extraction strategies and their registry.
//!
//! # Architecture
//!
//! An [`ExtractionStrategy`] turns one opened workbook into a canonical
//! array. The [`ExtractorRegistry`] maps a release version to its strategy:
//! each legacy version gets a [`LegacyStrategy`] carrying its layout, and
//! every version from [`FIRST_CURRENT_VERSION`] on shares [`CurrentStrategy`].
//!
//! # Example
//!
//! ```ignore
//! use ons_ingest::{XlsxLoader, list_release_files};
//! use ons_transform::{ExtractOptions, extract_release};
//!
//! for release in list_release_files(Path::new("data"))? {
//!     let array = extract_release(&release, &XlsxLoader, &ExtractOptions::default())?;
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use ons_ingest::{ReleaseFile, Workbook, WorkbookLoader};
use ons_model::LabeledArray;
use serde::{Deserialize, Serialize};

use crate::current::CurrentStrategy;
use crate::error::{Result, TransformError};
use crate::harmonize::LabelMode;
use crate::layout::{FIRST_CURRENT_VERSION, legacy_layouts};
use crate::legacy::LegacyStrategy;

/// Year given to bare month names in releases 2 and 3.
pub const DEFAULT_FIXED_YEAR: i32 = 2021;

/// Options for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Handling of labels missing from the harmonization tables.
    pub label_mode: LabelMode,
    /// Year appended to month-only row labels.
    pub fixed_year: i32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::Strict,
            fixed_year: DEFAULT_FIXED_YEAR,
        }
    }
}

impl ExtractOptions {
    pub fn with_label_mode(mut self, label_mode: LabelMode) -> Self {
        self.label_mode = label_mode;
        self
    }

    pub fn with_fixed_year(mut self, fixed_year: i32) -> Self {
        self.fixed_year = fixed_year;
        self
    }
}

/// Turns one release workbook into a canonical array.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reads every sheet the strategy needs and reshapes it.
    ///
    /// # Errors
    ///
    /// Fails on missing sheets or columns, unreadable dates, unknown labels
    /// in strict mode, and duplicate coordinates.
    fn extract(&self, workbook: &mut dyn Workbook, options: &ExtractOptions)
    -> Result<LabeledArray>;
}

/// Release version to strategy.
pub struct ExtractorRegistry {
    legacy: BTreeMap<u32, Box<dyn ExtractionStrategy>>,
    current: Box<dyn ExtractionStrategy>,
}

impl ExtractorRegistry {
    /// Creates a registry with no legacy strategies.
    pub fn new(current: Box<dyn ExtractionStrategy>) -> Self {
        Self {
            legacy: BTreeMap::new(),
            current,
        }
    }

    /// Registers the strategy of a legacy version, replacing any previous one.
    pub fn register(&mut self, version: u32, strategy: Box<dyn ExtractionStrategy>) {
        self.legacy.insert(version, strategy);
    }

    /// Strategy for `version`.
    pub fn get(&self, version: u32) -> Result<&dyn ExtractionStrategy> {
        if version >= FIRST_CURRENT_VERSION {
            return Ok(self.current.as_ref());
        }
        self.legacy
            .get(&version)
            .map(|strategy| strategy.as_ref())
            .ok_or(TransformError::UnknownLayout { version })
    }

    /// Registered legacy versions, ascending.
    pub fn legacy_versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.legacy.keys().copied()
    }
}

static DEFAULT_REGISTRY: OnceLock<ExtractorRegistry> = OnceLock::new();

/// Registry with a strategy for every known release layout.
pub fn default_registry() -> &'static ExtractorRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new(Box::new(CurrentStrategy));
    for layout in legacy_layouts() {
        registry.register(layout.version, Box::new(LegacyStrategy::new(layout)));
    }
    registry
}

/// Extracts an already opened workbook of release `version`.
pub fn extract_workbook(
    version: u32,
    workbook: &mut dyn Workbook,
    options: &ExtractOptions,
) -> Result<LabeledArray> {
    default_registry().get(version)?.extract(workbook, options)
}

/// Opens and extracts one release file.
pub fn extract_release(
    release: &ReleaseFile,
    loader: &dyn WorkbookLoader,
    options: &ExtractOptions,
) -> Result<LabeledArray> {
    let span = tracing::info_span!(
        "extract",
        file = %release.file_name,
        version = release.version
    );
    let _guard = span.enter();

    let strategy = default_registry().get(release.version)?;
    let mut workbook = loader.open(&release.path)?;
    let array = strategy.extract(workbook.as_mut(), options)?;
    tracing::info!(
        strategy = strategy.name(),
        shape = ?array.shape(),
        cells = array.count_valid(),
        "extracted release"
    );
    Ok(array)
}
