//! Release layouts, extraction and grouping for the ONS mortality corpus.
//!
//! - **layout**: static table arrangements of releases 0 to 3 and the shared
//!   layout of later releases
//! - **harmonize**: label tables that align variable and status wording
//! - **period**: month labels to dates
//! - **extractor**: strategy registry turning a workbook into a canonical array
//! - **grouping**: coarser vaccination-status partitions

mod current;
pub mod error;
pub mod extractor;
pub mod grouping;
pub mod harmonize;
pub mod layout;
mod legacy;
pub mod period;
pub mod reshape;

pub use current::CurrentStrategy;
pub use error::{Result, TransformError};
pub use extractor::{
    DEFAULT_FIXED_YEAR, ExtractOptions, ExtractionStrategy, ExtractorRegistry, default_registry,
    extract_release, extract_workbook,
};
pub use grouping::{GroupingMode, VACCINATED_ANY, group_labels, group_vax_status};
pub use harmonize::{
    CURRENT_VARIABLES, LEGACY_VARIABLES, LabelMode, LabelTable, VAX_STATUSES,
};
pub use layout::{
    CURRENT_LAYOUT, DEATH_LABELS, FIRST_CURRENT_VERSION, LayoutDescriptor, LegacyKind,
    legacy_layout, legacy_layouts,
};
pub use legacy::{ALL_AGES, LegacyStrategy};
pub use reshape::{Observation, observations_to_array};
