//! Canonical dimension names.

/// Cause-of-death category.
pub const DEATH: &str = "death";
/// Vaccination status.
pub const VAX_STATUS: &str = "vax_status";
/// Age group.
pub const AGE_GROUP: &str = "age_group";
/// Measured quantity (death count, population, rate, ...).
pub const VARIABLE: &str = "variable";
/// First day of the reporting month.
pub const DATE: &str = "date";
/// Release version token (`v0`, `v1`, ...), only present on the corpus array.
pub const VERSION: &str = "version";
/// Temporary name for the fine-grained vaccination status while grouping.
pub const SUB_VAX_STATUS: &str = "sub_vax_status";

/// Dimension order of every per-release canonical array.
pub const CANONICAL_DIMS: [&str; 5] = [DEATH, VAX_STATUS, AGE_GROUP, VARIABLE, DATE];
