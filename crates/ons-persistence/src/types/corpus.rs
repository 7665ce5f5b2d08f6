//! Root corpus file type.

use chrono::{DateTime, Utc};
use ons_model::LabeledArray;
use rkyv::{Archive, Deserialize, Serialize};

use super::SourceRecord;
use crate::convert::{FromSnapshot, ToSnapshot};
use crate::error::Result;

/// Top-level type written to the corpus file.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct CorpusFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the corpus was built (RFC 3339).
    pub created_at: String,

    /// The corpus array.
    pub array: ArraySnapshot,

    /// One record per release, in the order of the `version` dimension.
    pub sources: Vec<SourceRecord>,
}

impl CorpusFile {
    /// Snapshots `array` together with the releases it was built from.
    pub fn new(array: &LabeledArray, sources: Vec<SourceRecord>) -> Self {
        Self {
            schema_version: super::CURRENT_SCHEMA_VERSION,
            created_at: Utc::now().to_rfc3339(),
            array: array.to_snapshot(),
            sources,
        }
    }

    /// Rebuilds the corpus array.
    pub fn to_array(&self) -> Result<LabeledArray> {
        LabeledArray::from_snapshot(self.array.clone())
    }

    /// Parse the created_at timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Recorded source for a version token.
    pub fn source(&self, version: &str) -> Option<&SourceRecord> {
        self.sources.iter().find(|source| source.version == version)
    }
}

/// Dimensions, shape and row-major values of a labeled array.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ArraySnapshot {
    pub dims: Vec<DimensionSnapshot>,
    pub shape: Vec<u64>,
    pub values: Vec<f64>,
}

/// A named axis and its labels.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    pub name: String,
    pub labels: Vec<CoordSnapshot>,
}

/// A dimension label. Dates are stored as days since 0001-01-01 (CE).
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum CoordSnapshot {
    Text(String),
    Date(i32),
}
