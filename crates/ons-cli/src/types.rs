use std::path::Path;

use ons_core::SourceStatus;
use ons_ingest::ReleaseFile;
use ons_model::{ArrayError, Coord, LabeledArray, VARIABLE, VAX_STATUS, VERSION};
use ons_transform::harmonize::NUMBER_OF_DEATHS;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRow {
    pub file_name: String,
    pub version: String,
}

impl From<&ReleaseFile> for ReleaseRow {
    fn from(release: &ReleaseFile) -> Self {
        Self {
            file_name: release.file_name.clone(),
            version: release.version_token(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub corpus_file: String,
    pub releases: Vec<String>,
    pub shape: Vec<usize>,
    pub cells: usize,
    pub valid_cells: usize,
    pub dims: Vec<DimensionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionSummary {
    pub name: String,
    pub labels: usize,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl CorpusSummary {
    pub fn from_array(array: &LabeledArray, corpus_file: &Path) -> Self {
        let releases = array
            .labels(VERSION)
            .map(|labels| labels.iter().map(Coord::to_string).collect())
            .unwrap_or_default();
        let dims = array
            .dims()
            .iter()
            .map(|dim| DimensionSummary {
                name: dim.name.clone(),
                labels: dim.len(),
                first: dim.labels.first().map(Coord::to_string),
                last: dim.labels.last().map(Coord::to_string),
            })
            .collect();
        Self {
            corpus_file: corpus_file.display().to_string(),
            releases,
            shape: array.shape().to_vec(),
            cells: array.len(),
            valid_cells: array.count_valid(),
            dims,
        }
    }
}

/// Sum of one vaccination-status group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    /// Variable the total is taken over, when the array has one.
    pub variable: Option<String>,
    pub total: f64,
}

/// Totals per `vax_status` label of a grouped array.
///
/// Rates and counts do not add up, so arrays with a `variable` dimension are
/// restricted to the death counts first.
pub fn group_totals(grouped: &LabeledArray) -> Result<Vec<GroupTotal>, ArrayError> {
    let deaths = Coord::from(NUMBER_OF_DEATHS);
    let (scope, variable) = match grouped.labels(VARIABLE) {
        Ok(labels) if labels.contains(&deaths) => (
            grouped.select(VARIABLE, std::slice::from_ref(&deaths))?,
            Some(NUMBER_OF_DEATHS.to_string()),
        ),
        _ => (grouped.clone(), None),
    };

    scope
        .labels(VAX_STATUS)?
        .iter()
        .map(|label| {
            let total = scope
                .select(VAX_STATUS, std::slice::from_ref(label))?
                .total();
            Ok(GroupTotal {
                group: label.to_string(),
                variable: variable.clone(),
                total,
            })
        })
        .collect()
}

/// Serializable form of [`SourceStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub corpus_file: String,
    pub current: bool,
    pub unchanged: Vec<String>,
    pub changed: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl VerifyReport {
    pub fn new(status: SourceStatus, corpus_file: &Path) -> Self {
        Self {
            corpus_file: corpus_file.display().to_string(),
            current: status.is_current(),
            unchanged: status.unchanged,
            changed: status.changed,
            added: status.added,
            removed: status.removed,
        }
    }
}
