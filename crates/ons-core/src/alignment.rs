//! Label alignment across releases, checked before concatenation.
//!
//! Concatenation outer-joins labels, so a label that only some releases carry
//! silently becomes `NaN` everywhere else. The report makes those labels
//! visible. Releases exposing different dimension sets cannot be combined at
//! all and are rejected.

use std::collections::BTreeMap;

use ons_model::{ArrayError, Coord, LabeledArray, VARIABLE, VAX_STATUS};

/// A label missing from at least one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialLabel {
    pub label: Coord,
    /// Releases carrying the label, in input order.
    pub present_in: Vec<String>,
}

/// Labels of one dimension that are not shared by every release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionAlignment {
    pub dim: String,
    /// Size of the label union.
    pub union_len: usize,
    pub partial: Vec<PartialLabel>,
}

/// Per-dimension label coverage of a set of releases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentReport {
    pub releases: Vec<String>,
    pub dims: Vec<DimensionAlignment>,
}

impl AlignmentReport {
    /// True when every release carries every label.
    pub fn is_aligned(&self) -> bool {
        self.dims.iter().all(|dim| dim.partial.is_empty())
    }

    /// Logs partial labels. Harmonized dimensions warn, the others (dates,
    /// age bands) are expected to differ and log at debug.
    pub fn log(&self) {
        for dim in &self.dims {
            for partial in &dim.partial {
                if dim.dim == VARIABLE || dim.dim == VAX_STATUS {
                    tracing::warn!(
                        dim = %dim.dim,
                        label = %partial.label,
                        present_in = ?partial.present_in,
                        "label missing from some releases"
                    );
                } else {
                    tracing::debug!(
                        dim = %dim.dim,
                        label = %partial.label,
                        present_in = ?partial.present_in,
                        "label missing from some releases"
                    );
                }
            }
        }
    }
}

/// Compares the label sets of `arrays`, named by `releases`.
///
/// # Errors
///
/// `ArrayError::DimensionMismatch` when an array does not expose the same
/// dimensions as the first one.
pub fn alignment_report(
    releases: &[String],
    arrays: &[LabeledArray],
) -> Result<AlignmentReport, ArrayError> {
    let Some(first) = arrays.first() else {
        return Ok(AlignmentReport::default());
    };
    let mut expected: Vec<&str> = first.dim_names();
    expected.sort_unstable();

    for array in arrays {
        let mut found = array.dim_names();
        found.sort_unstable();
        if found != expected {
            return Err(ArrayError::DimensionMismatch {
                expected: expected.join(", "),
                found: found.join(", "),
            });
        }
    }

    let mut dims = Vec::with_capacity(expected.len());
    for name in first.dim_names() {
        let mut coverage: BTreeMap<&Coord, Vec<String>> = BTreeMap::new();
        for (release, array) in releases.iter().zip(arrays) {
            for label in array.labels(name)? {
                coverage.entry(label).or_default().push(release.clone());
            }
        }
        let union_len = coverage.len();
        let partial = coverage
            .into_iter()
            .filter(|(_, present_in)| present_in.len() < arrays.len())
            .map(|(label, present_in)| PartialLabel {
                label: label.clone(),
                present_in,
            })
            .collect();
        dims.push(DimensionAlignment {
            dim: name.to_string(),
            union_len,
            partial,
        });
    }

    Ok(AlignmentReport {
        releases: releases.to_vec(),
        dims,
    })
}
