//! Conversion traits between runtime types and persistence snapshots.
//!
//! Writing a snapshot never fails. Restoring one can: a payload that
//! deserializes cleanly may still carry a shape that disagrees with its
//! labels or a day number outside the calendar.

use chrono::{Datelike, NaiveDate};
use ons_model::{Coord, Dimension, LabeledArray};

use crate::error::{PersistenceError, Result};
use crate::types::{ArraySnapshot, CoordSnapshot, DimensionSnapshot};

/// Trait for types that can be converted to a persistence snapshot.
pub trait ToSnapshot {
    /// The snapshot type.
    type Snapshot;

    /// Convert to a snapshot for persistence.
    fn to_snapshot(&self) -> Self::Snapshot;
}

/// Trait for types that can be rebuilt from a persistence snapshot.
pub trait FromSnapshot: Sized {
    /// The snapshot type.
    type Snapshot;

    /// Rebuild from a snapshot.
    fn from_snapshot(snapshot: Self::Snapshot) -> Result<Self>;
}

impl ToSnapshot for Coord {
    type Snapshot = CoordSnapshot;

    fn to_snapshot(&self) -> CoordSnapshot {
        match self {
            Coord::Text(text) => CoordSnapshot::Text(text.clone()),
            Coord::Date(date) => CoordSnapshot::Date(date.num_days_from_ce()),
        }
    }
}

impl FromSnapshot for Coord {
    type Snapshot = CoordSnapshot;

    fn from_snapshot(snapshot: CoordSnapshot) -> Result<Self> {
        match snapshot {
            CoordSnapshot::Text(text) => Ok(Coord::Text(text)),
            CoordSnapshot::Date(days) => NaiveDate::from_num_days_from_ce_opt(days)
                .map(Coord::Date)
                .ok_or_else(|| PersistenceError::InvalidPayload {
                    reason: format!("day number {days} is not a valid date"),
                }),
        }
    }
}

impl ToSnapshot for Dimension {
    type Snapshot = DimensionSnapshot;

    fn to_snapshot(&self) -> DimensionSnapshot {
        DimensionSnapshot {
            name: self.name.clone(),
            labels: self.labels.iter().map(ToSnapshot::to_snapshot).collect(),
        }
    }
}

impl FromSnapshot for Dimension {
    type Snapshot = DimensionSnapshot;

    fn from_snapshot(snapshot: DimensionSnapshot) -> Result<Self> {
        let labels = snapshot
            .labels
            .into_iter()
            .map(Coord::from_snapshot)
            .collect::<Result<Vec<_>>>()?;
        Ok(Dimension::new(snapshot.name, labels))
    }
}

impl ToSnapshot for LabeledArray {
    type Snapshot = ArraySnapshot;

    fn to_snapshot(&self) -> ArraySnapshot {
        ArraySnapshot {
            dims: self.dims().iter().map(ToSnapshot::to_snapshot).collect(),
            shape: self.shape().iter().map(|&len| len as u64).collect(),
            values: self.to_row_major_vec(),
        }
    }
}

impl FromSnapshot for LabeledArray {
    type Snapshot = ArraySnapshot;

    fn from_snapshot(snapshot: ArraySnapshot) -> Result<Self> {
        let dims = snapshot
            .dims
            .into_iter()
            .map(Dimension::from_snapshot)
            .collect::<Result<Vec<_>>>()?;
        let lengths: Vec<u64> = dims.iter().map(|dim| dim.len() as u64).collect();
        if lengths != snapshot.shape {
            return Err(PersistenceError::InvalidPayload {
                reason: format!(
                    "recorded shape {:?} does not match label counts {:?}",
                    snapshot.shape, lengths
                ),
            });
        }
        LabeledArray::from_vec(dims, snapshot.values).map_err(|e| {
            PersistenceError::InvalidPayload {
                reason: e.to_string(),
            }
        })
    }
}
