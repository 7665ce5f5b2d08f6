//! Labeled n-dimensional array.
//!
//! [`LabeledArray`] pairs an `ndarray` buffer of `f64` cells with one
//! [`Dimension`] per axis. Missing cells are `NaN`. The operations here are
//! the small subset of a labeled-array engine the corpus needs: building from
//! observations, transposition by name, label selection, NaN-skipping sums and
//! outer-joined concatenation along a new leading dimension.

use std::collections::{BTreeSet, HashMap, HashSet};

use ndarray::Dimension as _;
use ndarray::{ArrayD, Axis, IxDyn};

use crate::coord::Coord;
use crate::error::{ArrayError, Result};

/// A named axis and its ordered, unique labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub labels: Vec<Coord>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, labels: Vec<Coord>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label` along this dimension.
    pub fn position(&self, label: &Coord) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }

    fn index_map(&self) -> HashMap<&Coord, usize> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label, idx))
            .collect()
    }
}

/// Labeled array of `f64` cells.
#[derive(Debug, Clone)]
pub struct LabeledArray {
    dims: Vec<Dimension>,
    values: ArrayD<f64>,
}

impl LabeledArray {
    /// Wraps an existing buffer. Its shape must match the dimension lengths.
    pub fn new(dims: Vec<Dimension>, values: ArrayD<f64>) -> Result<Self> {
        validate_dims(&dims)?;
        let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
        if values.shape() != shape.as_slice() {
            return Err(ArrayError::ShapeMismatch {
                expected: shape.iter().product(),
                found: values.len(),
            });
        }
        Ok(Self { dims, values })
    }

    /// Builds an array from a row-major value buffer.
    pub fn from_vec(dims: Vec<Dimension>, values: Vec<f64>) -> Result<Self> {
        validate_dims(&dims)?;
        let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
        let expected: usize = shape.iter().product();
        let found = values.len();
        let values = ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|_| ArrayError::ShapeMismatch { expected, found })?;
        Ok(Self { dims, values })
    }

    /// Builds an array from sparse observations.
    ///
    /// Each dimension gets the sorted set of labels seen in `records`; cells
    /// without an observation are `NaN`. Two observations for the same
    /// coordinate are rejected.
    pub fn from_records<I>(dim_names: &[&str], records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<Coord>, f64)>,
    {
        let records: Vec<(Vec<Coord>, f64)> = records.into_iter().collect();
        let mut label_sets: Vec<BTreeSet<Coord>> = vec![BTreeSet::new(); dim_names.len()];
        for (coords, _) in &records {
            if coords.len() != dim_names.len() {
                return Err(ArrayError::CoordinateArity {
                    expected: dim_names.len(),
                    found: coords.len(),
                });
            }
            for (set, coord) in label_sets.iter_mut().zip(coords) {
                if !set.contains(coord) {
                    set.insert(coord.clone());
                }
            }
        }
        let dims: Vec<Dimension> = dim_names
            .iter()
            .zip(label_sets)
            .map(|(name, labels)| Dimension::new(*name, labels.into_iter().collect()))
            .collect();
        validate_dims(&dims)?;

        let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
        let mut values = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
        {
            let index_maps: Vec<HashMap<&Coord, usize>> =
                dims.iter().map(Dimension::index_map).collect();
            let mut seen: HashSet<Vec<usize>> = HashSet::with_capacity(records.len());
            for (coords, value) in &records {
                let mut index = Vec::with_capacity(coords.len());
                for (coord, map) in coords.iter().zip(&index_maps) {
                    index.push(map.get(coord).copied().unwrap_or_default());
                }
                if !seen.insert(index.clone()) {
                    return Err(ArrayError::DuplicateCoordinate {
                        coordinate: join_coords(coords),
                    });
                }
                values[index.as_slice()] = *value;
            }
        }
        Ok(Self { dims, values })
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn dim_names(&self) -> Vec<&str> {
        self.dims.iter().map(|dim| dim.name.as_str()).collect()
    }

    pub fn has_dim(&self, name: &str) -> bool {
        self.dims.iter().any(|dim| dim.name == name)
    }

    pub fn dim(&self, name: &str) -> Result<&Dimension> {
        self.dims
            .iter()
            .find(|dim| dim.name == name)
            .ok_or_else(|| ArrayError::UnknownDimension {
                name: name.to_string(),
            })
    }

    /// Axis index of the named dimension.
    pub fn axis_of(&self, name: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|dim| dim.name == name)
            .ok_or_else(|| ArrayError::UnknownDimension {
                name: name.to_string(),
            })
    }

    pub fn labels(&self, name: &str) -> Result<&[Coord]> {
        Ok(self.dim(name)?.labels.as_slice())
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Number of cells, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing cells.
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|value| !value.is_nan()).count()
    }

    /// Sum of all non-missing cells.
    pub fn total(&self) -> f64 {
        self.values.iter().filter(|value| !value.is_nan()).sum()
    }

    /// Cell values flattened in row-major order.
    pub fn to_row_major_vec(&self) -> Vec<f64> {
        self.values.as_standard_layout().iter().copied().collect()
    }

    /// Reads one cell. The selector must name every dimension exactly once.
    pub fn value(&self, selector: &[(&str, Coord)]) -> Result<f64> {
        let mut index = Vec::with_capacity(self.dims.len());
        for dim in &self.dims {
            let (_, label) = selector
                .iter()
                .find(|(name, _)| *name == dim.name)
                .ok_or_else(|| ArrayError::IncompleteSelection {
                    missing: dim.name.clone(),
                })?;
            let position = dim.position(label).ok_or_else(|| ArrayError::UnknownLabel {
                dim: dim.name.clone(),
                label: label.to_string(),
            })?;
            index.push(position);
        }
        for (name, _) in selector {
            if !self.has_dim(name) {
                return Err(ArrayError::UnknownDimension {
                    name: (*name).to_string(),
                });
            }
        }
        Ok(self.values[index.as_slice()])
    }

    /// Renames a dimension, keeping its axis position.
    pub fn rename_dim(mut self, from: &str, to: &str) -> Result<Self> {
        if from != to && self.has_dim(to) {
            return Err(ArrayError::DuplicateDimension {
                name: to.to_string(),
            });
        }
        let axis = self.axis_of(from)?;
        self.dims[axis].name = to.to_string();
        Ok(self)
    }

    /// Reorders axes to follow `order`, which must name every dimension once.
    pub fn transpose(&self, order: &[&str]) -> Result<Self> {
        if order.len() != self.dims.len() {
            return Err(ArrayError::DimensionMismatch {
                expected: self.dim_names().join(", "),
                found: order.join(", "),
            });
        }
        let mut permutation = Vec::with_capacity(order.len());
        for name in order {
            let axis = self.axis_of(name)?;
            if permutation.contains(&axis) {
                return Err(ArrayError::DuplicateDimension {
                    name: (*name).to_string(),
                });
            }
            permutation.push(axis);
        }
        let dims = permutation
            .iter()
            .map(|&axis| self.dims[axis].clone())
            .collect();
        let values = self
            .values
            .clone()
            .permuted_axes(IxDyn(&permutation))
            .as_standard_layout()
            .into_owned();
        Ok(Self { dims, values })
    }

    /// Keeps only `labels` along `dim`, in the given order.
    ///
    /// An empty selection yields a zero-length axis.
    pub fn select(&self, dim: &str, labels: &[Coord]) -> Result<Self> {
        let axis = self.axis_of(dim)?;
        let mut indices = Vec::with_capacity(labels.len());
        for label in labels {
            let position =
                self.dims[axis]
                    .position(label)
                    .ok_or_else(|| ArrayError::UnknownLabel {
                        dim: dim.to_string(),
                        label: label.to_string(),
                    })?;
            indices.push(position);
        }
        let mut dims = self.dims.clone();
        dims[axis].labels = labels.to_vec();
        validate_dims(&dims)?;
        let values = if indices.is_empty() {
            let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
            ArrayD::from_elem(IxDyn(&shape), f64::NAN)
        } else {
            self.values.select(Axis(axis), &indices)
        };
        Ok(Self { dims, values })
    }

    /// Sums `dim` away, skipping missing cells. Empty lanes sum to zero.
    pub fn sum_over(&self, dim: &str) -> Result<Self> {
        let axis = self.axis_of(dim)?;
        let values = self.values.map_axis(Axis(axis), |lane| {
            lane.iter().filter(|value| !value.is_nan()).sum::<f64>()
        });
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Self { dims, values })
    }

    /// Stacks `arrays` along a new leading dimension `dim` labeled by `labels`.
    ///
    /// Every array must expose the same set of dimensions (any order). Label
    /// sets of the shared dimensions are outer-joined: the result carries the
    /// sorted union and cells an input does not cover are `NaN`.
    pub fn concat(arrays: &[LabeledArray], dim: &str, labels: Vec<Coord>) -> Result<Self> {
        let first = arrays.first().ok_or(ArrayError::EmptyConcat)?;
        if labels.len() != arrays.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: arrays.len(),
                found: labels.len(),
            });
        }
        if first.has_dim(dim) {
            return Err(ArrayError::DuplicateDimension {
                name: dim.to_string(),
            });
        }
        let order = first.dim_names();
        let mut unions: Vec<BTreeSet<Coord>> = first
            .dims
            .iter()
            .map(|d| d.labels.iter().cloned().collect())
            .collect();
        let mut aligned = Vec::with_capacity(arrays.len());
        for array in arrays {
            if !same_dim_set(array, &order) {
                return Err(ArrayError::DimensionMismatch {
                    expected: order.join(", "),
                    found: array.dim_names().join(", "),
                });
            }
            let array = array.transpose(&order)?;
            for (set, d) in unions.iter_mut().zip(&array.dims) {
                set.extend(d.labels.iter().cloned());
            }
            aligned.push(array);
        }

        let mut dims = Vec::with_capacity(order.len() + 1);
        dims.push(Dimension::new(dim, labels));
        dims.extend(
            order
                .iter()
                .zip(unions)
                .map(|(name, set)| Dimension::new(*name, set.into_iter().collect())),
        );
        validate_dims(&dims)?;

        let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
        let mut values = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
        for (slot, array) in aligned.iter().enumerate() {
            let mut maps: Vec<Vec<usize>> = Vec::with_capacity(array.dims.len());
            for (source, target) in array.dims.iter().zip(&dims[1..]) {
                let target_index = target.index_map();
                let mut map = Vec::with_capacity(source.len());
                for label in &source.labels {
                    let position = target_index.get(label).copied().ok_or_else(|| {
                        ArrayError::UnknownLabel {
                            dim: target.name.clone(),
                            label: label.to_string(),
                        }
                    })?;
                    map.push(position);
                }
                maps.push(map);
            }
            let mut target = vec![0usize; shape.len()];
            target[0] = slot;
            for (index, value) in array.values.indexed_iter() {
                for (axis, &position) in index.slice().iter().enumerate() {
                    target[axis + 1] = maps[axis][position];
                }
                values[target.as_slice()] = *value;
            }
        }
        Ok(Self { dims, values })
    }
}

fn same_dim_set(array: &LabeledArray, names: &[&str]) -> bool {
    array.dims.len() == names.len() && names.iter().all(|name| array.has_dim(name))
}

fn validate_dims(dims: &[Dimension]) -> Result<()> {
    let mut names = HashSet::with_capacity(dims.len());
    for dim in dims {
        if !names.insert(dim.name.as_str()) {
            return Err(ArrayError::DuplicateDimension {
                name: dim.name.clone(),
            });
        }
        let mut labels = HashSet::with_capacity(dim.labels.len());
        for label in &dim.labels {
            if !labels.insert(label) {
                return Err(ArrayError::DuplicateLabel {
                    dim: dim.name.clone(),
                    label: label.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn join_coords(coords: &[Coord]) -> String {
    coords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
