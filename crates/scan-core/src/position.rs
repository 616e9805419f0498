//! Labeled scan coordinates.
//!
//! A [`Position`] is the record handed to a consumer for every step of a
//! scan: the value and index of each axis, the flattened step index, and the
//! per-level dimension names that tell writers which axes vary together.
//!
//! Axis names and dimension names are shared between every position of one
//! generator through `Arc`, so producing a position costs two small vector
//! allocations regardless of how many axes the scan moves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One point of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    names: Arc<[String]>,
    values: Vec<f64>,
    indices: Vec<usize>,
    step_index: usize,
    dimension_names: Arc<[Vec<String>]>,
    exposure_time: Option<f64>,
}

impl Position {
    /// Assemble a position from parallel name, value and index vectors.
    ///
    /// `values` and `indices` must have one entry per name.
    pub fn new(
        names: Arc<[String]>,
        values: Vec<f64>,
        indices: Vec<usize>,
        step_index: usize,
        dimension_names: Arc<[Vec<String>]>,
    ) -> Self {
        debug_assert_eq!(names.len(), values.len());
        debug_assert_eq!(names.len(), indices.len());
        Self {
            names,
            values,
            indices,
            step_index,
            dimension_names,
            exposure_time: None,
        }
    }

    /// Build a rank-1 position from `(axis, value)` pairs, all at `index`.
    ///
    /// Mostly useful for tests and for bounds reporting.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>, index: usize) -> Self {
        let (names, values): (Vec<String>, Vec<f64>) =
            pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        let indices = vec![index; names.len()];
        let dimension_names: Arc<[Vec<String>]> = Arc::from(vec![names.clone()]);
        Self::new(Arc::from(names), values, indices, index, dimension_names)
    }

    /// Axis names in generator order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Axis values, parallel to [`Position::names`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Per-axis indices within the owning dimension.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True for a position with no axes (static scans).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn slot(&self, axis: &str) -> Option<usize> {
        self.names.iter().position(|n| n == axis)
    }

    /// Value of the named axis.
    pub fn get(&self, axis: &str) -> Option<f64> {
        self.slot(axis).map(|i| self.values[i])
    }

    /// Index of the named axis within its dimension.
    pub fn index_of(&self, axis: &str) -> Option<usize> {
        self.slot(axis).map(|i| self.indices[i])
    }

    /// Flattened linear index of this point in the whole scan.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Number of composed dimensions of the scan this point belongs to.
    pub fn scan_rank(&self) -> usize {
        self.dimension_names.len()
    }

    /// Axis names varying at each rank level, outer first.
    pub fn dimension_names(&self) -> &[Vec<String>] {
        &self.dimension_names
    }

    /// Per-point exposure override, if the scan declares one.
    pub fn exposure_time(&self) -> Option<f64> {
        self.exposure_time
    }

    /// Iterate `(axis, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Axis values keyed by name.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(n, v)| (n.to_string(), v)).collect()
    }

    /// Overwrite the value of the named axis. Returns false for an unknown axis.
    pub fn set_value(&mut self, axis: &str, value: f64) -> bool {
        match self.slot(axis) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Mutable access to the values, parallel to [`Position::names`].
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Set the per-point exposure override.
    pub fn set_exposure_time(&mut self, exposure_time: Option<f64>) {
        self.exposure_time = exposure_time;
    }

    /// Builder form of [`Position::set_exposure_time`].
    pub fn with_exposure_time(mut self, exposure_time: f64) -> Self {
        self.exposure_time = Some(exposure_time);
        self
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "] (step {})", self.step_index)
    }
}
