//! Dimensions and mixed-radix iteration.
//!
//! Every generator reduces to an [`Odometer`]: an ordered list of
//! [`Dimension`]s, outermost first. Point `i` of the odometer gives dimension
//! `k` the index `(i / stride_k) % len_k`, reversed on odd passes when the
//! dimension alternates. Nothing is materialized per point, so iterating costs
//! O(rank) per step whatever the size of the space.
//!
//! A dimension is fed by one of four sources:
//!
//! - a raw trajectory over one or more axes,
//! - the surviving flat indices of a masked inner odometer,
//! - several odometers advanced in lock-step (concurrent composition),
//! - several odometers visited one after another (consecutive composition).
//!
//! Dimensions write into a caller-owned value buffer through slots resolved
//! by axis name ([`Layout`]), so composing generators rebinds slots rather
//! than copying point data.

use crate::trajectory::{AxisTrajectory, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use scan_core::limits::checked_product;
use scan_core::region::ScanRegion;
use std::collections::HashMap;
use std::sync::Arc;

/// Axis name to output slot mapping of one generator.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    slots: HashMap<String, usize>,
}

impl Layout {
    /// Assign slots in `axes` order.
    ///
    /// Fails when an axis name appears twice.
    pub fn new(axes: &[String]) -> ScanResult<Self> {
        let mut slots = HashMap::with_capacity(axes.len());
        for (slot, axis) in axes.iter().enumerate() {
            if slots.insert(axis.clone(), slot).is_some() {
                return Err(ScanError::validation(format!(
                    "axis '{axis}' is declared more than once"
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Slot of `axis`.
    pub fn slot(&self, axis: &str) -> Option<usize> {
        self.slots.get(axis).copied()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no axis is laid out.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Where a dimension takes its values from.
#[derive(Debug, Clone)]
pub enum DimensionSource {
    /// Raw coordinate sequence.
    Trajectory {
        /// Sequence read by index.
        trajectory: Arc<dyn AxisTrajectory>,
        /// Parameters the sequence was built from, kept for export.
        params: TrajectoryParams,
    },
    /// Points of `inner` that survived `regions`.
    Masked {
        /// Unmasked sub-space.
        inner: Odometer,
        /// Surviving flat indices of `inner`, ascending.
        surviving: Arc<[usize]>,
        /// Regions the mask was computed from.
        regions: Vec<ScanRegion>,
    },
    /// Equal-size odometers advanced together.
    Concurrent {
        /// Components, each writing its own axes.
        parts: Vec<Odometer>,
    },
    /// Odometers over the same axes, visited in order.
    Consecutive {
        /// Components in visiting order.
        parts: Vec<Odometer>,
        /// Flat index at which each part starts.
        starts: Arc<[usize]>,
    },
}

/// One level of the mixed-radix counter.
#[derive(Debug, Clone)]
pub struct Dimension {
    axes: Vec<String>,
    len: usize,
    alternate: bool,
    source: DimensionSource,
    slots: Vec<usize>,
}

impl Dimension {
    /// Dimension over a trajectory.
    pub fn trajectory(trajectory: Arc<dyn AxisTrajectory>, params: TrajectoryParams) -> Self {
        let axes = trajectory.axes().to_vec();
        let len = trajectory.len();
        let alternate = params.alternate();
        Self::unbound(
            axes,
            len,
            alternate,
            DimensionSource::Trajectory { trajectory, params },
        )
    }

    /// Dimension over the surviving points of `inner`.
    pub fn masked(
        inner: Odometer,
        surviving: Vec<usize>,
        regions: Vec<ScanRegion>,
        alternate: bool,
    ) -> Self {
        let axes = inner.axes();
        let len = surviving.len();
        Self::unbound(
            axes,
            len,
            alternate,
            DimensionSource::Masked {
                inner,
                surviving: Arc::from(surviving),
                regions,
            },
        )
    }

    /// Lock-step dimension. Every part must have the same size.
    pub fn concurrent(parts: Vec<Odometer>) -> ScanResult<Self> {
        let len = parts.first().map_or(0, Odometer::len);
        if let Some(odd) = parts.iter().find(|p| p.len() != len) {
            return Err(ScanError::validation(format!(
                "components have different sizes ({len} and {})",
                odd.len()
            )));
        }
        let axes = parts.iter().flat_map(Odometer::axes).collect();
        Ok(Self::unbound(
            axes,
            len,
            false,
            DimensionSource::Concurrent { parts },
        ))
    }

    /// Sequential dimension. Parts share one axis set.
    pub fn consecutive(parts: Vec<Odometer>, alternate: bool) -> ScanResult<Self> {
        let mut starts = Vec::with_capacity(parts.len());
        let mut len = 0usize;
        for part in &parts {
            starts.push(len);
            len = len
                .checked_add(part.len())
                .ok_or(ScanError::SizeOverflow {
                    context: "consecutive size",
                })?;
        }
        let axes = parts.first().map(Odometer::axes).unwrap_or_default();
        Ok(Self::unbound(
            axes,
            len,
            alternate,
            DimensionSource::Consecutive {
                parts,
                starts: Arc::from(starts),
            },
        ))
    }

    fn unbound(axes: Vec<String>, len: usize, alternate: bool, source: DimensionSource) -> Self {
        Self {
            axes,
            len,
            alternate,
            source,
            slots: Vec::new(),
        }
    }

    /// Axes this dimension writes.
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Number of points along this dimension.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a dimension without points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the dimension reverses on every other pass.
    pub fn alternate(&self) -> bool {
        self.alternate
    }

    /// Value source.
    pub fn source(&self) -> &DimensionSource {
        &self.source
    }

    /// True when the dimension keeps only part of a sub-space.
    pub fn is_masked(&self) -> bool {
        matches!(self.source, DimensionSource::Masked { .. })
    }

    /// Resolve output slots for every axis, recursively.
    pub fn bind(&mut self, layout: &Layout) -> ScanResult<()> {
        self.slots = self
            .axes
            .iter()
            .map(|axis| {
                layout.slot(axis).ok_or_else(|| {
                    ScanError::validation(format!("axis '{axis}' is not part of the scan"))
                })
            })
            .collect::<ScanResult<_>>()?;
        match &mut self.source {
            DimensionSource::Trajectory { .. } => {}
            DimensionSource::Masked { inner, .. } => inner.bind(layout)?,
            DimensionSource::Concurrent { parts } | DimensionSource::Consecutive { parts, .. } => {
                for part in parts {
                    part.bind(layout)?;
                }
            }
        }
        Ok(())
    }

    /// Write point `index` of this dimension into the output buffers.
    pub fn write(&self, index: usize, values: &mut [f64], indices: &mut [usize]) {
        match &self.source {
            DimensionSource::Trajectory { trajectory, .. } => {
                for (k, &slot) in self.slots.iter().enumerate() {
                    values[slot] = trajectory.value(index, k);
                    indices[slot] = index;
                }
            }
            DimensionSource::Masked {
                inner, surviving, ..
            } => {
                inner.write(surviving[index], values, indices);
                self.stamp_indices(index, indices);
            }
            DimensionSource::Concurrent { parts } => {
                for part in parts {
                    part.write(index, values, indices);
                }
                self.stamp_indices(index, indices);
            }
            DimensionSource::Consecutive { parts, starts } => {
                let part = starts.partition_point(|&start| start <= index) - 1;
                parts[part].write(index - starts[part], values, indices);
                self.stamp_indices(index, indices);
            }
        }
    }

    // Composite sources report the outer index, not their parts' own.
    fn stamp_indices(&self, index: usize, indices: &mut [usize]) {
        for &slot in &self.slots {
            indices[slot] = index;
        }
    }
}

/// Mixed-radix counter over a list of dimensions, outermost first.
#[derive(Debug, Clone)]
pub struct Odometer {
    dims: Vec<Dimension>,
    strides: Vec<usize>,
    len: usize,
}

impl Odometer {
    /// Build the counter. Fails when the product of extents overflows.
    pub fn new(dims: Vec<Dimension>) -> ScanResult<Self> {
        let extents: Vec<usize> = dims.iter().map(Dimension::len).collect();
        let len = checked_product(&extents, "scan size")?;
        let mut strides = vec![1usize; dims.len()];
        for k in (0..dims.len().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1] * extents[k + 1];
        }
        Ok(Self { dims, strides, len })
    }

    /// Dimensions, outermost first.
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Take the dimensions back.
    pub fn into_dims(self) -> Vec<Dimension> {
        self.dims
    }

    /// Total number of points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when some dimension is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Extent of every dimension, outermost first.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Dimension::len).collect()
    }

    /// Every axis written, outermost dimension first.
    pub fn axes(&self) -> Vec<String> {
        self.dims
            .iter()
            .flat_map(|d| d.axes().iter().cloned())
            .collect()
    }

    /// Index of dimension `k` at flat point `flat`.
    pub fn dim_index(&self, k: usize, flat: usize) -> usize {
        let dim = &self.dims[k];
        let pass = flat / self.strides[k];
        let raw = pass % dim.len;
        if dim.alternate && (pass / dim.len) % 2 == 1 {
            dim.len - 1 - raw
        } else {
            raw
        }
    }

    /// Whether dimension `k` runs backwards at flat point `flat`.
    pub fn is_reversed(&self, k: usize, flat: usize) -> bool {
        let dim = &self.dims[k];
        dim.alternate && (flat / self.strides[k] / dim.len) % 2 == 1
    }

    /// Resolve output slots of every dimension.
    pub fn bind(&mut self, layout: &Layout) -> ScanResult<()> {
        for dim in &mut self.dims {
            dim.bind(layout)?;
        }
        Ok(())
    }

    /// Write flat point `flat` into the output buffers.
    pub fn write(&self, flat: usize, values: &mut [f64], indices: &mut [usize]) {
        for k in 0..self.dims.len() {
            self.dims[k].write(self.dim_index(k, flat), values, indices);
        }
    }
}
