//! Explicit positions on one axis.

use super::{wrong_family, AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Positions visited in the given order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayParams {
    /// The single axis.
    pub axes: Vec<String>,
    /// Units of the axis.
    pub units: Vec<String>,
    /// Values in visiting order.
    pub points: Vec<f64>,
    /// Snake inside an enclosing scan.
    #[serde(default)]
    pub alternate: bool,
}

/// Array trajectory.
#[derive(Debug, Clone)]
pub struct ArrayTrajectory {
    axes: Vec<String>,
    points: Arc<[f64]>,
}

impl ArrayTrajectory {
    /// Build from parameters.
    pub fn new(params: &ArrayParams) -> ScanResult<Self> {
        if params.axes.len() != 1 {
            return Err(ScanError::validation(format!(
                "array trajectory needs exactly one axis, got {:?}",
                params.axes
            )));
        }
        if params.points.iter().any(|v| !v.is_finite()) {
            return Err(ScanError::validation(format!(
                "array positions for '{}' must be finite",
                params.axes[0]
            )));
        }
        Ok(Self {
            axes: params.axes.clone(),
            points: Arc::from(params.points.as_slice()),
        })
    }
}

impl AxisTrajectory for ArrayTrajectory {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn value(&self, index: usize, _axis: usize) -> f64 {
        self.points[index]
    }
}

/// Native provider of the `array` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayProvider;

impl ArrayProvider {
    /// Family name.
    pub const FAMILY: &'static str = "array";
}

impl AxisTrajectoryProvider for ArrayProvider {
    fn family(&self) -> &str {
        Self::FAMILY
    }

    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        match params {
            TrajectoryParams::Array(p) => Ok(Arc::new(ArrayTrajectory::new(p)?)),
            other => Err(wrong_family(Self::FAMILY, other)),
        }
    }
}
