//! Axis-less repetition.

use super::{wrong_family, AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `size` repetitions of an empty coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticParams {
    /// Always empty for native static trajectories.
    #[serde(default)]
    pub axes: Vec<String>,
    /// Number of repetitions.
    pub size: usize,
}

/// Static trajectory.
#[derive(Debug, Clone)]
pub struct StaticTrajectory {
    axes: Vec<String>,
    size: usize,
}

impl AxisTrajectory for StaticTrajectory {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn len(&self) -> usize {
        self.size
    }

    fn value(&self, _index: usize, _axis: usize) -> f64 {
        0.0
    }
}

/// Native provider of the `static` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProvider;

impl StaticProvider {
    /// Family name.
    pub const FAMILY: &'static str = "static";
}

impl AxisTrajectoryProvider for StaticProvider {
    fn family(&self) -> &str {
        Self::FAMILY
    }

    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        match params {
            TrajectoryParams::Static(p) if p.axes.is_empty() => Ok(Arc::new(StaticTrajectory {
                axes: Vec::new(),
                size: p.size,
            })),
            TrajectoryParams::Static(p) => Err(ScanError::validation(format!(
                "static trajectory cannot write axes {:?}",
                p.axes
            ))),
            other => Err(wrong_family(Self::FAMILY, other)),
        }
    }
}
