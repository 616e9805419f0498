//! Lissajous figures.
//!
//! x oscillates with `lobes` periods and a quarter-period phase lead, y with
//! `lobes + 1` periods, both over one full cycle of `size` points.

use super::{wrong_family, AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

/// Lissajous figure centred on `centre` spanning `span`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LissajousParams {
    /// x and y axis names.
    pub axes: Vec<String>,
    /// Units per axis.
    pub units: Vec<String>,
    /// Centre of the figure.
    pub centre: [f64; 2],
    /// Full width and height.
    pub span: [f64; 2],
    /// Lobes along x.
    pub lobes: u32,
    /// Number of points.
    pub size: usize,
    /// Snake inside an enclosing scan.
    #[serde(default)]
    pub alternate: bool,
}

/// Lissajous trajectory.
#[derive(Debug, Clone)]
pub struct LissajousTrajectory {
    axes: Vec<String>,
    centre: [f64; 2],
    amplitude: [f64; 2],
    frequency: [f64; 2],
    increment: f64,
    size: usize,
}

impl LissajousTrajectory {
    /// Build from parameters.
    pub fn new(params: &LissajousParams) -> ScanResult<Self> {
        if params.axes.len() != 2 {
            return Err(ScanError::validation(format!(
                "lissajous needs two axes, got {:?}",
                params.axes
            )));
        }
        if params.lobes == 0 {
            return Err(ScanError::validation("lissajous needs at least one lobe"));
        }
        let lobes = f64::from(params.lobes);
        Ok(Self {
            axes: params.axes.clone(),
            centre: params.centre,
            amplitude: [params.span[0] / 2.0, params.span[1] / 2.0],
            frequency: [lobes, lobes + 1.0],
            increment: TAU / params.size.max(1) as f64,
            size: params.size,
        })
    }
}

impl AxisTrajectory for LissajousTrajectory {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn len(&self) -> usize {
        self.size
    }

    fn value(&self, index: usize, axis: usize) -> f64 {
        let t = index as f64 * self.increment;
        let phase = if axis == 0 { FRAC_PI_2 } else { 0.0 };
        self.centre[axis] + self.amplitude[axis] * (self.frequency[axis] * t + phase).sin()
    }
}

/// Native provider of the `lissajous` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct LissajousProvider;

impl LissajousProvider {
    /// Family name.
    pub const FAMILY: &'static str = "lissajous";
}

impl AxisTrajectoryProvider for LissajousProvider {
    fn family(&self) -> &str {
        Self::FAMILY
    }

    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        match params {
            TrajectoryParams::Lissajous(p) => Ok(Arc::new(LissajousTrajectory::new(p)?)),
            other => Err(wrong_family(Self::FAMILY, other)),
        }
    }
}
