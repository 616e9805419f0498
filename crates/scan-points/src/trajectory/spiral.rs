//! Fermat spiral.
//!
//! Point `i` sits at angle `phi = alpha * sqrt(i + 0.5)` and radius
//! `beta * phi`, with `alpha = sqrt(4 pi)` and `beta = scale / (2 pi)`. This
//! spaces neighbouring points roughly `scale` apart. The point count is the
//! number of turns needed to reach `radius`.

use super::{wrong_family, AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Spiral around `centre` out to `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralParams {
    /// x and y axis names.
    pub axes: Vec<String>,
    /// Units per axis.
    pub units: Vec<String>,
    /// Centre of the spiral.
    pub centre: [f64; 2],
    /// Outer radius.
    pub radius: f64,
    /// Approximate distance between neighbouring points.
    pub scale: f64,
    /// Snake inside an enclosing scan.
    #[serde(default)]
    pub alternate: bool,
}

/// Spiral trajectory.
#[derive(Debug, Clone)]
pub struct SpiralTrajectory {
    axes: Vec<String>,
    centre: [f64; 2],
    alpha: f64,
    beta: f64,
    size: usize,
}

impl SpiralTrajectory {
    /// Build from parameters.
    pub fn new(params: &SpiralParams) -> ScanResult<Self> {
        if params.axes.len() != 2 {
            return Err(ScanError::validation(format!(
                "spiral needs two axes, got {:?}",
                params.axes
            )));
        }
        if !(params.scale.is_finite() && params.scale > 0.0) {
            return Err(ScanError::validation(format!(
                "spiral scale must be positive, got {}",
                params.scale
            )));
        }
        if !(params.radius.is_finite() && params.radius >= 0.0) {
            return Err(ScanError::validation(format!(
                "spiral radius must be non-negative, got {}",
                params.radius
            )));
        }
        let alpha = (4.0 * PI).sqrt();
        let beta = params.scale / (2.0 * PI);
        let turns = (params.radius / (alpha * beta)).powi(2);
        if turns >= usize::MAX as f64 {
            return Err(ScanError::SizeOverflow {
                context: "spiral point count",
            });
        }
        Ok(Self {
            axes: params.axes.clone(),
            centre: params.centre,
            alpha,
            beta,
            size: turns.floor() as usize + 1,
        })
    }
}

impl AxisTrajectory for SpiralTrajectory {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn len(&self) -> usize {
        self.size
    }

    fn value(&self, index: usize, axis: usize) -> f64 {
        let phi = self.alpha * (index as f64 + 0.5).sqrt();
        let r = self.beta * phi;
        if axis == 0 {
            self.centre[0] + r * phi.sin()
        } else {
            self.centre[1] + r * phi.cos()
        }
    }
}

/// Native provider of the `spiral` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiralProvider;

impl SpiralProvider {
    /// Family name.
    pub const FAMILY: &'static str = "spiral";
}

impl AxisTrajectoryProvider for SpiralProvider {
    fn family(&self) -> &str {
        Self::FAMILY
    }

    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        match params {
            TrajectoryParams::Spiral(p) => Ok(Arc::new(SpiralTrajectory::new(p)?)),
            other => Err(wrong_family(Self::FAMILY, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(radius: f64, scale: f64) -> SpiralParams {
        SpiralParams {
            axes: vec!["x".to_string(), "y".to_string()],
            units: vec!["mm".to_string(), "mm".to_string()],
            centre: [5.0, 2.0],
            radius,
            scale,
            alternate: false,
        }
    }

    #[test]
    fn test_point_count_grows_with_area() {
        let small = SpiralTrajectory::new(&params(5.0, 1.0)).unwrap();
        let large = SpiralTrajectory::new(&params(10.0, 1.0)).unwrap();
        // (r / (alpha beta))^2 = r^2 pi / scale^2
        assert_eq!(small.len(), (25.0 * PI).floor() as usize + 1);
        assert!(large.len() > 3 * small.len());
    }

    #[test]
    fn test_points_stay_near_radius() {
        let spiral = SpiralTrajectory::new(&params(5.0, 1.0)).unwrap();
        for i in 0..spiral.len() {
            let dx = spiral.value(i, 0) - 5.0;
            let dy = spiral.value(i, 1) - 2.0;
            assert!(dx.hypot(dy) <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(SpiralTrajectory::new(&params(5.0, 0.0)).unwrap_err().is_validation());
    }
}
