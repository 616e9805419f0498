//! Straight lines over one or more axes.

use super::{wrong_family, AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams};
use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Evenly spaced points from `start` to `stop` inclusive, per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineParams {
    /// Axes moved together.
    pub axes: Vec<String>,
    /// Units per axis.
    pub units: Vec<String>,
    /// First value per axis.
    pub start: Vec<f64>,
    /// Last value per axis.
    pub stop: Vec<f64>,
    /// Number of points.
    pub size: usize,
    /// Snake inside an enclosing scan.
    #[serde(default)]
    pub alternate: bool,
}

impl LineParams {
    /// Line along a single axis.
    pub fn single(axis: &str, units: &str, start: f64, stop: f64, size: usize) -> Self {
        Self {
            axes: vec![axis.to_string()],
            units: vec![units.to_string()],
            start: vec![start],
            stop: vec![stop],
            size,
            alternate: false,
        }
    }

    /// Set the alternate flag.
    pub fn with_alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }
}

/// Line trajectory evaluated as `start + index * step`.
#[derive(Debug, Clone)]
pub struct LineTrajectory {
    axes: Vec<String>,
    start: Vec<f64>,
    step: Vec<f64>,
    size: usize,
}

impl LineTrajectory {
    /// Build from parameters.
    pub fn new(params: &LineParams) -> ScanResult<Self> {
        let n = params.axes.len();
        if params.start.len() != n || params.stop.len() != n {
            return Err(ScanError::validation(format!(
                "line over {:?} needs one start and stop per axis",
                params.axes
            )));
        }
        if params.start.iter().chain(&params.stop).any(|v| !v.is_finite()) {
            return Err(ScanError::validation(format!(
                "line over {:?} has non-finite bounds",
                params.axes
            )));
        }
        let step = params
            .start
            .iter()
            .zip(&params.stop)
            .map(|(start, stop)| {
                if params.size > 1 {
                    (stop - start) / (params.size - 1) as f64
                } else {
                    0.0
                }
            })
            .collect();
        Ok(Self {
            axes: params.axes.clone(),
            start: params.start.clone(),
            step,
            size: params.size,
        })
    }
}

impl AxisTrajectory for LineTrajectory {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn len(&self) -> usize {
        self.size
    }

    fn value(&self, index: usize, axis: usize) -> f64 {
        self.start[axis] + index as f64 * self.step[axis]
    }
}

/// Native provider of the `line` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineProvider;

impl LineProvider {
    /// Family name.
    pub const FAMILY: &'static str = "line";
}

impl AxisTrajectoryProvider for LineProvider {
    fn family(&self) -> &str {
        Self::FAMILY
    }

    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        match params {
            TrajectoryParams::Line(p) => Ok(Arc::new(LineTrajectory::new(p)?)),
            other => Err(wrong_family(Self::FAMILY, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_steps_are_exact() {
        let line = LineTrajectory::new(&LineParams::single("T", "K", 290.0, 300.0, 11)).unwrap();
        let values: Vec<f64> = (0..line.len()).map(|i| line.value(i, 0)).collect();
        let expected: Vec<f64> = (290..=300).map(f64::from).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_diagonal_line() {
        let params = LineParams {
            axes: vec!["x".to_string(), "y".to_string()],
            units: vec!["mm".to_string(), "mm".to_string()],
            start: vec![0.0, 0.0],
            stop: vec![3.0, 4.0],
            size: 6,
            alternate: false,
        };
        let line = LineTrajectory::new(&params).unwrap();
        assert!((line.value(5, 0) - 3.0).abs() < 1e-12);
        assert!((line.value(5, 1) - 4.0).abs() < 1e-12);
        assert!((line.value(1, 1) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_sits_at_start() {
        let line = LineTrajectory::new(&LineParams::single("x", "mm", 2.0, 2.0, 1)).unwrap();
        assert_eq!(line.value(0, 0), 2.0);
    }

    #[test]
    fn test_mismatched_bounds_rejected() {
        let mut params = LineParams::single("x", "mm", 0.0, 1.0, 3);
        params.stop.push(2.0);
        assert!(LineTrajectory::new(&params).unwrap_err().is_validation());
    }
}
