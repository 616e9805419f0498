//! Single-axis models.

use super::span::{fit_steps, AxisSpan};
use super::{default_continuous, default_units, AxisModel};
use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};

/// Evenly stepped values from `start` to `stop`.
///
/// # Example
///
/// ```rust,ignore
/// let model = AxialStepModel::new("Temperature", 290.0, 300.0, 1.0);
/// assert_eq!(model.enforce_shape()?.points, 11);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialStepModel {
    /// Axis name.
    pub name: String,
    /// First value.
    pub start: f64,
    /// Nominal last value; trimmed to a whole number of steps.
    pub stop: f64,
    /// Signed distance between values.
    pub step: f64,
    /// Axis units.
    #[serde(default = "default_units")]
    pub units: String,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl AxialStepModel {
    /// Create a step model with default units.
    pub fn new(name: impl Into<String>, start: f64, stop: f64, step: f64) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
            step,
            units: default_units(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Set the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Convert to the equivalent explicit point count model.
    ///
    /// The stop value is trimmed to the last whole step, so both models
    /// produce the same values in the same order.
    pub fn enforce_shape(&self) -> ScanResult<AxialPointsModel> {
        let fit = fit_steps(self.stop - self.start, self.step, false, &self.name)?;
        let stop = self.start + (fit.points - 1) as f64 * self.step;
        Ok(AxialPointsModel {
            name: self.name.clone(),
            start: self.start,
            stop,
            points: fit.points,
            units: self.units.clone(),
            alternating: self.alternating,
            continuous: self.continuous,
        })
    }
}

impl AxisModel for AxialStepModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// A fixed number of evenly spaced values from `start` to `stop` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialPointsModel {
    /// Axis name.
    pub name: String,
    /// First value.
    pub start: f64,
    /// Last value.
    pub stop: f64,
    /// Number of values.
    pub points: usize,
    /// Axis units.
    #[serde(default = "default_units")]
    pub units: String,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl AxialPointsModel {
    /// Create a points model with default units.
    pub fn new(name: impl Into<String>, start: f64, stop: f64, points: usize) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
            points,
            units: default_units(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Point placement along the axis.
    pub fn span(&self) -> AxisSpan {
        let mut span = AxisSpan::place(self.start, self.stop - self.start, self.points, false);
        if self.points == 1 {
            span.half_step = 0.0;
        }
        span
    }
}

impl AxisModel for AxialPointsModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Explicit list of positions along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialArrayModel {
    /// Axis name.
    pub name: String,
    /// Values in visiting order.
    pub positions: Vec<f64>,
    /// Axis units.
    #[serde(default = "default_units")]
    pub units: String,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl AxialArrayModel {
    /// Create an array model with default units.
    pub fn new(name: impl Into<String>, positions: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            positions,
            units: default_units(),
            alternating: false,
            continuous: default_continuous(),
        }
    }
}

impl AxisModel for AxialArrayModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Consecutive step ranges over one axis, e.g. coarse-fine-coarse energy scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialMultiStepModel {
    /// Axis name shared by every range.
    pub name: String,
    /// Ranges in visiting order.
    pub step_models: Vec<AxialStepModel>,
    /// Axis units.
    #[serde(default = "default_units")]
    pub units: String,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Ranges must join without gaps and run in one direction.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl AxialMultiStepModel {
    /// Create an empty multi-step model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_models: Vec::new(),
            units: default_units(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Append a range over this model's axis.
    pub fn with_range(mut self, start: f64, stop: f64, step: f64) -> Self {
        let range = AxialStepModel::new(self.name.clone(), start, stop, step)
            .with_units(self.units.clone())
            .with_continuous(self.continuous);
        self.step_models.push(range);
        self
    }

    /// Set the continuous flag on the model and every range.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        for range in &mut self.step_models {
            range.continuous = continuous;
        }
        self
    }

    /// Convert every range to its point count form.
    pub fn enforce_shape(&self) -> ScanResult<Vec<AxialPointsModel>> {
        if self.step_models.is_empty() {
            return Err(ScanError::validation(format!(
                "multi-step model '{}' has no ranges",
                self.name
            )));
        }
        self.step_models
            .iter()
            .map(AxialStepModel::enforce_shape)
            .collect()
    }
}

impl AxisModel for AxialMultiStepModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn units(&self) -> Vec<String> {
        vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_enforce_shape_trims_stop() {
        let points = AxialStepModel::new("Position", 1.0, 4.0, 0.6)
            .enforce_shape()
            .unwrap();
        assert_eq!(points.points, 6);
        assert_eq!(points.stop, 4.0);

        let span = points.span();
        let values: Vec<f64> = (0..points.points).map(|i| span.value(i)).collect();
        assert_eq!(values[1], 1.6);
        assert_eq!(values[2], 2.2);
    }

    #[test]
    fn test_step_larger_than_range_gives_one_point() {
        let points = AxialStepModel::new("x", 0.0, 0.5, 1.0).enforce_shape().unwrap();
        assert_eq!(points.points, 1);
        assert_eq!(points.stop, 0.0);
    }

    #[test]
    fn test_multi_step_requires_ranges() {
        let err = AxialMultiStepModel::new("energy").enforce_shape().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_serde_defaults() {
        let model: AxialStepModel =
            serde_json::from_str(r#"{"name":"T","start":290,"stop":300,"step":1}"#).unwrap();
        assert_eq!(model.units, "mm");
        assert!(model.continuous);
        assert!(!model.alternating);
    }
}
