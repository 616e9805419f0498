//! Models without a trajectory of their own, and models built from others.

use super::mutator::MutatorModel;
use super::{default_continuous, AxisModel, ScanModel};
use crate::region::ScanRegion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_static_size() -> usize {
    1
}

/// Repeats the same (axis-less) point `size` times.
///
/// A single static point contributes no dimension; more than one adds a
/// dimension with no axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticModel {
    /// Number of repetitions.
    #[serde(default = "default_static_size")]
    pub size: usize,
}

impl StaticModel {
    /// Static model of `size` points.
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for StaticModel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl AxisModel for StaticModel {
    fn name(&self) -> &str {
        "Static"
    }

    fn axis_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn units(&self) -> Vec<String> {
        Vec::new()
    }

    fn is_alternating(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        false
    }
}

/// Trajectory computed by a provider registered under `provider`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Registered provider family.
    pub provider: String,
    /// Axes written by the provider.
    pub axes: Vec<String>,
    /// Units per axis.
    #[serde(default)]
    pub units: Vec<String>,
    /// Numeric parameters passed to the provider unchanged.
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    /// Reverse direction on every other pass of the enclosing scan.
    #[serde(default)]
    pub alternating: bool,
    /// Move through the points without stopping.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl ExternalModel {
    /// Model delegating to `provider` for `axes`.
    pub fn new<S: Into<String>>(provider: impl Into<String>, axes: impl IntoIterator<Item = S>) -> Self {
        let provider = provider.into();
        Self {
            name: provider.clone(),
            provider,
            axes: axes.into_iter().map(Into::into).collect(),
            units: Vec::new(),
            parameters: BTreeMap::new(),
            alternating: false,
            continuous: default_continuous(),
        }
    }

    /// Add a numeric parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

impl AxisModel for ExternalModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        self.axes.clone()
    }

    fn units(&self) -> Vec<String> {
        let mut units = self.units.clone();
        units.resize(self.axes.len(), super::default_units());
        units
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Components that advance in lock-step over disjoint axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrentModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Components, all of the same size.
    pub models: Vec<ScanModel>,
}

impl ConcurrentModel {
    /// Concurrent group of `models`.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self {
            name: "Concurrent".to_string(),
            models,
        }
    }
}

impl AxisModel for ConcurrentModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.axis_names()).collect()
    }

    fn units(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.units()).collect()
    }

    fn is_alternating(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        self.models.iter().all(ScanModel::is_continuous)
    }
}

/// Components visited one after another over the same axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsecutiveModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Components in visiting order.
    pub models: Vec<ScanModel>,
    /// Components must join without gaps.
    #[serde(default = "default_continuous")]
    pub continuous: bool,
}

impl ConsecutiveModel {
    /// Consecutive group of `models`.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self {
            name: "Consecutive".to_string(),
            models,
            continuous: default_continuous(),
        }
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }
}

impl AxisModel for ConsecutiveModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_names(&self) -> Vec<String> {
        self.models
            .first()
            .map(ScanModel::axis_names)
            .unwrap_or_default()
    }

    fn units(&self) -> Vec<String> {
        self.models.first().map(ScanModel::units).unwrap_or_default()
    }

    fn is_alternating(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Nested scan: `models` outer to inner, masked by `regions`, perturbed by
/// `mutators`.
///
/// # Example
///
/// ```rust,ignore
/// let model = CompoundModel::new(vec![
///     AxialStepModel::new("Temperature", 290.0, 295.0, 1.0).into(),
///     AxialStepModel::new("Position", 1.0, 4.0, 0.6).into(),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompoundModel {
    /// Components, outermost first.
    pub models: Vec<ScanModel>,
    /// Regions applied across the joined axis space.
    #[serde(default)]
    pub regions: Vec<ScanRegion>,
    /// Mutators applied last, in order.
    #[serde(default)]
    pub mutators: Vec<MutatorModel>,
    /// Exposure override applied to every point.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl CompoundModel {
    /// Compound of `models`, outermost first.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self {
            models,
            ..Self::default()
        }
    }

    /// Append an innermost component.
    pub fn with_model(mut self, model: impl Into<ScanModel>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Add a region.
    pub fn with_region(mut self, region: ScanRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Add a mutator.
    pub fn with_mutator(mut self, mutator: impl Into<MutatorModel>) -> Self {
        self.mutators.push(mutator.into());
        self
    }

    /// Set the per-point exposure.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl AxisModel for CompoundModel {
    fn name(&self) -> &str {
        "Compound"
    }

    fn axis_names(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.axis_names()).collect()
    }

    fn units(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.units()).collect()
    }

    fn is_alternating(&self) -> bool {
        false
    }

    fn is_continuous(&self) -> bool {
        self.models.last().is_some_and(ScanModel::is_continuous)
    }
}
