//! Declarative scan models.
//!
//! A model is a serializable parameter set that fully determines the points
//! of one generator. [`ScanModel`] is the closed union of every supported
//! kind; the engine matches on it exhaustively when building generators.
//!
//! # Example
//!
//! ```rust,ignore
//! use scan_core::model::{AxialStepModel, ScanModel};
//!
//! let model: ScanModel = AxialStepModel::new("T", 290.0, 300.0, 1.0).into();
//! assert_eq!(model.axis_names(), vec!["T".to_string()]);
//! ```

mod axial;
mod composite;
mod mutator;
mod span;
mod two_axis;

pub use axial::{AxialArrayModel, AxialMultiStepModel, AxialPointsModel, AxialStepModel};
pub use composite::{CompoundModel, ConcurrentModel, ConsecutiveModel, ExternalModel, StaticModel};
pub use mutator::{MutatorModel, RandomOffsetMutator};
pub use span::{fit_steps, AxisSpan, StepFit};
pub use two_axis::{
    BoundingBox, BoundingLine, Orientation, TwoAxisGridPointsModel, TwoAxisGridStepModel,
    TwoAxisLinePointsModel, TwoAxisLineStepModel, TwoAxisLissajousModel, TwoAxisPointSingleModel,
    TwoAxisSpiralModel,
};

use crate::limits::DEFAULT_UNITS;
use serde::{Deserialize, Serialize};

pub(crate) fn default_units() -> String {
    DEFAULT_UNITS.to_string()
}

pub(crate) fn default_continuous() -> bool {
    true
}

/// Common view over every model kind.
pub trait AxisModel {
    /// Model name, used in diagnostics.
    fn name(&self) -> &str;

    /// Axes written by the model, in position order.
    fn axis_names(&self) -> Vec<String>;

    /// Units per axis, parallel to [`AxisModel::axis_names`].
    fn units(&self) -> Vec<String>;

    /// Whether the model snakes inside an enclosing scan.
    fn is_alternating(&self) -> bool;

    /// Whether motion through the points is continuous.
    fn is_continuous(&self) -> bool;
}

/// Every supported model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanModel {
    /// Stepped range on one axis.
    AxialStep(AxialStepModel),
    /// Fixed point count on one axis.
    AxialPoints(AxialPointsModel),
    /// Explicit positions on one axis.
    AxialArray(AxialArrayModel),
    /// Consecutive stepped ranges on one axis.
    AxialMultiStep(AxialMultiStepModel),
    /// Grid with point counts.
    TwoAxisGridPoints(TwoAxisGridPointsModel),
    /// Grid with steps.
    TwoAxisGridStep(TwoAxisGridStepModel),
    /// Line with a point count.
    TwoAxisLinePoints(TwoAxisLinePointsModel),
    /// Line with a step.
    TwoAxisLineStep(TwoAxisLineStepModel),
    /// Fermat spiral.
    TwoAxisSpiral(TwoAxisSpiralModel),
    /// Lissajous figure.
    TwoAxisLissajous(TwoAxisLissajousModel),
    /// One fixed coordinate.
    TwoAxisPointSingle(TwoAxisPointSingleModel),
    /// Repeated axis-less point.
    Static(StaticModel),
    /// Trajectory from a registered provider.
    External(ExternalModel),
    /// Lock-step components.
    Concurrent(ConcurrentModel),
    /// Sequential components.
    Consecutive(ConsecutiveModel),
    /// Nested components with regions and mutators.
    Compound(CompoundModel),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            ScanModel::AxialStep($m) => $body,
            ScanModel::AxialPoints($m) => $body,
            ScanModel::AxialArray($m) => $body,
            ScanModel::AxialMultiStep($m) => $body,
            ScanModel::TwoAxisGridPoints($m) => $body,
            ScanModel::TwoAxisGridStep($m) => $body,
            ScanModel::TwoAxisLinePoints($m) => $body,
            ScanModel::TwoAxisLineStep($m) => $body,
            ScanModel::TwoAxisSpiral($m) => $body,
            ScanModel::TwoAxisLissajous($m) => $body,
            ScanModel::TwoAxisPointSingle($m) => $body,
            ScanModel::Static($m) => $body,
            ScanModel::External($m) => $body,
            ScanModel::Concurrent($m) => $body,
            ScanModel::Consecutive($m) => $body,
            ScanModel::Compound($m) => $body,
        }
    };
}

impl ScanModel {
    /// Short label of the model kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AxialStep(_) => "axial_step",
            Self::AxialPoints(_) => "axial_points",
            Self::AxialArray(_) => "axial_array",
            Self::AxialMultiStep(_) => "axial_multi_step",
            Self::TwoAxisGridPoints(_) => "two_axis_grid_points",
            Self::TwoAxisGridStep(_) => "two_axis_grid_step",
            Self::TwoAxisLinePoints(_) => "two_axis_line_points",
            Self::TwoAxisLineStep(_) => "two_axis_line_step",
            Self::TwoAxisSpiral(_) => "two_axis_spiral",
            Self::TwoAxisLissajous(_) => "two_axis_lissajous",
            Self::TwoAxisPointSingle(_) => "two_axis_point_single",
            Self::Static(_) => "static",
            Self::External(_) => "external",
            Self::Concurrent(_) => "concurrent",
            Self::Consecutive(_) => "consecutive",
            Self::Compound(_) => "compound",
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        dispatch!(self, m => m.name())
    }

    /// Axes written by the model.
    pub fn axis_names(&self) -> Vec<String> {
        dispatch!(self, m => m.axis_names())
    }

    /// Units per axis.
    pub fn units(&self) -> Vec<String> {
        dispatch!(self, m => m.units())
    }

    /// Whether this model snakes.
    pub fn is_alternating(&self) -> bool {
        dispatch!(self, m => m.is_alternating())
    }

    /// Whether motion is continuous.
    pub fn is_continuous(&self) -> bool {
        dispatch!(self, m => m.is_continuous())
    }

    /// True if this model or any nested component snakes.
    pub fn contains_alternating(&self) -> bool {
        match self {
            Self::TwoAxisGridPoints(m) => m.alternating || m.alternate_both_axes,
            Self::TwoAxisGridStep(m) => m.alternating || m.alternate_both_axes,
            Self::Concurrent(m) => m.models.iter().any(Self::contains_alternating),
            Self::Consecutive(m) => m.models.iter().any(Self::contains_alternating),
            Self::Compound(m) => m.models.iter().any(Self::contains_alternating),
            other => other.is_alternating(),
        }
    }
}

macro_rules! impl_from_model {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScanModel {
                fn from(model: $ty) -> Self {
                    ScanModel::$variant(model)
                }
            }
        )*
    };
}

impl_from_model!(
    AxialStepModel => AxialStep,
    AxialPointsModel => AxialPoints,
    AxialArrayModel => AxialArray,
    AxialMultiStepModel => AxialMultiStep,
    TwoAxisGridPointsModel => TwoAxisGridPoints,
    TwoAxisGridStepModel => TwoAxisGridStep,
    TwoAxisLinePointsModel => TwoAxisLinePoints,
    TwoAxisLineStepModel => TwoAxisLineStep,
    TwoAxisSpiralModel => TwoAxisSpiral,
    TwoAxisLissajousModel => TwoAxisLissajous,
    TwoAxisPointSingleModel => TwoAxisPointSingle,
    StaticModel => Static,
    ExternalModel => External,
    ConcurrentModel => Concurrent,
    ConsecutiveModel => Consecutive,
    CompoundModel => Compound,
);
