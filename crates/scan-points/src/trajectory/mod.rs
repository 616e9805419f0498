//! Raw per-axis coordinate sequences.
//!
//! The engine never evaluates trajectory formulas itself. For every atomic
//! model it builds a [`TrajectoryParams`] value and asks the
//! [`TrajectoryRegistry`] for the provider of that family, which returns an
//! [`AxisTrajectory`]: a random-access, restartable sequence of coordinate
//! tuples.
//!
//! Native providers cover the line, array, spiral, Lissajous and static
//! families. Additional families are registered by name and reached through
//! `ExternalModel`.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = TrajectoryRegistry::native();
//! let line = registry.create(&TrajectoryParams::Line(LineParams::single("x", "mm", 0.0, 1.0, 5)))?;
//! assert_eq!(line.value(2, 0), 0.5);
//! ```

mod array;
mod fixed;
mod line;
mod lissajous;
mod spiral;

pub use array::{ArrayParams, ArrayProvider, ArrayTrajectory};
pub use fixed::{StaticParams, StaticProvider, StaticTrajectory};
pub use line::{LineParams, LineProvider, LineTrajectory};
pub use lissajous::{LissajousParams, LissajousProvider, LissajousTrajectory};
pub use spiral::{SpiralParams, SpiralProvider, SpiralTrajectory};

use scan_core::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Random-access coordinate sequence over one or more axes.
///
/// Implementations hold no cursor, so any number of iterators can read the
/// same trajectory at once.
pub trait AxisTrajectory: fmt::Debug + Send + Sync {
    /// Axes written, in tuple order.
    fn axes(&self) -> &[String];

    /// Number of coordinate tuples.
    fn len(&self) -> usize;

    /// True for a trajectory without points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate of `axis` (an offset into [`AxisTrajectory::axes`]) at `index`.
    fn value(&self, index: usize, axis: usize) -> f64;
}

/// Parameters for a trajectory the registered provider of some family builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalParams {
    /// Provider family name.
    pub provider: String,
    /// Axes the provider must write.
    pub axes: Vec<String>,
    /// Units per axis.
    #[serde(default)]
    pub units: Vec<String>,
    /// Provider specific numeric parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    /// Snake inside an enclosing scan.
    #[serde(default)]
    pub alternate: bool,
}

/// Numeric parameter set of every trajectory family.
///
/// This is also the wire form of a generator in the export dictionary,
/// hence the `typeid` tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeid")]
pub enum TrajectoryParams {
    /// Straight line, possibly over several axes at once.
    #[serde(rename = "scanpointgenerator:generator/LineGenerator:1.0")]
    Line(LineParams),
    /// Explicit positions on one axis.
    #[serde(rename = "scanpointgenerator:generator/ArrayGenerator:1.0")]
    Array(ArrayParams),
    /// Fermat spiral.
    #[serde(rename = "scanpointgenerator:generator/SpiralGenerator:1.0")]
    Spiral(SpiralParams),
    /// Lissajous figure.
    #[serde(rename = "scanpointgenerator:generator/LissajousGenerator:1.0")]
    Lissajous(LissajousParams),
    /// Axis-less repetition.
    #[serde(rename = "scanpointgenerator:generator/StaticPointGenerator:1.0")]
    Static(StaticParams),
    /// Provider registered under a custom family.
    #[serde(rename = "scanpointgenerator:generator/ExternalGenerator:1.0")]
    External(ExternalParams),
}

impl TrajectoryParams {
    /// Family used to look up the provider.
    pub fn family(&self) -> &str {
        match self {
            Self::Line(_) => LineProvider::FAMILY,
            Self::Array(_) => ArrayProvider::FAMILY,
            Self::Spiral(_) => SpiralProvider::FAMILY,
            Self::Lissajous(_) => LissajousProvider::FAMILY,
            Self::Static(_) => StaticProvider::FAMILY,
            Self::External(p) => &p.provider,
        }
    }

    /// Axes the trajectory writes.
    pub fn axes(&self) -> &[String] {
        match self {
            Self::Line(p) => &p.axes,
            Self::Array(p) => &p.axes,
            Self::Spiral(p) => &p.axes,
            Self::Lissajous(p) => &p.axes,
            Self::Static(p) => &p.axes,
            Self::External(p) => &p.axes,
        }
    }

    /// Whether the dimension built from these parameters snakes.
    pub fn alternate(&self) -> bool {
        match self {
            Self::Line(p) => p.alternate,
            Self::Array(p) => p.alternate,
            Self::Spiral(p) => p.alternate,
            Self::Lissajous(p) => p.alternate,
            Self::Static(_) => false,
            Self::External(p) => p.alternate,
        }
    }
}

/// Builds trajectories of one family.
pub trait AxisTrajectoryProvider: Send + Sync {
    /// Family name this provider answers to.
    fn family(&self) -> &str;

    /// Build the trajectory described by `params`.
    fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>>;
}

fn wrong_family(expected: &str, params: &TrajectoryParams) -> ScanError {
    ScanError::validation(format!(
        "{expected} provider cannot build a '{}' trajectory",
        params.family()
    ))
}

/// Providers keyed by family.
///
/// The registry is handed to the generator service at construction, so
/// tests and applications choose their providers explicitly.
#[derive(Clone)]
pub struct TrajectoryRegistry {
    providers: HashMap<String, Arc<dyn AxisTrajectoryProvider>>,
}

impl Default for TrajectoryRegistry {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Debug for TrajectoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryRegistry")
            .field("families", &self.families())
            .finish()
    }
}

impl TrajectoryRegistry {
    /// Registry without any provider.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registry with every native family.
    pub fn native() -> Self {
        Self::empty()
            .with_provider(Arc::new(LineProvider))
            .with_provider(Arc::new(ArrayProvider))
            .with_provider(Arc::new(SpiralProvider))
            .with_provider(Arc::new(LissajousProvider))
            .with_provider(Arc::new(StaticProvider))
    }

    /// Register a provider under its family, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn AxisTrajectoryProvider>) {
        self.providers.insert(provider.family().to_string(), provider);
    }

    /// Builder form of [`TrajectoryRegistry::register`].
    pub fn with_provider(mut self, provider: Arc<dyn AxisTrajectoryProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.providers.keys().cloned().collect();
        families.sort();
        families
    }

    /// Check if a family is registered.
    pub fn has_family(&self, family: &str) -> bool {
        self.providers.contains_key(family)
    }

    /// Build a trajectory with the provider registered for its family.
    ///
    /// The result must write exactly the requested axes and hold at least
    /// one point.
    pub fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
        let family = params.family();
        let provider = self.providers.get(family).ok_or_else(|| {
            ScanError::validation(format!("no trajectory provider registered for '{family}'"))
        })?;
        let trajectory = provider.create(params)?;
        if trajectory.axes() != params.axes() {
            return Err(ScanError::generation(format!(
                "'{family}' provider wrote axes {:?}, expected {:?}",
                trajectory.axes(),
                params.axes()
            )));
        }
        if trajectory.is_empty() {
            return Err(ScanError::generation(format!(
                "'{family}' trajectory over {:?} has no points",
                params.axes()
            )));
        }
        Ok(trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ramp {
        axes: Vec<String>,
        len: usize,
    }

    impl AxisTrajectory for Ramp {
        fn axes(&self) -> &[String] {
            &self.axes
        }

        fn len(&self) -> usize {
            self.len
        }

        fn value(&self, index: usize, _axis: usize) -> f64 {
            index as f64 * 10.0
        }
    }

    struct RampProvider;

    impl AxisTrajectoryProvider for RampProvider {
        fn family(&self) -> &str {
            "ramp"
        }

        fn create(&self, params: &TrajectoryParams) -> ScanResult<Arc<dyn AxisTrajectory>> {
            let TrajectoryParams::External(p) = params else {
                return Err(wrong_family("ramp", params));
            };
            let len = p.parameters.get("points").copied().unwrap_or(0.0) as usize;
            Ok(Arc::new(Ramp {
                axes: p.axes.clone(),
                len,
            }))
        }
    }

    fn ramp_params(points: f64) -> TrajectoryParams {
        TrajectoryParams::External(ExternalParams {
            provider: "ramp".to_string(),
            axes: vec!["t".to_string()],
            units: Vec::new(),
            parameters: BTreeMap::from([("points".to_string(), points)]),
            alternate: false,
        })
    }

    #[test]
    fn test_native_families() {
        let registry = TrajectoryRegistry::native();
        assert_eq!(
            registry.families(),
            vec!["array", "line", "lissajous", "spiral", "static"]
        );
        assert!(!registry.has_family("ramp"));
    }

    #[test]
    fn test_unknown_family_is_validation_error() {
        let err = TrajectoryRegistry::native().create(&ramp_params(3.0)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_registered_provider() {
        let registry = TrajectoryRegistry::native().with_provider(Arc::new(RampProvider));
        let ramp = registry.create(&ramp_params(3.0)).unwrap();
        assert_eq!(ramp.len(), 3);
        assert_eq!(ramp.value(2, 0), 20.0);
    }

    #[test]
    fn test_empty_trajectory_rejected() {
        let registry = TrajectoryRegistry::native().with_provider(Arc::new(RampProvider));
        assert!(registry.create(&ramp_params(0.0)).unwrap_err().is_generation());
    }
}
