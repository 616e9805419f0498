//! `scan-points`
//!
//! Lazy point generation for scans.
//!
//! A declarative [`ScanModel`](scan_core::ScanModel) goes in, a
//! [`PointGenerator`] comes out. Generators know their size, rank and shape
//! up front and compute every [`Position`](scan_core::Position) on demand
//! from its flat index.
//!
//! ## Layers
//!
//! - [`trajectory`]: raw per-axis coordinate sequences, found by family name
//! - [`dimension`]: trajectories, masks and concurrent or consecutive groups
//!   laid out as odometer digits
//! - [`mask`]: region filtering of dimension groups
//! - [`pipeline`] and [`mutator`]: per-point stages run after raw values
//! - [`space`]: the immutable iteration space behind every generator
//! - [`generator`]: the generator kinds and their iterator
//! - [`service`]: validation and generator construction
//! - [`dict`]: export to and rebuild from nested dictionaries
//!
//! Ambient concerns live in [`config`] (Figment) and [`telemetry`]
//! (tracing-subscriber).
//!
//! ## Example
//!
//! ```rust,no_run
//! use scan_core::model::{AxialStepModel, CompoundModel};
//! use scan_points::{PointGenerator, PointGeneratorService};
//!
//! # fn main() -> scan_core::ScanResult<()> {
//! let service = PointGeneratorService::default();
//! let model = CompoundModel::default()
//!     .with_model(AxialStepModel::new("Temperature", 290.0, 295.0, 1.0))
//!     .with_model(AxialStepModel::new("Position", 1.0, 4.0, 0.6));
//! let generator = service.create_compound_generator(&model)?;
//! for position in generator.iter() {
//!     println!("{position}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dict;
pub mod dimension;
pub mod generator;
pub mod info;
pub mod mask;
pub mod mutator;
pub mod pipeline;
pub mod service;
pub mod space;
pub mod telemetry;
pub mod trajectory;
pub mod validator;

pub use config::{GeneratorSettings, PointsConfig};
pub use dict::CompoundDict;
pub use generator::{
    AxisGenerator, CompoundGenerator, MultiModelGenerator, PointGenerator, PointIterator,
    RegionMaskedGenerator,
};
pub use info::ScanInformation;
pub use service::PointGeneratorService;
pub use space::PointSpace;
pub use trajectory::{AxisTrajectory, AxisTrajectoryProvider, TrajectoryParams, TrajectoryRegistry};
pub use validator::{DefaultValidator, ModelValidator};
