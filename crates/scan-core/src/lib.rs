//! Core types for scan point generation.
//!
//! This crate holds the leaf data types shared by every part of the point
//! engine:
//!
//! - [`error`]: the [`ScanError`](error::ScanError) type and result alias
//! - [`position`]: the labeled coordinate record produced for every step
//! - [`region`]: geometric predicates used to mask points
//! - [`model`]: the closed union of declarative scan models
//! - [`limits`]: shared tolerances and defaults
//!
//! The generator engine itself lives in the `scan-points` crate.

pub mod error;
pub mod limits;
pub mod model;
pub mod position;
pub mod region;

pub use error::{ScanError, ScanResult};
pub use model::{AxisModel, CompoundModel, ScanModel};
pub use position::Position;
pub use region::{RegionShape, Roi, ScanRegion};
