//! Point generators.
//!
//! Every generator kind implements [`PointGenerator`] on top of a shared
//! [`PointSpace`]. Size, rank and shape are known as soon as the generator
//! exists; points are computed on demand, so a generator over millions of
//! points costs no more to build than one over ten.
//!
//! | kind | built from |
//! |------|------------|
//! | [`AxisGenerator`] | one axis model (line, grid, spiral, ...) |
//! | [`RegionMaskedGenerator`] | an axis model plus regions |
//! | [`MultiModelGenerator`] | a concurrent or consecutive group |
//! | [`CompoundGenerator`] | a compound model, or other generators |
//!
//! # Example
//!
//! ```rust,ignore
//! let service = PointGeneratorService::default();
//! let generator = service.create_generator(&AxialStepModel::new("T", 290.0, 300.0, 1.0).into())?;
//! for position in generator.iter() {
//!     println!("{position}");
//! }
//! ```

mod axis;
pub(crate) mod build;
mod compound;
mod masked;
mod multi;

pub use axis::AxisGenerator;
pub use build::SpaceBuilder;
pub use compound::CompoundGenerator;
pub use masked::RegionMaskedGenerator;
pub use multi::MultiModelGenerator;

use crate::dict::{self, CompoundDict};
use crate::info::ScanInformation;
use crate::space::PointSpace;
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::ScanModel;
use scan_core::position::Position;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Common interface of every generator kind.
///
/// Only [`PointGenerator::space`] and [`PointGenerator::model`] are
/// required; everything else reads the shared space.
pub trait PointGenerator: fmt::Debug + Send + Sync {
    /// Iteration space shared with every iterator.
    fn space(&self) -> &Arc<PointSpace>;

    /// Model the generator was built from, if any.
    fn model(&self) -> Option<ScanModel>;

    /// Number of points.
    fn size(&self) -> usize {
        self.space().size()
    }

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.space().rank()
    }

    /// Extent of every dimension, outermost first.
    fn shape(&self) -> Vec<usize> {
        self.space().shape()
    }

    /// Axis names in position order.
    fn axis_names(&self) -> Vec<String> {
        self.space().axes().to_vec()
    }

    /// Axes varying at each rank level, outermost first.
    fn dimension_names(&self) -> Vec<Vec<String>> {
        self.space().dimension_names().to_vec()
    }

    /// Continuous motion flag of the innermost component.
    fn is_continuous(&self) -> bool {
        self.space().is_continuous()
    }

    /// Fresh iterator from the first point.
    fn iter(&self) -> PointIterator {
        PointIterator::new(Arc::clone(self.space()))
    }

    /// Point at flat index `index`.
    fn position_at(&self, index: usize) -> ScanResult<Position> {
        self.space().position(index)
    }

    /// Every point, in order.
    ///
    /// Refuses generators larger than the configured materialization cap.
    fn create_points(&self) -> ScanResult<Vec<Position>> {
        let size = self.size();
        let cap = self.space().max_materialized();
        if size > cap {
            return Err(ScanError::generation(format!(
                "refusing to materialize {size} points, the limit is {cap}"
            )));
        }
        Ok(self.iter().collect())
    }

    /// First point moved back half a step along the innermost dimension.
    fn initial_bounds(&self) -> ScanResult<Position> {
        self.space().initial_bounds()
    }

    /// Last point moved on half a step in its direction of travel.
    fn final_bounds(&self) -> ScanResult<Position> {
        self.space().final_bounds()
    }

    /// Rank, shape and size without enumerating points.
    fn scan_info(&self) -> ScanInformation {
        ScanInformation::from_space(self.space())
    }

    /// Export as a nested dictionary that rebuilds the same points.
    fn to_dict(&self) -> ScanResult<CompoundDict> {
        dict::export(self.space())
    }
}

/// Independent cursor over a generator's points.
///
/// Iterators share the generator's space and hold nothing but the next
/// index, so any number of them can run at once.
#[derive(Debug, Clone)]
pub struct PointIterator {
    space: Arc<PointSpace>,
    next: usize,
}

impl PointIterator {
    /// Cursor at the first point of `space`.
    pub fn new(space: Arc<PointSpace>) -> Self {
        Self { space, next: 0 }
    }

    /// Next point, failing once the iterator is exhausted.
    pub fn next_position(&mut self) -> ScanResult<Position> {
        let position = self.space.position(self.next)?;
        self.next += 1;
        Ok(position)
    }

    /// Index of the next point.
    pub fn index(&self) -> usize {
        self.next
    }

    fn remaining(&self) -> usize {
        self.space.size().saturating_sub(self.next)
    }
}

impl Iterator for PointIterator {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.remaining() == 0 {
            return None;
        }
        self.next_position().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Position> {
        self.next = self.next.saturating_add(n).min(self.space.size());
        self.next()
    }
}

impl ExactSizeIterator for PointIterator {}

impl FusedIterator for PointIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::PointGeneratorService;
    use scan_core::model::AxialStepModel;

    fn temperature() -> Box<dyn PointGenerator> {
        PointGeneratorService::default()
            .create_generator(&AxialStepModel::new("T", 290.0, 300.0, 1.0).into())
            .unwrap()
    }

    #[test]
    fn test_size_matches_iteration() {
        let generator = temperature();
        assert_eq!(generator.size(), 11);
        assert_eq!(generator.iter().len(), 11);
        assert_eq!(generator.iter().count(), 11);
        assert_eq!(generator.create_points().unwrap().len(), 11);
    }

    #[test]
    fn test_iterators_are_independent() {
        let generator = temperature();
        let mut a = generator.iter();
        a.next();
        a.next();
        let b: Vec<f64> = generator.iter().map(|p| p.get("T").unwrap()).collect();
        assert_eq!(b[0], 290.0);
        assert_eq!(a.next().unwrap().get("T"), Some(292.0));
    }

    #[test]
    fn test_next_position_past_end_fails() {
        let generator = temperature();
        let mut iter = generator.iter();
        assert_eq!(iter.nth(10).unwrap().get("T"), Some(300.0));
        assert!(iter.next().is_none());
        assert!(matches!(
            iter.next_position(),
            Err(ScanError::IndexOutOfRange { index: 11, size: 11 })
        ));
    }

    #[test]
    fn test_position_at_matches_iteration() {
        let generator = temperature();
        for (i, position) in generator.iter().enumerate() {
            assert_eq!(generator.position_at(i).unwrap(), position);
        }
    }
}
