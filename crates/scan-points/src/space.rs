//! The immutable iteration space behind every generator.
//!
//! A [`PointSpace`] is built once per generator and shared through `Arc` by
//! every iterator over it. It owns the bound odometer, the axis order of the
//! output, the per-level dimension names, the mutator pipeline and the
//! half-step edges used to report bounds.

use crate::dimension::{Dimension, Layout, Odometer};
use crate::pipeline::Pipeline;
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::MutatorModel;
use scan_core::position::Position;
use std::sync::Arc;

/// Half-step extents of one axis of the innermost dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisEdge {
    /// Axis name.
    pub axis: String,
    /// Distance from the first point back to the initial bound.
    pub leading: f64,
    /// Distance from the last point on to the final bound.
    pub trailing: f64,
}

impl AxisEdge {
    /// Edge with the same half step on both ends.
    pub fn symmetric(axis: impl Into<String>, half_step: f64) -> Self {
        Self {
            axis: axis.into(),
            leading: half_step,
            trailing: half_step,
        }
    }
}

/// Parts shared by every generator kind.
#[derive(Debug)]
pub struct PointSpace {
    axes: Arc<[String]>,
    odometer: Odometer,
    dimension_names: Arc<[Vec<String>]>,
    mutators: Vec<MutatorModel>,
    pipeline: Pipeline,
    duration: Option<f64>,
    continuous: bool,
    edges: Vec<AxisEdge>,
    max_materialized: usize,
}

/// Everything [`PointSpace::new`] needs.
#[derive(Debug)]
pub struct SpaceParts {
    /// Dimensions, outermost first, not yet bound.
    pub dims: Vec<Dimension>,
    /// Output axis order.
    pub axes: Vec<String>,
    /// Mutators applied after composition, already deduplicated.
    pub mutators: Vec<MutatorModel>,
    /// Exposure applied to every point.
    pub duration: Option<f64>,
    /// Continuous motion flag.
    pub continuous: bool,
    /// Half-step edges of the innermost dimension.
    pub edges: Vec<AxisEdge>,
    /// Cap for `create_points`.
    pub max_materialized: usize,
}

impl PointSpace {
    /// Bind the dimensions to the axis order and build the pipeline.
    pub fn new(parts: SpaceParts) -> ScanResult<Self> {
        let layout = Layout::new(&parts.axes)?;
        let mut odometer = Odometer::new(parts.dims)?;
        odometer.bind(&layout)?;
        let mut written = odometer.axes();
        let mut declared = parts.axes.clone();
        written.sort();
        declared.sort();
        if written != declared {
            return Err(ScanError::validation(format!(
                "dimensions write {written:?} but the scan declares {:?}",
                parts.axes
            )));
        }
        let dimension_names: Vec<Vec<String>> = odometer
            .dims()
            .iter()
            .map(|d| d.axes().to_vec())
            .collect();
        let pipeline = Pipeline::build(&parts.mutators, parts.duration, &parts.axes)?;
        Ok(Self {
            axes: Arc::from(parts.axes),
            odometer,
            dimension_names: Arc::from(dimension_names),
            mutators: parts.mutators,
            pipeline,
            duration: parts.duration,
            continuous: parts.continuous,
            edges: parts.edges,
            max_materialized: parts.max_materialized,
        })
    }

    /// Output axis order.
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Bound odometer.
    pub fn odometer(&self) -> &Odometer {
        &self.odometer
    }

    /// Dimensions, outermost first.
    pub fn dims(&self) -> &[Dimension] {
        self.odometer.dims()
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.odometer.len()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.odometer.rank()
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> Vec<usize> {
        self.odometer.shape()
    }

    /// Axes varying at each rank level.
    pub fn dimension_names(&self) -> &[Vec<String>] {
        &self.dimension_names
    }

    /// Mutators applied after composition.
    pub fn mutators(&self) -> &[MutatorModel] {
        &self.mutators
    }

    /// Exposure applied to every point.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Continuous motion flag.
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Half-step edges of the innermost dimension.
    pub fn edges(&self) -> &[AxisEdge] {
        &self.edges
    }

    /// Cap for `create_points`.
    pub fn max_materialized(&self) -> usize {
        self.max_materialized
    }

    /// Point `index` before mutators run.
    pub fn raw_position(&self, index: usize) -> ScanResult<Position> {
        let size = self.size();
        if index >= size {
            return Err(ScanError::IndexOutOfRange { index, size });
        }
        let mut values = vec![0.0; self.axes.len()];
        let mut indices = vec![0; self.axes.len()];
        self.odometer.write(index, &mut values, &mut indices);
        Ok(Position::new(
            Arc::clone(&self.axes),
            values,
            indices,
            index,
            Arc::clone(&self.dimension_names),
        ))
    }

    /// Point `index` with mutators and exposure applied.
    pub fn position(&self, index: usize) -> ScanResult<Position> {
        let mut position = self.raw_position(index)?;
        self.pipeline.apply(&mut position);
        Ok(position)
    }

    /// First point moved back by the leading half steps.
    pub fn initial_bounds(&self) -> ScanResult<Position> {
        let mut position = self.raw_position(0)?;
        for edge in &self.edges {
            if let Some(value) = position.get(&edge.axis) {
                position.set_value(&edge.axis, value - edge.leading);
            }
        }
        Ok(position)
    }

    /// Last point moved on by half a step in its direction of travel.
    pub fn final_bounds(&self) -> ScanResult<Position> {
        let last = self.size().saturating_sub(1);
        let mut position = self.raw_position(last)?;
        let reversed = self.rank() > 0 && self.odometer.is_reversed(self.rank() - 1, last);
        for edge in &self.edges {
            if let Some(value) = position.get(&edge.axis) {
                let moved = if reversed {
                    value - edge.leading
                } else {
                    value + edge.trailing
                };
                position.set_value(&edge.axis, moved);
            }
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{LineParams, LineTrajectory, TrajectoryParams};
    use scan_core::limits::DEFAULT_MAX_MATERIALIZED_POINTS;

    fn line(axis: &str, start: f64, stop: f64, size: usize, alternate: bool) -> Dimension {
        let params = LineParams::single(axis, "mm", start, stop, size).with_alternate(alternate);
        let trajectory = Arc::new(LineTrajectory::new(&params).unwrap());
        Dimension::trajectory(trajectory, TrajectoryParams::Line(params))
    }

    fn grid(alternate: bool) -> PointSpace {
        PointSpace::new(SpaceParts {
            dims: vec![
                line("y", 0.0, 1.0, 3, false),
                line("x", -2.0, 2.0, 5, alternate),
            ],
            axes: vec!["x".to_string(), "y".to_string()],
            mutators: Vec::new(),
            duration: None,
            continuous: true,
            edges: vec![AxisEdge::symmetric("x", 0.5)],
            max_materialized: DEFAULT_MAX_MATERIALIZED_POINTS,
        })
        .unwrap()
    }

    #[test]
    fn test_axis_order_follows_declaration() {
        let space = grid(false);
        let point = space.position(1).unwrap();
        assert_eq!(point.names(), &["x".to_string(), "y".to_string()]);
        assert_eq!(point.values(), &[-1.0, 0.0]);
        assert_eq!(
            space.dimension_names(),
            &[vec!["y".to_string()], vec!["x".to_string()]]
        );
    }

    #[test]
    fn test_bounds() {
        let space = grid(false);
        assert_eq!(space.initial_bounds().unwrap().get("x"), Some(-2.5));
        assert_eq!(space.final_bounds().unwrap().get("x"), Some(2.5));
        assert_eq!(space.final_bounds().unwrap().get("y"), Some(1.0));
    }

    #[test]
    fn test_bounds_follow_snake_direction() {
        let space = grid(true);
        // Three rows: the last one runs forwards again
        assert_eq!(space.final_bounds().unwrap().get("x"), Some(2.5));

        let two_rows = PointSpace::new(SpaceParts {
            dims: vec![line("y", 0.0, 1.0, 2, false), line("x", -2.0, 2.0, 5, true)],
            axes: vec!["x".to_string(), "y".to_string()],
            mutators: Vec::new(),
            duration: None,
            continuous: true,
            edges: vec![AxisEdge::symmetric("x", 0.5)],
            max_materialized: DEFAULT_MAX_MATERIALIZED_POINTS,
        })
        .unwrap();
        assert_eq!(two_rows.final_bounds().unwrap().get("x"), Some(-2.5));
    }

    #[test]
    fn test_out_of_range() {
        let space = grid(false);
        assert!(matches!(
            space.position(15),
            Err(ScanError::IndexOutOfRange { index: 15, size: 15 })
        ));
    }

    #[test]
    fn test_undeclared_axis_rejected() {
        let result = PointSpace::new(SpaceParts {
            dims: vec![line("x", 0.0, 1.0, 2, false)],
            axes: vec!["y".to_string()],
            mutators: Vec::new(),
            duration: None,
            continuous: true,
            edges: Vec::new(),
            max_materialized: DEFAULT_MAX_MATERIALIZED_POINTS,
        });
        assert!(result.unwrap_err().is_validation());
    }
}
