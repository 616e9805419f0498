//! Model to point-space construction.
//!
//! [`SpaceBuilder`] matches exhaustively on [`ScanModel`] and produces the
//! [`PointSpace`] of each kind: atomic models become trajectory dimensions
//! through the registry, concurrent and consecutive groups wrap the spaces of
//! their components, and compounds go through [`combine`], which also serves
//! masked generators and compounds of already-built generators.

use crate::config::GeneratorSettings;
use crate::dimension::{Dimension, Layout, Odometer};
use crate::mask::{apply_regions, resolve_region_axes};
use crate::mutator::dedup_mutators;
use crate::space::{AxisEdge, PointSpace, SpaceParts};
use crate::trajectory::{
    ArrayParams, ExternalParams, LineParams, LissajousParams, SpiralParams, StaticParams,
    TrajectoryParams, TrajectoryRegistry,
};
use scan_core::error::{ScanError, ScanResult};
use scan_core::limits::JOIN_TOLERANCE;
use scan_core::model::{
    AxialArrayModel, AxialMultiStepModel, AxialPointsModel, AxisModel, CompoundModel,
    ConcurrentModel, ConsecutiveModel, ExternalModel, MutatorModel, Orientation, ScanModel,
    StaticModel, TwoAxisGridPointsModel, TwoAxisLinePointsModel, TwoAxisLissajousModel,
    TwoAxisPointSingleModel, TwoAxisSpiralModel,
};
use scan_core::region::ScanRegion;
use std::sync::Arc;
use tracing::debug;

/// Dimensions and edges of one atomic model.
struct Atomic {
    dims: Vec<Dimension>,
    edges: Vec<AxisEdge>,
}

/// Builds point spaces from models.
#[derive(Debug, Clone, Copy)]
pub struct SpaceBuilder<'a> {
    trajectories: &'a TrajectoryRegistry,
    settings: &'a GeneratorSettings,
}

impl<'a> SpaceBuilder<'a> {
    /// Builder reading trajectories from `trajectories`.
    pub fn new(trajectories: &'a TrajectoryRegistry, settings: &'a GeneratorSettings) -> Self {
        Self {
            trajectories,
            settings,
        }
    }

    /// Space of any model.
    pub fn space(&self, model: &ScanModel) -> ScanResult<PointSpace> {
        match model {
            ScanModel::Concurrent(m) => self.concurrent(m),
            ScanModel::Consecutive(m) => self.consecutive(m),
            ScanModel::Compound(m) => self.compound(m),
            _ => self.atomic(model),
        }
    }

    /// Space of an atomic model.
    pub fn atomic(&self, model: &ScanModel) -> ScanResult<PointSpace> {
        let Atomic { dims, edges } = match model {
            ScanModel::AxialStep(m) => {
                let points = m.enforce_shape()?;
                let mut atomic = self.axial_points(&points)?;
                for edge in &mut atomic.edges {
                    edge.leading = m.step / 2.0;
                    edge.trailing = m.step / 2.0;
                }
                atomic
            }
            ScanModel::AxialPoints(m) => self.axial_points(m)?,
            ScanModel::AxialArray(m) => self.axial_array(m)?,
            ScanModel::AxialMultiStep(m) => self.multi_step(m)?,
            ScanModel::TwoAxisGridPoints(m) => self.grid(m)?,
            ScanModel::TwoAxisGridStep(m) => self.grid(&m.enforce_shape()?)?,
            ScanModel::TwoAxisLinePoints(m) => self.line(m)?,
            ScanModel::TwoAxisLineStep(m) => self.line(&m.enforce_shape()?)?,
            ScanModel::TwoAxisSpiral(m) => self.spiral(m)?,
            ScanModel::TwoAxisLissajous(m) => self.lissajous(m)?,
            ScanModel::TwoAxisPointSingle(m) => self.point_single(m)?,
            ScanModel::Static(m) => self.fixed(m)?,
            ScanModel::External(m) => self.external(m)?,
            ScanModel::Concurrent(_) | ScanModel::Consecutive(_) | ScanModel::Compound(_) => {
                return Err(ScanError::validation(format!(
                    "{} model is not an axis model",
                    model.kind()
                )));
            }
        };
        PointSpace::new(SpaceParts {
            dims,
            axes: model.axis_names(),
            mutators: Vec::new(),
            duration: None,
            continuous: model.is_continuous(),
            edges,
            max_materialized: self.settings.max_materialized_points,
        })
    }

    fn trajectory(&self, params: TrajectoryParams) -> ScanResult<Dimension> {
        let trajectory = self.trajectories.create(&params)?;
        Ok(Dimension::trajectory(trajectory, params))
    }

    fn axial_points(&self, m: &AxialPointsModel) -> ScanResult<Atomic> {
        let span = m.span();
        let params = LineParams::single(&m.name, &m.units, span.first, span.last, span.points)
            .with_alternate(m.alternating);
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Line(params))?],
            edges: vec![AxisEdge::symmetric(&m.name, span.half_step)],
        })
    }

    fn axial_array(&self, m: &AxialArrayModel) -> ScanResult<Atomic> {
        let params = ArrayParams {
            axes: vec![m.name.clone()],
            units: vec![m.units.clone()],
            points: m.positions.clone(),
            alternate: m.alternating,
        };
        let edges = array_edge(&m.name, &m.positions).into_iter().collect();
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Array(params))?],
            edges,
        })
    }

    fn multi_step(&self, m: &AxialMultiStepModel) -> ScanResult<Atomic> {
        let ranges = m.enforce_shape()?;
        if m.continuous {
            let mut directions = m
                .step_models
                .iter()
                .filter(|r| r.stop != r.start)
                .map(|r| r.step.is_sign_positive());
            if let Some(first) = directions.next() {
                if directions.any(|d| d != first) {
                    return Err(ScanError::generation(format!(
                        "continuous multi-step '{}' changes direction between ranges",
                        m.name
                    )));
                }
            }
        }
        let mut parts = Vec::with_capacity(ranges.len());
        for (range, step_model) in ranges.iter().zip(&m.step_models) {
            let mut atomic = self.axial_points(range)?;
            for edge in &mut atomic.edges {
                edge.leading = step_model.step / 2.0;
                edge.trailing = step_model.step / 2.0;
            }
            parts.push(PointSpace::new(SpaceParts {
                dims: atomic.dims,
                axes: vec![m.name.clone()],
                mutators: Vec::new(),
                duration: None,
                continuous: m.continuous,
                edges: atomic.edges,
                max_materialized: self.settings.max_materialized_points,
            })?);
        }
        let (dim, edges) = join_consecutive(&parts, m.alternating, m.continuous)?;
        Ok(Atomic {
            dims: vec![dim],
            edges,
        })
    }

    fn grid(&self, m: &TwoAxisGridPointsModel) -> ScanResult<Atomic> {
        let x = m.x_span();
        let y = m.y_span();
        let x_line = |alternate| {
            LineParams::single(&m.x_axis_name, &m.x_axis_units, x.first, x.last, x.points)
                .with_alternate(alternate)
        };
        let y_line = |alternate| {
            LineParams::single(&m.y_axis_name, &m.y_axis_units, y.first, y.last, y.points)
                .with_alternate(alternate)
        };
        let slow_alternates = m.alternating && m.alternate_both_axes;
        let (outer, inner, fast_name, fast) = match m.orientation {
            Orientation::Horizontal => (
                y_line(slow_alternates),
                x_line(m.alternating),
                &m.x_axis_name,
                x,
            ),
            Orientation::Vertical => (
                x_line(slow_alternates),
                y_line(m.alternating),
                &m.y_axis_name,
                y,
            ),
        };
        Ok(Atomic {
            dims: vec![
                self.trajectory(TrajectoryParams::Line(outer))?,
                self.trajectory(TrajectoryParams::Line(inner))?,
            ],
            edges: vec![AxisEdge::symmetric(fast_name, fast.half_step)],
        })
    }

    fn line(&self, m: &TwoAxisLinePointsModel) -> ScanResult<Atomic> {
        let span = m.span();
        let line = m.bounding_line;
        let start = line.at(span.first);
        let stop = line.at(span.last);
        let params = LineParams {
            axes: vec![m.x_axis_name.clone(), m.y_axis_name.clone()],
            units: vec![m.x_axis_units.clone(), m.y_axis_units.clone()],
            start: start.to_vec(),
            stop: stop.to_vec(),
            size: span.points,
            alternate: m.alternating,
        };
        let (sin, cos) = line.angle.sin_cos();
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Line(params))?],
            edges: vec![
                AxisEdge::symmetric(&m.x_axis_name, span.half_step * cos),
                AxisEdge::symmetric(&m.y_axis_name, span.half_step * sin),
            ],
        })
    }

    fn spiral(&self, m: &TwoAxisSpiralModel) -> ScanResult<Atomic> {
        let params = SpiralParams {
            axes: vec![m.x_axis_name.clone(), m.y_axis_name.clone()],
            units: vec![m.x_axis_units.clone(), m.y_axis_units.clone()],
            centre: m.bounding_box.centre(),
            radius: m.radius(),
            scale: m.scale,
            alternate: m.alternating,
        };
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Spiral(params))?],
            edges: Vec::new(),
        })
    }

    fn lissajous(&self, m: &TwoAxisLissajousModel) -> ScanResult<Atomic> {
        let bbox = m.bounding_box;
        let params = LissajousParams {
            axes: vec![m.x_axis_name.clone(), m.y_axis_name.clone()],
            units: vec![m.x_axis_units.clone(), m.y_axis_units.clone()],
            centre: bbox.centre(),
            span: [bbox.x_axis_length, bbox.y_axis_length],
            lobes: m.lobes,
            size: m.points,
            alternate: m.alternating,
        };
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Lissajous(params))?],
            edges: Vec::new(),
        })
    }

    fn point_single(&self, m: &TwoAxisPointSingleModel) -> ScanResult<Atomic> {
        let params = LineParams {
            axes: vec![m.x_axis_name.clone(), m.y_axis_name.clone()],
            units: vec![m.x_axis_units.clone(), m.y_axis_units.clone()],
            start: vec![m.x, m.y],
            stop: vec![m.x, m.y],
            size: 1,
            alternate: false,
        };
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::Line(params))?],
            edges: Vec::new(),
        })
    }

    fn fixed(&self, m: &StaticModel) -> ScanResult<Atomic> {
        if m.size == 0 {
            return Err(ScanError::validation("static model needs at least one point"));
        }
        let dims = if m.size == 1 {
            Vec::new()
        } else {
            let params = StaticParams {
                axes: Vec::new(),
                size: m.size,
            };
            vec![self.trajectory(TrajectoryParams::Static(params))?]
        };
        Ok(Atomic {
            dims,
            edges: Vec::new(),
        })
    }

    fn external(&self, m: &ExternalModel) -> ScanResult<Atomic> {
        let params = ExternalParams {
            provider: m.provider.clone(),
            axes: m.axes.clone(),
            units: m.units.clone(),
            parameters: m.parameters.clone(),
            alternate: m.alternating,
        };
        Ok(Atomic {
            dims: vec![self.trajectory(TrajectoryParams::External(params))?],
            edges: Vec::new(),
        })
    }

    /// Space of a lock-step group.
    pub fn concurrent(&self, model: &ConcurrentModel) -> ScanResult<PointSpace> {
        if model.models.is_empty() {
            return Err(ScanError::validation("concurrent model has no components"));
        }
        if let Some(alternating) = model.models.iter().find(|m| m.contains_alternating()) {
            return Err(ScanError::validation(format!(
                "concurrent component '{}' alternates, which has no lock-step meaning",
                alternating.name()
            )));
        }
        let spaces = model
            .models
            .iter()
            .map(|m| self.space(m))
            .collect::<ScanResult<Vec<_>>>()?;
        let axes: Vec<String> = spaces.iter().flat_map(|s| s.axes().to_vec()).collect();
        Layout::new(&axes)?;

        let parts = spaces
            .iter()
            .map(|s| Odometer::new(s.dims().to_vec()))
            .collect::<ScanResult<Vec<_>>>()?;
        let dim = Dimension::concurrent(parts)?;
        let edges = spaces.iter().flat_map(|s| s.edges().to_vec()).collect();
        let mutators = dedup_mutators(spaces.iter().flat_map(|s| s.mutators().to_vec()));
        PointSpace::new(SpaceParts {
            dims: vec![dim],
            axes,
            mutators,
            duration: spaces.iter().find_map(|s| s.duration()),
            continuous: model.is_continuous(),
            edges,
            max_materialized: self.settings.max_materialized_points,
        })
    }

    /// Space of a sequential group.
    pub fn consecutive(&self, model: &ConsecutiveModel) -> ScanResult<PointSpace> {
        if model.models.is_empty() {
            return Err(ScanError::validation("consecutive model has no components"));
        }
        let spaces = model
            .models
            .iter()
            .map(|m| self.space(m))
            .collect::<ScanResult<Vec<_>>>()?;
        let (dim, edges) = join_consecutive(&spaces, false, model.continuous)?;
        let mutators = dedup_mutators(spaces.iter().flat_map(|s| s.mutators().to_vec()));
        PointSpace::new(SpaceParts {
            dims: vec![dim],
            axes: spaces[0].axes().to_vec(),
            mutators,
            duration: spaces.iter().find_map(|s| s.duration()),
            continuous: model.continuous,
            edges,
            max_materialized: self.settings.max_materialized_points,
        })
    }

    /// Space of a compound model. Nested compounds are built first and then
    /// joined like any other component.
    pub fn compound(&self, model: &CompoundModel) -> ScanResult<PointSpace> {
        let components = model
            .models
            .iter()
            .map(|m| self.space(m).map(Arc::new))
            .collect::<ScanResult<Vec<_>>>()?;
        combine(
            &components,
            &model.regions,
            &model.mutators,
            model.duration,
            self.settings,
        )
    }
}

/// Join `components` (outermost first) into one nested space.
///
/// Regions without axes apply to the innermost component when it moves
/// exactly two axes. Mutators of the components are lifted ahead of
/// `mutators` and deduplicated, so random offsets are keyed by the joined
/// step index.
pub fn combine(
    components: &[Arc<PointSpace>],
    regions: &[ScanRegion],
    mutators: &[MutatorModel],
    duration: Option<f64>,
    settings: &GeneratorSettings,
) -> ScanResult<PointSpace> {
    let innermost = components
        .last()
        .ok_or_else(|| ScanError::validation("compound has no components"))?;
    let axes: Vec<String> = components.iter().flat_map(|c| c.axes().to_vec()).collect();
    Layout::new(&axes)?;

    let regions = regions
        .iter()
        .map(|r| resolve_region_axes(r, innermost.axes()))
        .collect::<ScanResult<Vec<_>>>()?;
    let dims: Vec<Dimension> = components.iter().flat_map(|c| c.dims().to_vec()).collect();
    let dims = apply_regions(dims, &regions, settings.max_mask_evaluations)?;

    let edges = if dims.last().is_some_and(Dimension::is_masked) {
        Vec::new()
    } else {
        components
            .iter()
            .rev()
            .find(|c| c.rank() > 0)
            .map(|c| c.edges().to_vec())
            .unwrap_or_default()
    };

    let lifted = components.iter().flat_map(|c| c.mutators().to_vec());
    let mutators = dedup_mutators(lifted.chain(mutators.iter().cloned()));
    debug!(
        components = components.len(),
        mutators = mutators.len(),
        "Joined compound components"
    );

    PointSpace::new(SpaceParts {
        dims,
        axes,
        mutators,
        duration: duration.or_else(|| components.iter().find_map(|c| c.duration())),
        continuous: innermost.is_continuous(),
        edges,
        max_materialized: settings.max_materialized_points,
    })
}

/// Concatenate `parts` into one sequential dimension.
///
/// Every part must move the same axes. When `continuous`, the final bound
/// of each part must meet the initial bound of the next within half a step
/// on either side.
pub fn join_consecutive(
    parts: &[PointSpace],
    alternate: bool,
    continuous: bool,
) -> ScanResult<(Dimension, Vec<AxisEdge>)> {
    let first = parts
        .first()
        .ok_or_else(|| ScanError::validation("consecutive group has no components"))?;
    let mut expected = first.axes().to_vec();
    expected.sort();
    for part in &parts[1..] {
        let mut axes = part.axes().to_vec();
        axes.sort();
        if axes != expected {
            return Err(ScanError::validation(format!(
                "consecutive components must move identical axes, got {:?} and {:?}",
                first.axes(),
                part.axes()
            )));
        }
    }
    if continuous {
        for pair in parts.windows(2) {
            check_join(&pair[0], &pair[1])?;
        }
    }

    let odometers = parts
        .iter()
        .map(|p| Odometer::new(p.dims().to_vec()))
        .collect::<ScanResult<Vec<_>>>()?;
    let dim = Dimension::consecutive(odometers, alternate)?;

    let last = &parts[parts.len() - 1];
    let edges = first
        .edges()
        .iter()
        .map(|edge| AxisEdge {
            axis: edge.axis.clone(),
            leading: edge.leading,
            trailing: find_edge(last, &edge.axis).map_or(edge.trailing, |e| e.trailing),
        })
        .collect();
    Ok((dim, edges))
}

fn find_edge<'s>(space: &'s PointSpace, axis: &str) -> Option<&'s AxisEdge> {
    space.edges().iter().find(|e| e.axis == axis)
}

fn check_join(prev: &PointSpace, next: &PointSpace) -> ScanResult<()> {
    let end = prev.final_bounds()?;
    let start = next.initial_bounds()?;
    for axis in prev.axes() {
        let (Some(out), Some(into)) = (find_edge(prev, axis), find_edge(next, axis)) else {
            continue;
        };
        let (Some(a), Some(b)) = (end.get(axis), start.get(axis)) else {
            continue;
        };
        let slack = out.trailing.abs()
            + into.leading.abs()
            + JOIN_TOLERANCE * a.abs().max(b.abs()).max(1.0);
        if (b - a).abs() > slack {
            return Err(ScanError::generation(format!(
                "continuous sequence on '{axis}' jumps from {a} to {b}"
            )));
        }
    }
    Ok(())
}

/// Half steps at both ends of an explicit position list.
pub fn array_edge(axis: &str, positions: &[f64]) -> Option<AxisEdge> {
    let [first, second, ..] = positions else {
        return None;
    };
    let [before_last, last] = &positions[positions.len() - 2..] else {
        return None;
    };
    Some(AxisEdge {
        axis: axis.to_string(),
        leading: (second - first) / 2.0,
        trailing: (last - before_last) / 2.0,
    })
}

/// Edges recoverable from trajectory parameters alone.
pub fn edges_from_params(params: &TrajectoryParams) -> Vec<AxisEdge> {
    match params {
        TrajectoryParams::Line(p) if p.size > 1 => p
            .axes
            .iter()
            .zip(p.start.iter().zip(&p.stop))
            .map(|(axis, (start, stop))| {
                AxisEdge::symmetric(axis, (stop - start) / (p.size - 1) as f64 / 2.0)
            })
            .collect(),
        TrajectoryParams::Array(p) => p
            .axes
            .first()
            .and_then(|axis| array_edge(axis, &p.points))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}
