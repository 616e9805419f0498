//! Pre-flight model checks.
//!
//! Validation inspects declared parameters only and never enumerates points.
//! It catches the misconfigurations a caller has to fix before any
//! generator can exist: duplicate axis names, regions naming axes no
//! component moves, alternating components inside a lock-step group,
//! consecutive components over different axes and bounds that cannot hold
//! the requested number of points. Failures that only show up once steps
//! and bounds are combined (a step pointing away from its stop value, a
//! region excluding everything) are left to generator construction.

use crate::mask::{check_region_axes, resolve_region_axes};
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::{
    AxialStepModel, AxisModel, BoundingBox, CompoundModel, ConcurrentModel, ConsecutiveModel,
    ScanModel,
};
use std::fmt;

/// Checks a model before generators are built from it.
pub trait ModelValidator: fmt::Debug + Send + Sync {
    /// Fail with a validation error describing the first problem found.
    fn validate(&self, model: &ScanModel) -> ScanResult<()>;
}

/// Structural and numeric checks for every model kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl ModelValidator for DefaultValidator {
    fn validate(&self, model: &ScanModel) -> ScanResult<()> {
        match model {
            ScanModel::AxialStep(m) => step(m),
            ScanModel::AxialPoints(m) => {
                finite(&m.name, &[m.start, m.stop])?;
                point_count(&m.name, m.points, m.stop - m.start)
            }
            ScanModel::AxialArray(m) => {
                if m.positions.is_empty() {
                    return Err(ScanError::validation(format!(
                        "array model '{}' has no positions",
                        m.name
                    )));
                }
                finite(&m.name, &m.positions)
            }
            ScanModel::AxialMultiStep(m) => {
                if m.step_models.is_empty() {
                    return Err(ScanError::validation(format!(
                        "multi-step model '{}' has no ranges",
                        m.name
                    )));
                }
                for range in &m.step_models {
                    if range.name != m.name {
                        return Err(ScanError::validation(format!(
                            "multi-step model '{}' contains a range over '{}'",
                            m.name, range.name
                        )));
                    }
                    step(range)?;
                }
                Ok(())
            }
            ScanModel::TwoAxisGridPoints(m) => {
                distinct(model)?;
                bounding_box(&m.name, &m.bounding_box)?;
                point_count(&m.x_axis_name, m.x_axis_points, m.bounding_box.x_axis_length)?;
                point_count(&m.y_axis_name, m.y_axis_points, m.bounding_box.y_axis_length)
            }
            ScanModel::TwoAxisGridStep(m) => {
                distinct(model)?;
                bounding_box(&m.name, &m.bounding_box)?;
                non_zero_step(&m.x_axis_name, m.x_axis_step)?;
                non_zero_step(&m.y_axis_name, m.y_axis_step)
            }
            ScanModel::TwoAxisLinePoints(m) => {
                distinct(model)?;
                let line = m.bounding_line;
                finite(&m.name, &[line.x_start, line.y_start, line.length, line.angle])?;
                point_count(&m.name, m.points, line.length)
            }
            ScanModel::TwoAxisLineStep(m) => {
                distinct(model)?;
                let line = m.bounding_line;
                finite(&m.name, &[line.x_start, line.y_start, line.length, line.angle])?;
                non_zero_step(&m.name, m.step)
            }
            ScanModel::TwoAxisSpiral(m) => {
                distinct(model)?;
                bounding_box(&m.name, &m.bounding_box)?;
                if !(m.scale.is_finite() && m.scale > 0.0) {
                    return Err(ScanError::validation(format!(
                        "spiral '{}' needs a positive scale, got {}",
                        m.name, m.scale
                    )));
                }
                Ok(())
            }
            ScanModel::TwoAxisLissajous(m) => {
                distinct(model)?;
                bounding_box(&m.name, &m.bounding_box)?;
                if m.lobes == 0 || m.points == 0 {
                    return Err(ScanError::validation(format!(
                        "lissajous '{}' needs at least one lobe and one point",
                        m.name
                    )));
                }
                Ok(())
            }
            ScanModel::TwoAxisPointSingle(m) => {
                distinct(model)?;
                finite(&m.name, &[m.x, m.y])
            }
            ScanModel::Static(m) => {
                if m.size == 0 {
                    return Err(ScanError::validation("static model needs at least one point"));
                }
                Ok(())
            }
            ScanModel::External(m) => {
                if m.provider.is_empty() {
                    return Err(ScanError::validation(format!(
                        "external model '{}' names no provider",
                        m.name
                    )));
                }
                if m.axes.is_empty() {
                    return Err(ScanError::validation(format!(
                        "external model '{}' moves no axes",
                        m.name
                    )));
                }
                distinct(model)
            }
            ScanModel::Concurrent(m) => self.concurrent(m),
            ScanModel::Consecutive(m) => self.consecutive(m),
            ScanModel::Compound(m) => self.compound(m),
        }
    }
}

impl DefaultValidator {
    fn concurrent(&self, model: &ConcurrentModel) -> ScanResult<()> {
        if model.models.is_empty() {
            return Err(ScanError::validation("concurrent model has no components"));
        }
        for component in &model.models {
            self.validate(component)?;
            if component.contains_alternating() {
                return Err(ScanError::validation(format!(
                    "concurrent component '{}' alternates, which has no lock-step meaning",
                    component.name()
                )));
            }
        }
        distinct(&ScanModel::Concurrent(model.clone()))
    }

    fn consecutive(&self, model: &ConsecutiveModel) -> ScanResult<()> {
        let Some(first) = model.models.first() else {
            return Err(ScanError::validation("consecutive model has no components"));
        };
        let mut expected = first.axis_names();
        expected.sort();
        for component in &model.models {
            self.validate(component)?;
            let mut axes = component.axis_names();
            axes.sort();
            if axes != expected {
                return Err(ScanError::validation(format!(
                    "consecutive components must move identical axes, got {:?} and {:?}",
                    first.axis_names(),
                    component.axis_names()
                )));
            }
        }
        Ok(())
    }

    fn compound(&self, model: &CompoundModel) -> ScanResult<()> {
        let Some(innermost) = model.models.last() else {
            return Err(ScanError::validation("compound has no components"));
        };
        for component in &model.models {
            self.validate(component)?;
        }
        let axes = model.axis_names();
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                return Err(ScanError::validation(format!(
                    "axis '{axis}' is declared by more than one component"
                )));
            }
        }
        let innermost_axes = innermost.axis_names();
        for region in &model.regions {
            check_region_axes(&resolve_region_axes(region, &innermost_axes)?, &axes)?;
        }
        for mutator in &model.mutators {
            if let Some(unknown) = mutator.axes().iter().find(|a| !axes.contains(a)) {
                return Err(ScanError::validation(format!(
                    "mutator names unknown axis '{unknown}'"
                )));
            }
        }
        if let Some(duration) = model.duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ScanError::validation(format!(
                    "duration must be a finite, non-negative time, got {duration}"
                )));
            }
        }
        Ok(())
    }
}

fn step(model: &AxialStepModel) -> ScanResult<()> {
    finite(&model.name, &[model.start, model.stop, model.step])?;
    non_zero_step(&model.name, model.step)
}

fn non_zero_step(name: &str, step: f64) -> ScanResult<()> {
    if !step.is_finite() || step == 0.0 {
        return Err(ScanError::validation(format!(
            "step of '{name}' must be finite and non-zero, got {step}"
        )));
    }
    Ok(())
}

fn point_count(name: &str, points: usize, extent: f64) -> ScanResult<()> {
    if points == 0 {
        return Err(ScanError::validation(format!(
            "'{name}' needs at least one point"
        )));
    }
    if points > 1 && extent == 0.0 {
        return Err(ScanError::validation(format!(
            "'{name}' has zero extent but asks for {points} points"
        )));
    }
    Ok(())
}

fn bounding_box(name: &str, bbox: &BoundingBox) -> ScanResult<()> {
    finite(
        name,
        &[
            bbox.x_axis_start,
            bbox.y_axis_start,
            bbox.x_axis_length,
            bbox.y_axis_length,
        ],
    )
}

fn finite(name: &str, values: &[f64]) -> ScanResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ScanError::validation(format!(
            "'{name}' has non-finite parameters"
        )))
    }
}

fn distinct(model: &ScanModel) -> ScanResult<()> {
    let axes = model.axis_names();
    for (i, axis) in axes.iter().enumerate() {
        if axis.is_empty() {
            return Err(ScanError::validation(format!(
                "{} model '{}' has an unnamed axis",
                model.kind(),
                model.name()
            )));
        }
        if axes[..i].contains(axis) {
            return Err(ScanError::validation(format!(
                "{} model '{}' names axis '{axis}' twice",
                model.kind(),
                model.name()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::model::{
        AxialPointsModel, RandomOffsetMutator, StaticModel, TwoAxisGridPointsModel,
    };
    use scan_core::region::{RegionShape, ScanRegion};
    use std::collections::BTreeMap;

    fn check(model: impl Into<ScanModel>) -> ScanResult<()> {
        DefaultValidator.validate(&model.into())
    }

    fn grid(x: &str, y: &str) -> TwoAxisGridPointsModel {
        TwoAxisGridPointsModel::new(x, y, BoundingBox::new(0.0, 0.0, 1.0, 1.0), 3, 3)
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(check(AxialStepModel::new("x", 0.0, 1.0, 0.0)).unwrap_err().is_validation());
    }

    #[test]
    fn test_zero_extent_with_many_points() {
        assert!(check(AxialPointsModel::new("x", 1.0, 1.0, 5)).unwrap_err().is_validation());
        assert!(check(AxialPointsModel::new("x", 1.0, 1.0, 1)).is_ok());
    }

    #[test]
    fn test_grid_with_same_axis_twice() {
        assert!(check(grid("x", "x")).unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_axes_across_components() {
        let model = CompoundModel::default()
            .with_model(AxialStepModel::new("x", 0.0, 1.0, 0.5))
            .with_model(grid("x", "y"));
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_region_on_unknown_axis() {
        let model = CompoundModel::default()
            .with_model(grid("x", "y"))
            .with_region(ScanRegion::new(RegionShape::circle([0.0, 0.0], 1.0), ["x", "z"]));
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_region_without_axes_needs_two_axis_innermost() {
        let circle = ScanRegion::unbound(RegionShape::circle([0.0, 0.0], 1.0));
        let ok = CompoundModel::default()
            .with_model(grid("x", "y"))
            .with_region(circle.clone());
        assert!(check(ok).is_ok());

        let bad = CompoundModel::default()
            .with_model(AxialStepModel::new("t", 0.0, 1.0, 0.5))
            .with_region(circle);
        assert!(check(bad).unwrap_err().is_validation());
    }

    #[test]
    fn test_region_dimension_mismatch() {
        let model = CompoundModel::default()
            .with_model(grid("x", "y"))
            .with_region(ScanRegion::new(RegionShape::circle([0.0, 0.0], 1.0), ["x"]));
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_mutator_on_unknown_axis() {
        let mutator = RandomOffsetMutator::new(1, BTreeMap::from([("z".to_string(), 0.1)]));
        let model = CompoundModel::default()
            .with_model(grid("x", "y"))
            .with_mutator(mutator);
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_alternating_inside_concurrent() {
        let model = ConcurrentModel::new(vec![
            AxialStepModel::new("x", 0.0, 1.0, 0.5).with_alternating(true).into(),
            AxialStepModel::new("y", 0.0, 1.0, 0.5).into(),
        ]);
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_consecutive_axis_sets() {
        let model = ConsecutiveModel::new(vec![
            AxialStepModel::new("x", 0.0, 1.0, 0.5).into(),
            AxialStepModel::new("y", 0.0, 1.0, 0.5).into(),
        ]);
        assert!(check(model).unwrap_err().is_validation());
    }

    #[test]
    fn test_static_size() {
        assert!(check(StaticModel::new(0)).unwrap_err().is_validation());
        assert!(check(StaticModel::new(3)).is_ok());
    }

    #[test]
    fn test_negative_duration() {
        let model = CompoundModel::default()
            .with_model(grid("x", "y"))
            .with_duration(-0.1);
        assert!(check(model).unwrap_err().is_validation());
    }
}
