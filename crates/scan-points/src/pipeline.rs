//! Post-composition stages.
//!
//! Once the odometer has written a raw point, the [`Pipeline`] runs its
//! stages over it in order: every mutator in declaration order, then the
//! exposure stage. The chain is assembled once when the generator is built
//! and shared by all of its iterators.

use crate::mutator::RandomOffsetStage;
use scan_core::error::{ScanError, ScanResult};
use scan_core::model::MutatorModel;
use scan_core::position::Position;
use std::fmt;
use std::sync::Arc;

/// One named transformation of a position.
///
/// Stages are pure functions of the position they receive, so any point can
/// be produced out of order with the same result.
pub trait PointStage: fmt::Debug + Send + Sync {
    /// Stage name (for logging)
    fn name(&self) -> &str;

    /// Transform `position` in place.
    fn apply(&self, position: &mut Position);
}

/// Sets the exposure time of every point.
#[derive(Debug, Clone)]
pub struct ExposureStage {
    exposure_time: f64,
}

impl ExposureStage {
    /// Stage setting `exposure_time` seconds.
    pub fn new(exposure_time: f64) -> Self {
        Self { exposure_time }
    }
}

impl PointStage for ExposureStage {
    fn name(&self) -> &str {
        "exposure"
    }

    fn apply(&self, position: &mut Position) {
        position.set_exposure_time(Some(self.exposure_time));
    }
}

/// Ordered chain of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn PointStage>>,
}

impl Pipeline {
    /// Chain for `mutators` then `duration`, over a scan writing `axes`.
    ///
    /// Fails when a mutator names an axis the scan does not move or when
    /// the duration is negative or not finite.
    pub fn build(
        mutators: &[MutatorModel],
        duration: Option<f64>,
        axes: &[String],
    ) -> ScanResult<Self> {
        let mut pipeline = Self::default();
        for mutator in mutators {
            match mutator {
                MutatorModel::RandomOffset(m) => {
                    pipeline.push(Arc::new(RandomOffsetStage::new(m, axes)?));
                }
            }
        }
        if let Some(duration) = duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ScanError::validation(format!(
                    "duration must be a finite, non-negative time, got {duration}"
                )));
            }
            pipeline.push(Arc::new(ExposureStage::new(duration)));
        }
        Ok(pipeline)
    }

    /// Append a stage.
    pub fn push(&mut self, stage: Arc<dyn PointStage>) {
        self.stages.push(stage);
    }

    /// Stage names in order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// True when no stage is present.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over `position`.
    pub fn apply(&self, position: &mut Position) {
        for stage in &self.stages {
            stage.apply(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::model::RandomOffsetMutator;
    use std::collections::BTreeMap;

    fn axes() -> Vec<String> {
        vec!["x".to_string(), "y".to_string()]
    }

    #[test]
    fn test_stage_order() {
        let mutator = RandomOffsetMutator::new(7, BTreeMap::from([("x".to_string(), 0.1)]));
        let pipeline = Pipeline::build(&[mutator.into()], Some(0.5), &axes()).unwrap();
        assert_eq!(pipeline.stage_names(), vec!["random_offset", "exposure"]);
    }

    #[test]
    fn test_exposure_applied() {
        let pipeline = Pipeline::build(&[], Some(0.25), &axes()).unwrap();
        let mut position = Position::from_pairs([("x", 1.0)], 0);
        pipeline.apply(&mut position);
        assert_eq!(position.exposure_time(), Some(0.25));
    }

    #[test]
    fn test_empty_pipeline_leaves_position() {
        let pipeline = Pipeline::build(&[], None, &axes()).unwrap();
        assert!(pipeline.is_empty());
        let mut position = Position::from_pairs([("x", 1.0)], 0);
        pipeline.apply(&mut position);
        assert_eq!(position.exposure_time(), None);
        assert_eq!(position.get("x"), Some(1.0));
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(Pipeline::build(&[], Some(-1.0), &axes())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_mutator_on_unknown_axis_rejected() {
        let mutator = RandomOffsetMutator::new(7, BTreeMap::from([("z".to_string(), 0.1)]));
        assert!(Pipeline::build(&[mutator.into()], None, &axes())
            .unwrap_err()
            .is_validation());
    }
}
