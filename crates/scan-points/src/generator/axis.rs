//! Generator over a single axis model.

use super::PointGenerator;
use crate::space::PointSpace;
use scan_core::model::ScanModel;
use std::sync::Arc;

/// Points of one line, grid, spiral, Lissajous, array, multi-step,
/// single-point, static or external model.
#[derive(Debug, Clone)]
pub struct AxisGenerator {
    model: ScanModel,
    space: Arc<PointSpace>,
}

impl AxisGenerator {
    pub(crate) fn new(model: ScanModel, space: PointSpace) -> Self {
        Self {
            model,
            space: Arc::new(space),
        }
    }
}

impl PointGenerator for AxisGenerator {
    fn space(&self) -> &Arc<PointSpace> {
        &self.space
    }

    fn model(&self) -> Option<ScanModel> {
        Some(self.model.clone())
    }
}
