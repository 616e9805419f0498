//! Concurrent and consecutive groups.

use super::PointGenerator;
use crate::space::PointSpace;
use scan_core::model::ScanModel;
use std::sync::Arc;

/// Lock-step or sequential combination of sibling models.
///
/// Both forms have rank 1. Concurrent components advance together and must
/// have equal sizes and disjoint axes; consecutive components run one after
/// another over identical axes, with step indices offset by the sizes of the
/// earlier components.
#[derive(Debug, Clone)]
pub struct MultiModelGenerator {
    model: ScanModel,
    space: Arc<PointSpace>,
}

impl MultiModelGenerator {
    pub(crate) fn new(model: ScanModel, space: PointSpace) -> Self {
        Self {
            model,
            space: Arc::new(space),
        }
    }

    /// True for the lock-step form.
    pub fn is_concurrent(&self) -> bool {
        matches!(self.model, ScanModel::Concurrent(_))
    }
}

impl PointGenerator for MultiModelGenerator {
    fn space(&self) -> &Arc<PointSpace> {
        &self.space
    }

    fn model(&self) -> Option<ScanModel> {
        Some(self.model.clone())
    }
}
