//! Nested composition of generators.

use super::PointGenerator;
use crate::space::PointSpace;
use scan_core::model::{CompoundModel, ScanModel};
use std::sync::Arc;

/// Outer-to-inner nesting of components with regions and mutators applied
/// across the joined axis space.
///
/// Rank is the sum of the component ranks after masking, shape is the
/// concatenation of their shapes and size is the product of their sizes.
#[derive(Debug, Clone)]
pub struct CompoundGenerator {
    model: Option<CompoundModel>,
    space: Arc<PointSpace>,
}

impl CompoundGenerator {
    pub(crate) fn new(model: Option<CompoundModel>, space: PointSpace) -> Self {
        Self {
            model,
            space: Arc::new(space),
        }
    }

    /// Compound model, when every component had one.
    pub fn compound_model(&self) -> Option<&CompoundModel> {
        self.model.as_ref()
    }
}

impl PointGenerator for CompoundGenerator {
    fn space(&self) -> &Arc<PointSpace> {
        &self.space
    }

    fn model(&self) -> Option<ScanModel> {
        self.model.clone().map(ScanModel::Compound)
    }
}
