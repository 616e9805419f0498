//! Generator whose points are filtered by regions.

use super::PointGenerator;
use crate::space::PointSpace;
use scan_core::model::{CompoundModel, ScanModel};
use scan_core::region::ScanRegion;
use std::sync::Arc;

/// An axis model restricted to the points inside every region.
///
/// When the regions keep the whole grid the shape is unchanged; otherwise
/// the masked dimensions collapse into one dimension of surviving points.
#[derive(Debug, Clone)]
pub struct RegionMaskedGenerator {
    model: ScanModel,
    regions: Vec<ScanRegion>,
    space: Arc<PointSpace>,
}

impl RegionMaskedGenerator {
    pub(crate) fn new(model: ScanModel, regions: Vec<ScanRegion>, space: PointSpace) -> Self {
        Self {
            model,
            regions,
            space: Arc::new(space),
        }
    }

    /// The unmasked model.
    pub fn inner_model(&self) -> &ScanModel {
        &self.model
    }

    /// Regions as declared.
    pub fn regions(&self) -> &[ScanRegion] {
        &self.regions
    }
}

impl PointGenerator for RegionMaskedGenerator {
    fn space(&self) -> &Arc<PointSpace> {
        &self.space
    }

    /// A one-component compound carrying the regions.
    fn model(&self) -> Option<ScanModel> {
        let mut compound = CompoundModel::new(vec![self.model.clone()]);
        compound.regions = self.regions.clone();
        Some(compound.into())
    }
}
