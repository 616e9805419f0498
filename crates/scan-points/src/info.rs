//! Scan shape summary for schedulers and file writers.

use crate::space::PointSpace;
use serde::{Deserialize, Serialize};

/// Rank, shape and size of a scan, computed without enumerating points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInformation {
    /// Number of dimensions.
    pub rank: usize,
    /// Extent of every dimension, outermost first.
    pub shape: Vec<usize>,
    /// Number of points.
    pub size: usize,
    /// Axis names in position order.
    pub axis_names: Vec<String>,
    /// Axes varying at each rank level.
    pub dimension_names: Vec<Vec<String>>,
}

impl ScanInformation {
    /// Summary of a built space.
    pub fn from_space(space: &PointSpace) -> Self {
        Self {
            rank: space.rank(),
            shape: space.shape(),
            size: space.size(),
            axis_names: space.axes().to_vec(),
            dimension_names: space.dimension_names().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::generator::PointGenerator;
    use crate::service::PointGeneratorService;
    use scan_core::model::{AxialStepModel, CompoundModel};

    #[test]
    fn test_compound_information() {
        let model = CompoundModel::default()
            .with_model(AxialStepModel::new("Temperature", 290.0, 295.0, 1.0))
            .with_model(AxialStepModel::new("Position", 1.0, 4.0, 0.6));
        let info = PointGeneratorService::default()
            .create_compound_generator(&model)
            .unwrap()
            .scan_info();
        assert_eq!(info.rank, 2);
        assert_eq!(info.shape, vec![6, 6]);
        assert_eq!(info.size, 36);
        assert_eq!(
            info.dimension_names,
            vec![vec!["Temperature".to_string()], vec!["Position".to_string()]]
        );

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["size"], 36);
    }
}
