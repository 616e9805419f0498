use scan_core::model::{
    AxialArrayModel, AxialStepModel, BoundingBox, CompoundModel, ConsecutiveModel,
    RandomOffsetMutator, TwoAxisGridPointsModel, TwoAxisSpiralModel,
};
use scan_core::region::{RegionShape, ScanRegion};
use scan_points::{CompoundDict, PointGenerator, PointGeneratorService};
use std::collections::BTreeMap;

fn rebuilt_through_json(generator: &dyn PointGenerator) -> Box<dyn PointGenerator> {
    let json = generator.to_dict().unwrap().to_json_string().unwrap();
    let dict = CompoundDict::from_json_str(&json).unwrap();
    Box::new(PointGeneratorService::default().generator_from_dict(&dict).unwrap())
}

#[test]
fn test_masked_compound_with_mutator_rebuilds_identically() {
    let service = PointGeneratorService::default();
    let offsets = BTreeMap::from([("x".to_string(), 0.05), ("y".to_string(), 0.02)]);
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("T", 290.0, 292.0, 1.0))
        .with_model(
            TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 4.0, 4.0), 9, 9)
                .with_alternating(true),
        )
        .with_region(ScanRegion::unbound(RegionShape::circle([2.0, 2.0], 1.5)))
        .with_mutator(RandomOffsetMutator::new(7, offsets))
        .with_duration(0.1);
    let original = service.create_compound_generator(&model).unwrap();
    let rebuilt = rebuilt_through_json(&original);

    assert_eq!(rebuilt.shape(), original.shape());
    assert_eq!(rebuilt.dimension_names(), original.dimension_names());
    assert!(rebuilt.iter().eq(original.iter()));
}

#[test]
fn test_consecutive_and_array_rebuild() {
    let service = PointGeneratorService::default();
    let sweep = ConsecutiveModel::new(vec![
        AxialStepModel::new("energy", 7.0, 7.5, 0.25).into(),
        AxialArrayModel::new("energy", vec![7.6, 7.7, 7.9]).into(),
    ])
    .with_continuous(false);
    let original = service.create_generator(&sweep.into()).unwrap();
    let rebuilt = rebuilt_through_json(original.as_ref());

    assert_eq!(rebuilt.size(), 6);
    assert!(rebuilt.iter().eq(original.iter()));
}

#[test]
fn test_spiral_rebuild() {
    let service = PointGeneratorService::default();
    let spiral = TwoAxisSpiralModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0)).with_scale(0.5);
    let original = service.create_generator(&spiral.into()).unwrap();
    let rebuilt = rebuilt_through_json(original.as_ref());

    assert_eq!(rebuilt.size(), original.size());
    assert!(rebuilt.iter().eq(original.iter()));
}

#[test]
fn test_dictionary_json_shape() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 3, 3))
        .with_region(ScanRegion::unbound(RegionShape::circle([0.5, 0.5], 0.5)));
    let json = service
        .create_compound_generator(&model)
        .unwrap()
        .to_dict()
        .unwrap()
        .to_json()
        .unwrap();

    assert_eq!(json["duration"], -1.0);
    assert_eq!(json["delay_after"], 0.0);
    assert_eq!(json["generators"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["excluders"][0]["axes"][0], "x");
    assert_eq!(json["excluders"][0]["rois"][0]["type"], "circle");
}
