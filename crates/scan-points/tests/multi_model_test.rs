use scan_core::model::{
    AxialArrayModel, AxialPointsModel, AxialStepModel, BoundingBox, CompoundModel,
    ConcurrentModel, ConsecutiveModel, ScanModel, TwoAxisGridPointsModel,
};
use scan_points::{PointGenerator, PointGeneratorService};

fn axial(name: &str, points: usize) -> ScanModel {
    AxialPointsModel::new(name, 0.0, 1.0, points).into()
}

#[test]
fn test_concurrent_sizes_must_match() {
    let service = PointGeneratorService::default();
    let model = ConcurrentModel::new(vec![axial("x", 39), axial("y", 40)]);
    let err = service.create_generator(&model.into()).unwrap_err();
    assert!(err.is_validation(), "{err}");
}

#[test]
fn test_concurrent_axes_must_be_disjoint() {
    let service = PointGeneratorService::default();
    let model = ConcurrentModel::new(vec![axial("x", 40), axial("x", 40)]);
    assert!(service
        .create_generator(&model.into())
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_concurrent_moves_in_lock_step() {
    let service = PointGeneratorService::default();
    let model: ScanModel = ConcurrentModel::new(vec![
        axial("x", 5),
        AxialArrayModel::new("energy", vec![10.0, 20.0, 30.0, 40.0, 50.0]).into(),
    ])
    .into();
    let generator = service.create_generator(&model).unwrap();

    assert_eq!(generator.size(), 5);
    assert_eq!(generator.rank(), 1);
    assert_eq!(generator.dimension_names(), vec![vec!["x".to_string(), "energy".to_string()]]);
    let third = generator.position_at(2).unwrap();
    assert_eq!(third.get("x"), Some(0.5));
    assert_eq!(third.get("energy"), Some(30.0));
    assert_eq!(third.index_of("energy"), Some(2));
}

#[test]
fn test_concurrent_rejects_alternating_component() {
    let service = PointGeneratorService::default();
    let grid = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 2, 2)
        .with_alternating(true);
    let model = ConcurrentModel::new(vec![grid.into(), axial("z", 4)]);
    assert!(service
        .create_generator(&model.into())
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_consecutive_offsets_step_indices() {
    let service = PointGeneratorService::default();
    let model: ScanModel = ConsecutiveModel::new(vec![
        AxialStepModel::new("x", 0.0, 1.0, 0.5).into(),
        AxialStepModel::new("x", 1.5, 3.0, 0.5).into(),
    ])
    .into();
    let generator = service.create_generator(&model).unwrap();

    assert_eq!(generator.size(), 7);
    assert_eq!(generator.shape(), vec![7]);
    let fifth = generator.position_at(4).unwrap();
    assert_eq!(fifth.get("x"), Some(2.0));
    assert_eq!(fifth.index_of("x"), Some(4));
    assert_eq!(fifth.step_index(), 4);
}

#[test]
fn test_consecutive_axes_must_match() {
    let service = PointGeneratorService::default();
    let model = ConsecutiveModel::new(vec![axial("x", 3), axial("y", 3)]);
    assert!(service
        .create_generator(&model.into())
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_continuous_consecutive_gap() {
    let service = PointGeneratorService::default();
    let parts = vec![
        AxialStepModel::new("x", 0.0, 1.0, 0.5).into(),
        AxialStepModel::new("x", 5.0, 6.0, 0.5).into(),
    ];

    let err = service
        .create_generator(&ConsecutiveModel::new(parts.clone()).into())
        .unwrap_err();
    assert!(err.is_generation(), "{err}");

    let stepped = service
        .create_generator(&ConsecutiveModel::new(parts).with_continuous(false).into())
        .unwrap();
    assert_eq!(stepped.size(), 6);
}

#[test]
fn test_consecutive_inside_compound() {
    let service = PointGeneratorService::default();
    let consecutive = ConsecutiveModel::new(vec![
        AxialStepModel::new("x", 0.0, 1.0, 0.5).into(),
        AxialStepModel::new("x", 1.5, 2.5, 0.5).into(),
    ]);
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("t", 0.0, 1.0, 1.0))
        .with_model(consecutive);
    let generator = service.create_compound_generator(&model).unwrap();

    assert_eq!(generator.shape(), vec![2, 6]);
    let point = generator.position_at(9).unwrap();
    assert_eq!(point.get("t"), Some(1.0));
    assert_eq!(point.get("x"), Some(1.5));
}

#[test]
fn test_short_arrays_check_continuity() {
    let service = PointGeneratorService::default();
    let single = service
        .create_generator(&AxialArrayModel::new("x", vec![0.0, 1.0, 2.0]).into())
        .unwrap();
    assert_eq!(single.initial_bounds().unwrap().get("x"), Some(-0.5));
    assert_eq!(single.final_bounds().unwrap().get("x"), Some(2.5));

    let parts: Vec<ScanModel> = vec![
        AxialArrayModel::new("x", vec![0.0, 1.0, 2.0]).into(),
        AxialArrayModel::new("x", vec![10.0, 11.0, 12.0]).into(),
    ];
    let err = service
        .create_generator(&ConsecutiveModel::new(parts.clone()).into())
        .unwrap_err();
    assert!(err.is_generation(), "{err}");

    let abutting: Vec<ScanModel> = vec![
        AxialArrayModel::new("x", vec![0.0, 1.0, 2.0]).into(),
        AxialArrayModel::new("x", vec![3.0, 4.0, 5.0]).into(),
    ];
    let joined = service
        .create_generator(&ConsecutiveModel::new(abutting).into())
        .unwrap();
    assert_eq!(joined.size(), 6);
}
