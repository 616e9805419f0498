use scan_core::model::{
    AxialMultiStepModel, AxialStepModel, BoundingBox, CompoundModel, RandomOffsetMutator,
    ScanModel, TwoAxisGridPointsModel,
};
use scan_core::region::{RegionShape, ScanRegion};
use scan_points::{PointGenerator, PointGeneratorService};
use std::collections::BTreeMap;

fn grid() -> TwoAxisGridPointsModel {
    TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 4.0, 2.0), 5, 3)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-10
}

#[test]
fn test_single_axis_step() {
    let service = PointGeneratorService::default();
    let generator = service
        .create_generator(&AxialStepModel::new("T", 290.0, 300.0, 1.0).into())
        .unwrap();

    assert_eq!(generator.size(), 11);
    assert_eq!(generator.rank(), 1);
    assert_eq!(generator.shape(), vec![11]);
    let values: Vec<f64> = generator.iter().map(|p| p.get("T").unwrap()).collect();
    for (i, value) in values.iter().enumerate() {
        assert!(close(*value, 290.0 + i as f64), "point {i} was {value}");
    }
}

#[test]
fn test_temperature_position_compound() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("Temperature", 290.0, 295.0, 1.0))
        .with_model(AxialStepModel::new("Position", 1.0, 4.0, 0.6));
    let generator = service.create_compound_generator(&model).unwrap();

    assert_eq!(generator.size(), 36);
    assert_eq!(generator.rank(), 2);
    assert_eq!(generator.shape(), vec![6, 6]);

    let first = generator.position_at(0).unwrap();
    assert_eq!(first.get("Temperature"), Some(290.0));
    assert_eq!(first.get("Position"), Some(1.0));

    let seventh = generator.position_at(6).unwrap();
    assert_eq!(seventh.get("Temperature"), Some(291.0));
    assert_eq!(seventh.get("Position"), Some(1.0));
    assert_eq!(seventh.index_of("Temperature"), Some(1));
    assert_eq!(seventh.index_of("Position"), Some(0));
    assert_eq!(seventh.step_index(), 6);
}

#[test]
fn test_compound_point_is_union_of_components() {
    let service = PointGeneratorService::default();
    let outer_model: ScanModel = AxialStepModel::new("t", 0.0, 3.0, 1.0).into();
    let inner_model: ScanModel = grid().into();
    let outer = service.create_generator(&outer_model).unwrap();
    let inner = service.create_generator(&inner_model).unwrap();
    let compound = service
        .create_compound_generator(&CompoundModel::new(vec![outer_model, inner_model]))
        .unwrap();

    let n = inner.size();
    assert_eq!(compound.size(), outer.size() * n);
    assert_eq!(compound.rank(), outer.rank() + inner.rank());
    for i in 0..outer.size() {
        let a = outer.position_at(i).unwrap();
        for j in 0..n {
            let b = inner.position_at(j).unwrap();
            let joined = compound.position_at(i * n + j).unwrap();
            assert_eq!(joined.get("t"), a.get("t"));
            assert_eq!(joined.get("x"), b.get("x"));
            assert_eq!(joined.get("y"), b.get("y"));
        }
    }
}

#[test]
fn test_shape_and_dimension_names() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("t", 0.0, 1.0, 0.5))
        .with_model(grid());
    let generator = service.create_compound_generator(&model).unwrap();

    assert_eq!(generator.shape(), vec![3, 3, 5]);
    assert_eq!(generator.shape().iter().product::<usize>(), generator.size());
    assert_eq!(generator.shape().len(), generator.rank());
    assert_eq!(
        generator.dimension_names(),
        vec![vec!["t".to_string()], vec!["y".to_string()], vec!["x".to_string()]]
    );
    assert_eq!(generator.axis_names(), vec!["t", "x", "y"]);
}

#[test]
fn test_large_compound_builds_without_enumeration() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("a", 0.0, 4095.0, 1.0))
        .with_model(AxialStepModel::new("b", 0.0, 4095.0, 1.0));
    let generator = service.create_compound_generator(&model).unwrap();

    assert_eq!(generator.size(), 1 << 24);
    let last = generator.position_at((1 << 24) - 1).unwrap();
    assert_eq!(last.get("a"), Some(4095.0));
    assert_eq!(last.get("b"), Some(4095.0));
}

#[test]
fn test_nested_compound_matches_flat() {
    let service = PointGeneratorService::default();
    let a: ScanModel = AxialStepModel::new("a", 0.0, 2.0, 1.0).into();
    let b: ScanModel = AxialStepModel::new("b", 0.0, 1.0, 0.5).into();
    let c: ScanModel = grid().into();

    let nested = CompoundModel::new(vec![
        CompoundModel::new(vec![a.clone(), b.clone()]).into(),
        c.clone(),
    ]);
    let flat = CompoundModel::new(vec![a, b, c]);

    let nested = service.create_compound_generator(&nested).unwrap();
    let flat = service.create_compound_generator(&flat).unwrap();
    assert_eq!(nested.shape(), flat.shape());
    assert!(nested.iter().eq(flat.iter()));
}

#[test]
fn test_duplicate_axes_fail_before_building() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("x", 0.0, 1.0, 0.5))
        .with_model(grid());
    let err = service.create_compound_generator(&model).unwrap_err();
    assert!(err.is_validation(), "{err}");
}

#[test]
fn test_region_on_missing_axis_fails() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(grid())
        .with_region(ScanRegion::new(
            RegionShape::circle([0.0, 0.0], 1.0),
            ["x", "Temperature"],
        ));
    assert!(service
        .create_compound_generator(&model)
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_multi_step_outer_of_grid() {
    let service = PointGeneratorService::default();
    let multi = AxialMultiStepModel::new("z")
        .with_range(0.0, 1.0, 0.5)
        .with_range(1.5, 2.5, 0.5);
    let model = CompoundModel::default().with_model(multi).with_model(grid());
    let generator = service.create_compound_generator(&model).unwrap();

    assert_eq!(generator.shape(), vec![6, 3, 5]);
    assert_eq!(generator.size(), 90);
    let z: Vec<f64> = generator
        .iter()
        .step_by(15)
        .map(|p| p.get("z").unwrap())
        .collect();
    let expected = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5];
    assert!(z.iter().zip(expected).all(|(a, b)| close(*a, b)), "{z:?}");
}

#[test]
fn test_duration_sets_exposure() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default().with_model(grid()).with_duration(0.25);
    let generator = service.create_compound_generator(&model).unwrap();
    assert!(generator.iter().all(|p| p.exposure_time() == Some(0.25)));
}

#[test]
fn test_continuous_follows_innermost() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("t", 0.0, 1.0, 0.5))
        .with_model(AxialStepModel::new("x", 0.0, 1.0, 0.5).with_continuous(false));
    let generator = service.create_compound_generator(&model).unwrap();
    assert!(!generator.is_continuous());
}

#[test]
fn test_iteration_is_restartable() {
    let service = PointGeneratorService::default();
    let model = CompoundModel::default()
        .with_model(AxialStepModel::new("t", 0.0, 1.0, 0.5))
        .with_model(grid().with_alternating(true));
    let generator = service.create_compound_generator(&model).unwrap();

    let first: Vec<_> = generator.iter().collect();
    let second: Vec<_> = generator.iter().collect();
    assert_eq!(first, second);
    assert_eq!(first, generator.create_points().unwrap());
    assert_eq!(first.len(), generator.size());
}

fn jitter(seed: u64, offsets: &[(&str, f64)]) -> RandomOffsetMutator {
    let offsets: BTreeMap<String, f64> = offsets.iter().map(|(a, o)| (a.to_string(), *o)).collect();
    RandomOffsetMutator::new(seed, offsets)
}

#[test]
fn test_repeated_mutator_in_nested_compound_applies_once() {
    let service = PointGeneratorService::default();
    let a: ScanModel = AxialStepModel::new("a", 0.0, 2.0, 1.0).into();
    let b: ScanModel = AxialStepModel::new("b", 0.0, 1.0, 0.5).into();
    let shake = jitter(3, &[("a", 0.1), ("b", 0.1)]);

    let inner = CompoundModel::new(vec![a.clone()]).with_mutator(shake.clone());
    let nested = CompoundModel::new(vec![inner.into(), b.clone()]).with_mutator(shake.clone());
    let once = CompoundModel::new(vec![a.clone(), b.clone()]).with_mutator(shake);
    let plain = CompoundModel::new(vec![a, b]);

    let nested = service.create_compound_generator(&nested).unwrap();
    let once = service.create_compound_generator(&once).unwrap();
    let plain = service.create_compound_generator(&plain).unwrap();

    assert!(nested.iter().eq(once.iter()));
    assert!(!once.iter().eq(plain.iter()));
    for (moved, base) in once.iter().zip(plain.iter()) {
        for axis in ["a", "b"] {
            let offset = moved.get(axis).unwrap() - base.get(axis).unwrap();
            assert!(offset.abs() <= 0.1, "{axis} moved by {offset}");
        }
    }
}

#[test]
fn test_overlapping_mutators_add_offsets() {
    let service = PointGeneratorService::default();
    let first = jitter(1, &[("x", 0.1), ("y", 0.1)]);
    let second = jitter(2, &[("y", 0.2)]);

    let build = |mutators: Vec<RandomOffsetMutator>| {
        let model = mutators
            .into_iter()
            .fold(CompoundModel::default().with_model(grid()), |m, mutator| {
                m.with_mutator(mutator)
            });
        service.create_compound_generator(&model).unwrap()
    };
    let plain = build(vec![]);
    let only_first = build(vec![first.clone()]);
    let only_second = build(vec![second.clone()]);
    let both = build(vec![first, second]);

    for i in 0..plain.size() {
        let base = plain.position_at(i).unwrap();
        let one = only_first.position_at(i).unwrap();
        let two = only_second.position_at(i).unwrap();
        let sum = both.position_at(i).unwrap();

        assert_eq!(sum.get("x"), one.get("x"));
        let y = base.get("y").unwrap();
        let expected = y + (one.get("y").unwrap() - y) + (two.get("y").unwrap() - y);
        assert!(close(sum.get("y").unwrap(), expected), "point {i}");
    }
}
