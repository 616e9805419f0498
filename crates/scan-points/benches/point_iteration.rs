//! Criterion benchmarks for generator construction and iteration.
//!
//! Key metrics:
//! - Construction time of a 2^24-point compound (must not depend on size)
//! - Per-point cost of lazy iteration over 10^7 points
//! - Iteration over a region-masked grid
//!
//! Run with: cargo bench --bench point_iteration

use anyhow::Result;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use scan_core::model::{AxialStepModel, BoundingBox, CompoundModel, TwoAxisGridPointsModel};
use scan_core::region::{RegionShape, ScanRegion};
use scan_points::{PointGenerator, PointGeneratorService};

fn large_compound() -> CompoundModel {
    CompoundModel::default()
        .with_model(AxialStepModel::new("a", 0.0, 4095.0, 1.0))
        .with_model(AxialStepModel::new("b", 0.0, 4095.0, 1.0))
}

fn ten_million() -> CompoundModel {
    CompoundModel::default()
        .with_model(AxialStepModel::new("t", 0.0, 9.0, 1.0))
        .with_model(
            TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1000, 1000)
                .with_alternating(true),
        )
}

fn construction(c: &mut Criterion) {
    let service = PointGeneratorService::default();
    let model = large_compound();
    c.bench_function("build_compound_2e24", |b| {
        b.iter(|| {
            let generator = service.create_compound_generator(black_box(&model));
            black_box(generator.map(|g| g.size()))
        });
    });
}

fn iteration(c: &mut Criterion) -> Result<()> {
    let service = PointGeneratorService::default();
    let generator = service.create_compound_generator(&ten_million())?;

    let mut group = c.benchmark_group("iterate");
    group.sample_size(10);
    group.throughput(Throughput::Elements(generator.size() as u64));
    group.bench_function("compound_1e7", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for position in generator.iter() {
                sum += position.values()[0];
            }
            black_box(sum)
        });
    });
    group.finish();
    Ok(())
}

fn masked(c: &mut Criterion) -> Result<()> {
    let service = PointGeneratorService::default();
    let grid = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 10.0, 10.0), 500, 500);
    let circle = ScanRegion::unbound(RegionShape::circle([5.0, 5.0], 4.0));
    let generator = service.create_masked_generator(&grid.into(), &[circle])?;

    let mut group = c.benchmark_group("iterate");
    group.throughput(Throughput::Elements(generator.size() as u64));
    group.bench_function("masked_grid", |b| {
        b.iter(|| black_box(generator.iter().count()));
    });
    group.finish();
    Ok(())
}

fn point_iteration(c: &mut Criterion) {
    construction(c);
    if let Err(e) = iteration(c).and_then(|()| masked(c)) {
        eprintln!("benchmark setup failed: {e}");
    }
}

criterion_group!(benches, point_iteration);
criterion_main!(benches);
