//! Benchmarks for the wind shelter scan and the full pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pra_algorithms::forest::ForestType;
use pra_algorithms::pra::{run, PraConfig};
use pra_algorithms::terrain::{wind_shelter, WindShelterParams};
use pra_core::{GeoTransform, Raster};

fn create_dem(size: usize) -> Raster<f64> {
    let mut dem = Raster::new(size, size);
    dem.set_transform(GeoTransform::new(0.0, size as f64 * 10.0, 10.0, -10.0));

    // Inclined plane with a ridge-and-gully pattern
    for row in 0..size {
        for col in 0..size {
            let base = 1500.0 + 6.0 * row as f64;
            let variation = ((row * 7 + col * 13) % 100) as f64 / 4.0;
            dem.set(row, col, base + variation).unwrap();
        }
    }
    dem
}

fn bench_wind_shelter(c: &mut Criterion) {
    let mut group = c.benchmark_group("wind_shelter");
    let dem = create_dem(512);

    for radius in [3, 6, 10].iter() {
        let params = WindShelterParams {
            radius: *radius,
            ..WindShelterParams::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(radius), radius, |b, _| {
            b.iter(|| wind_shelter(black_box(&dem), &params).unwrap())
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let config = PraConfig {
        forest_type: ForestType::NoForest,
        ..PraConfig::default()
    };
    for size in [256, 512].iter() {
        let dem = create_dem(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| run(black_box(&dem), None, &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wind_shelter, bench_pipeline);
criterion_main!(benches);
