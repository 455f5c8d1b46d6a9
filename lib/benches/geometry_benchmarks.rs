//! Geometry engine benchmarks
//!
//! Run with: cargo bench

use cell_geometry::config::CellDesign;
use cell_geometry::geometry::build_footprint_with_segments;
use cell_geometry::laminate::{aggregate, LaminateLayer};
use cell_geometry::session::DesignSession;
use cell_geometry::validation::validate_design;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn footprint_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_footprint");
    for n in [2usize, 16, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| build_footprint_with_segments(black_box(120.0), black_box(90.0), 8.0, n))
        });
    }
    group.finish();
}

fn aggregate_benchmark(c: &mut Criterion) {
    let layers: Vec<LaminateLayer> = (0..64)
        .map(|i| LaminateLayer::new(format!("ply {i}"), 10.0 + i as f64, (i % 40) as f64, 1.4))
        .collect();
    c.bench_function("aggregate_64_layers", |b| {
        b.iter(|| aggregate(black_box(&layers)))
    });
}

fn validate_benchmark(c: &mut Criterion) {
    let design = CellDesign::default();
    c.bench_function("validate_default_design", |b| {
        b.iter(|| validate_design(black_box(&design)))
    });
}

fn session_benchmark(c: &mut Criterion) {
    let mut session = DesignSession::default();
    c.bench_function("session_write_and_snapshot", |b| {
        b.iter(|| {
            session.set_cathode_width(black_box(79.0));
            session.snapshot()
        })
    });
}

criterion_group!(
    benches,
    footprint_benchmark,
    aggregate_benchmark,
    validate_benchmark,
    session_benchmark
);
criterion_main!(benches);
