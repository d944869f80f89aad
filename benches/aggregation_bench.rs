//! Benchmarks for front aggregation and dominance filtering.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flowshop_results::pareto::{aggregate, non_dominated, ParetoPoint, ParetoSeries};

/// Create `count` series of `size` points on a convex trade-off curve.
fn create_benchmark_series(count: usize, size: usize) -> Vec<ParetoSeries> {
    (0..count)
        .map(|s| {
            let points = (0..size)
                .map(|i| {
                    let x = 100.0 + i as f64 + s as f64;
                    ParetoPoint::new(x, 10_000.0 / x + (i % 3) as f64)
                })
                .collect();
            ParetoSeries::new(format!("S{}", s), points)
        })
        .collect()
}

#[cfg(feature = "bench")]
fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [20, 200, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let series = create_benchmark_series(3, size);
            b.iter(|| aggregate(&series));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_non_dominated(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated");

    for size in [20, 200, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let series = create_benchmark_series(1, size);
            b.iter(|| non_dominated(&series[0].points));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(benches, benchmark_aggregate, benchmark_non_dominated);

#[cfg(feature = "bench")]
criterion_main!(benches);
