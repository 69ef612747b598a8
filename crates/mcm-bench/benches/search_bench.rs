//! Search strategy benchmarks: exhaustive enumeration, greedy merging, and
//! divide-and-conquer, on the same family of synthetic datasets so their
//! relative cost is comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mcm_core::dataset::Dataset;
use mcm_core::model::Model;

fn synthetic_dataset(n: usize, q: u32, observations: usize) -> Dataset {
    let rows: Vec<Vec<u32>> = (0..observations)
        .map(|i| (0..n).map(|j| ((i + j * 5) as u32) % q).collect())
        .collect();
    Dataset::from_rows(&rows, n, q).expect("synthetic dataset is well-formed")
}

fn bench_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_exhaustive_q3");
    for &n in &[4usize, 6, 8] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let mut model = Model::new(synthetic_dataset(n, 3, 200));
                black_box(model.run_exhaustive().unwrap());
            });
        });
    }
    group.finish();
}

fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_greedy_q3");
    for &n in &[8usize, 16, 24, 32] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let mut model = Model::new(synthetic_dataset(n, 3, 200));
                black_box(model.run_greedy(None).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_divide_and_conquer(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_divide_and_conquer_q3");
    for &n in &[8usize, 16, 24, 32] {
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, &n| {
            b.iter(|| {
                let mut model = Model::new(synthetic_dataset(n, 3, 200));
                black_box(model.run_divide_and_conquer(None).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exhaustive, bench_greedy, bench_divide_and_conquer);
criterion_main!(benches);
