//! Benchmarks for SO-GAAL training and scoring.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gaal::prelude::*;

fn make_data(n: usize, d: usize) -> Matrix<f32> {
    let data: Vec<f32> = (0..n * d).map(|i| ((i * 7919) % 1000) as f32 / 1000.0).collect();
    Matrix::from_vec(n, d, data).expect("n x d")
}

fn bench_so_gaal_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("so_gaal_fit");
    group.sample_size(10);

    for size in [50, 200, 1000].iter() {
        let x = make_data(*size, 4);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut detector = SoGaal::new().with_stop_epochs(2).with_random_state(42);
                detector.fit(black_box(&x)).expect("fit")
            });
        });
    }

    group.finish();
}

fn bench_so_gaal_decision_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("so_gaal_decision_function");

    for size in [50, 200, 1000].iter() {
        let x = make_data(*size, 4);
        let mut detector = SoGaal::new().with_stop_epochs(1).with_random_state(42);
        detector.fit(&x).expect("fit");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| detector.decision_function(black_box(&x)).expect("fitted"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_so_gaal_fit, bench_so_gaal_decision_function);
criterion_main!(benches);
