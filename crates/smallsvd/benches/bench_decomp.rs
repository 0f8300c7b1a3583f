use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use faer::mat;
use glam::{Mat2, Mat3, Vec3};
use smallsvd::svd2::{polar_decompose2, svd2};
use smallsvd::svd3::svd3;
use std::hint::black_box;

fn bench_svd2(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd2");
    let a = Mat2::from_cols_array(&[4.0, 1.0, -2.0, 3.0]);

    group.bench_function(BenchmarkId::new("svd2", ""), |b| {
        b.iter(|| {
            svd2(black_box(&a));
            black_box(());
        })
    });

    group.bench_function(BenchmarkId::new("polar_decompose2", ""), |b| {
        b.iter(|| {
            polar_decompose2(black_box(&a));
            black_box(());
        })
    });
}

fn bench_svd3(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd3");
    let a1 = Mat3 {
        x_axis: Vec3::new(1.0, 0.0, 0.0),
        y_axis: Vec3::new(0.0, 2.0, 0.0),
        z_axis: Vec3::new(0.0, 0.0, 3.0),
    };

    let a2 = mat![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]];

    group.bench_function(BenchmarkId::new("svd3", ""), |b| {
        b.iter(|| {
            let _ = svd3(black_box(&a1));
            black_box(());
        })
    });

    group.bench_function(BenchmarkId::new("svd3_faer", ""), |b| {
        b.iter(|| {
            a2.svd();
            black_box(());
        })
    });
}

criterion_group!(benches, bench_svd2, bench_svd3);
criterion_main!(benches);
