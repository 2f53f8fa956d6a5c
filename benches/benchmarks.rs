//! Benchmarks for micro-cluster operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use microcluster::{ClusterFactory, KernelConfig, LabelAware, LabeledMicroCluster, SharedCluster};

const DIM: usize = 64;

fn point(seed: usize) -> Vec<f64> {
    (0..DIM).map(|i| ((seed * 31 + i * 7) % 97) as f64 / 97.0).collect()
}

fn trained_cluster(factory: &ClusterFactory, n: usize) -> LabeledMicroCluster {
    let mut cluster = factory.create(&point(0), Some(0), 0);
    for i in 1..n {
        cluster.insert(&point(i), Some(i % 5), i as i64).unwrap();
    }
    cluster
}

fn factory() -> ClusterFactory {
    ClusterFactory::new(KernelConfig::default().with_half_life(1_000.0)).unwrap()
}

// =============================================================================
// Mutation
// =============================================================================

fn benchmark_insert(c: &mut Criterion) {
    let factory = factory();
    let mut cluster = factory.create(&point(0), Some(0), 0);
    let p = point(1);
    let mut t = 0i64;

    c.bench_function("insert_decayed", |b| {
        b.iter(|| {
            t += 1;
            cluster.insert(black_box(&p), Some(1), t).unwrap()
        })
    });
}

fn benchmark_merge(c: &mut Criterion) {
    let factory = factory();
    let a = trained_cluster(&factory, 100);
    let b = trained_cluster(&factory, 100);

    c.bench_function("merge_fresh_identity", |bench| {
        bench.iter(|| factory.merge(black_box(&a), black_box(&b)).unwrap())
    });
}

// =============================================================================
// Queries
// =============================================================================

fn benchmark_queries(c: &mut Criterion) {
    let factory = factory();
    let cluster = trained_cluster(&factory, 1_000);
    let probe = point(3);

    c.bench_function("center", |b| b.iter(|| black_box(&cluster).center().unwrap()));
    c.bench_function("radius", |b| b.iter(|| black_box(&cluster).radius()));
    c.bench_function("label_votes", |b| b.iter(|| black_box(&cluster).label_votes()));
    c.bench_function("inclusion_probability", |b| {
        b.iter(|| cluster.inclusion_probability(black_box(&probe)).unwrap())
    });
}

fn benchmark_snapshot(c: &mut Criterion) {
    let factory = factory();
    let shared = SharedCluster::new(trained_cluster(&factory, 1_000));

    c.bench_function("shared_snapshot", |b| b.iter(|| black_box(&shared).snapshot()));
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_merge,
    benchmark_queries,
    benchmark_snapshot
);
criterion_main!(benches);
