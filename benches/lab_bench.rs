//! Criterion benchmarks for the laboratory's analysis stages.
//!
//! Uses synthetic indicator values so the numbers reflect statistics and
//! file handling overhead only.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use u_metalab::indicator::{GapPolicy, IndicatorStore};
use u_metalab::significance::{kruskal_wallis, wilcoxon_signed_rank};
use u_metalab::table::TableAggregator;

fn sample(rng: &mut StdRng, n: usize, shift: f64) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(0.0..1.0) + shift).collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_wilcoxon(c: &mut Criterion) {
    let mut group = c.benchmark_group("wilcoxon");
    let mut rng = StdRng::seed_from_u64(42);

    // 30 and 50 use the exact distribution; 200 the normal approximation.
    for n in [30usize, 50, 200] {
        let x = sample(&mut rng, n, 0.0);
        let y = sample(&mut rng, n, 0.1);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(x, y), |b, (x, y)| {
            b.iter(|| wilcoxon_signed_rank(black_box(x), black_box(y), 50).expect("paired"))
        });
    }
    group.finish();
}

fn bench_kruskal(c: &mut Criterion) {
    let mut group = c.benchmark_group("kruskal_wallis");
    let mut rng = StdRng::seed_from_u64(7);

    for (k, n) in [(3usize, 30usize), (8, 30), (8, 200)] {
        let groups: Vec<Vec<f64>> = (0..k)
            .map(|i| sample(&mut rng, n, 0.05 * i as f64))
            .collect();
        group.bench_with_input(
            BenchmarkId::new(format!("k{}_n{}", k, n), k * n),
            &groups,
            |b, groups| b.iter(|| kruskal_wallis(black_box(groups))),
        );
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(10);
    let mut rng = StdRng::seed_from_u64(3);

    for algorithms in [2usize, 6] {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = IndicatorStore::new(GapPolicy::Append);
        for a in 0..algorithms {
            for p in 0..10 {
                let problem_dir = dir.path().join(format!("Alg{a}")).join(format!("P{p}"));
                fs::create_dir_all(&problem_dir).expect("create dir");
                let path = problem_dir.join("QI.HV");
                for run in 0..30 {
                    store
                        .insert(&path, run, rng.random_range(0.0..1.0))
                        .expect("insert");
                }
            }
        }

        let aggregator = TableAggregator::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithms),
            &dir,
            |b, dir| b.iter(|| aggregator.build(black_box(dir.path())).expect("build")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_wilcoxon, bench_kruskal, bench_aggregate);
criterion_main!(benches);
