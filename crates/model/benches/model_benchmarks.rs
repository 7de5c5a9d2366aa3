//! Benchmarks for greenbond-model estimation.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use greenbond_model::{GarchConfig, GarchEngine, OlsEngine};
use greenbond_primitives::{Date, DateIndexedSeries};
use greenbond_traits::{RegressionEngine, VolatilityEngine};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

fn random_design(n_obs: usize, n_factors: usize) -> (Array1<f64>, Array2<f64>, Vec<String>) {
    let mut rng = rand::thread_rng();
    let x = Array2::from_shape_fn((n_obs, n_factors + 1), |(_, j)| {
        if j == 0 { 1.0 } else { rng.r#gen::<f64>() * 0.02 - 0.01 }
    });
    let y = Array1::from_iter((0..n_obs).map(|i| x.row(i).sum() * 0.5));
    let names = (0..=n_factors).map(|j| format!("f{j}")).collect();
    (y, x, names)
}

fn simulated_returns(n: usize) -> DateIndexedSeries {
    let mut rng = StdRng::seed_from_u64(1);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let (mut var, mut eps) = (1e-4_f64, 0.0_f64);
    let values = (0..n)
        .map(|_| {
            var = 2e-6 + 0.08 * eps * eps + 0.9 * var;
            eps = var.sqrt() * normal.sample(&mut rng);
            eps
        })
        .collect();
    let dates =
        (0..n).map(|i| Date::from_num_days_from_ce_opt(735_000 + i as i32).unwrap()).collect();
    DateIndexedSeries::new("bench", dates, values).unwrap()
}

fn bench_ols(c: &mut Criterion) {
    let mut group = c.benchmark_group("ols_fit");

    for n_obs in [250, 1250, 5000] {
        group.throughput(Throughput::Elements(n_obs as u64));
        group.bench_with_input(BenchmarkId::new("n_obs", n_obs), &n_obs, |b, &n_obs| {
            let (y, x, names) = random_design(n_obs, 4);
            let engine = OlsEngine::new();
            b.iter(|| engine.fit(black_box(&y), black_box(&x), &names).unwrap());
        });
    }

    group.finish();
}

fn bench_garch(c: &mut Criterion) {
    let mut group = c.benchmark_group("garch_fit");
    group.sample_size(10);

    for n_obs in [500, 1250, 2500] {
        let returns = simulated_returns(n_obs);
        group.bench_with_input(BenchmarkId::new("constant_mean", n_obs), &returns, |b, r| {
            let engine = GarchEngine::new();
            b.iter(|| engine.fit(black_box(r)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("ar1_mean", n_obs), &returns, |b, r| {
            let engine = GarchEngine::with_config(GarchConfig::autoregressive(1));
            b.iter(|| engine.fit(black_box(r)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ols, bench_garch);
criterion_main!(benches);
