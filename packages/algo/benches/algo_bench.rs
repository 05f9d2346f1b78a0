//! Benchmark suite for quizpath-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quizpath_algo::{BetaParams, BetaSampler, BetaSamplerKind};

fn bench_beta_samplers(c: &mut Criterion) {
    let params = BetaParams::from_attempts(12, 5);

    let mut exact = BetaSampler::with_seed(42, BetaSamplerKind::Exact);
    c.bench_function("BetaSampler::sample exact", |b| {
        b.iter(|| exact.sample(black_box(&params)))
    });

    let mut approx = BetaSampler::with_seed(42, BetaSamplerKind::NormalApprox);
    c.bench_function("BetaSampler::sample normal approx", |b| {
        b.iter(|| approx.sample(black_box(&params)))
    });
}

criterion_group!(benches, bench_beta_samplers);
criterion_main!(benches);
