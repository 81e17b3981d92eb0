//! Performance benchmarks for the portfolio simulator.
//!
//! Run with: cargo bench

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion,
};
use investor_gym::asset::PriceProcess;
use investor_gym::env::InvestorEnv;
use investor_gym::factory::PortfolioFactory;
use investor_gym::policy::EqualWeight;
use investor_gym::portfolio::{Holding, Portfolio};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Portfolio of `n` equally funded GBM assets.
fn generate_portfolio(n: usize) -> Portfolio {
    let holdings = (0..n)
        .map(|i| {
            let mu = 0.0005 * (i as f64 - n as f64 / 2.0);
            let asset = PriceProcess::new(mu, 0.02, 100.0 + i as f64).unwrap();
            Holding::new(asset, 10.0)
        })
        .collect();
    Portfolio::new(holdings).unwrap()
}

/// Benchmark single-asset price generation.
fn bench_price_process(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let asset = PriceProcess::new(0.001, 0.02, 100.0).unwrap();

    c.bench_function("price_process_tick", |b| {
        b.iter_batched(
            || asset.clone(),
            |mut asset| black_box(asset.tick(&mut rng)),
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark portfolio tick and rebalance for growing universes.
fn bench_portfolio(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio");

    for size in [3, 10, 50].iter() {
        // Fresh portfolios per batch keep prices away from underflow.
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::new("tick", size), size, |b, &size| {
            b.iter_batched(
                || generate_portfolio(size),
                |mut portfolio| {
                    portfolio.tick(&mut rng);
                    portfolio
                },
                BatchSize::SmallInput,
            )
        });

        let weights = vec![1.0 / *size as f64; *size];
        group.bench_with_input(BenchmarkId::new("rebalance", size), size, |b, &size| {
            b.iter_batched(
                || generate_portfolio(size),
                |mut portfolio| {
                    portfolio.rebalance(black_box(&weights)).unwrap();
                    portfolio
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark building episodes and playing them to completion.
fn bench_episode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("factory_build", |b| {
        b.iter(|| PortfolioFactory::new().build(black_box(100), &mut rng).unwrap())
    });

    let mut env = InvestorEnv::new(252, Some(3)).unwrap();
    c.bench_function("episode_equal_weight_252", |b| {
        b.iter(|| env.run_episode(0, &mut EqualWeight, |_, _| {}).unwrap())
    });
}

criterion_group!(benches, bench_price_process, bench_portfolio, bench_episode);
criterion_main!(benches);
