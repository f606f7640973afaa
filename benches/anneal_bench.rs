//! Criterion benchmarks for the Boltzmann TSP solver.
//!
//! Cities sit on a circle so every pair has a known distance. The two
//! groups compare full consensus recomputation against incremental
//! flip deltas on the same schedule.

use boltzmann_tsp::anneal::AnnealConfig;
use boltzmann_tsp::distance::{DistanceTable, RawDistances};
use boltzmann_tsp::energy::EnergyMode;
use boltzmann_tsp::solver::{SolverConfig, TourSolver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn circle(n: usize) -> DistanceTable {
    let point = |i: usize| {
        let angle = std::f64::consts::TAU * i as f64 / n as f64;
        (angle.cos() * 10.0, angle.sin() * 10.0)
    };
    let mut raw = RawDistances::new();
    for i in 0..n {
        let row = raw.entry(format!("city{i:03}")).or_default();
        for j in (i + 1)..n {
            let (a, b) = (point(i), point(j));
            row.insert(format!("city{j:03}"), ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt());
        }
    }
    DistanceTable::build(&raw).expect("circle dataset is well-formed")
}

fn config(mode: EnergyMode) -> SolverConfig {
    SolverConfig::default()
        .with_penalty(200.0)
        .with_bonus(100.0)
        .with_anneal(
            AnnealConfig::default()
                .with_initial_temperature(100.0)
                .with_min_temperature(0.1)
                .with_decay_rate(0.99),
        )
        .with_max_attempts(1)
        .with_energy_mode(mode)
        .with_seed(42)
}

fn bench_mode(c: &mut Criterion, name: &str, mode: EnergyMode) {
    let mut group = c.benchmark_group(name);
    group.sample_size(10);

    for &n in &[5, 8, 12] {
        let table = circle(n);
        let config = config(mode);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(table, config), |b, (t, c)| {
            b.iter(|| {
                let result = TourSolver::run(black_box(t), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_full(c: &mut Criterion) {
    bench_mode(c, "anneal_full", EnergyMode::Full);
}

fn bench_incremental(c: &mut Criterion) {
    bench_mode(c, "anneal_incremental", EnergyMode::Incremental);
}

criterion_group!(benches, bench_full, bench_incremental);
criterion_main!(benches);
