//! Single anneal pass over an assignment grid.
//!
//! # Algorithm
//!
//! While `T >= T_min`:
//! 1. Pick a uniformly random cell and flip it
//! 2. Compute the energy change `ΔE`
//! 3. Keep the flip with probability `1 / (1 + exp(ΔE / T))`, else revert
//! 4. Snapshot the grid if its energy is the lowest seen this pass
//! 5. `T *= decay_rate`
//!
//! The starting grid is the first snapshot, so a pass never leaves a grid
//! with higher energy than it was handed. On exit the grid is replaced by
//! the lowest-energy snapshot.
//!
//! # Reference
//!
//! Aarts & Korst (1989), *Simulated Annealing and Boltzmann Machines*, ch. 9.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;

use super::config::AnnealConfig;
use super::types::{AnnealObserver, ProgressEvent};
use crate::energy::{EnergyMode, EnergyModel};
use crate::error::{ConfigError, LookupError};
use crate::grid::AssignmentGrid;

/// Statistics of one anneal pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassOutcome {
    /// Proposals evaluated.
    pub iterations: usize,

    /// Flips kept (including improvements).
    pub accepted_moves: usize,

    /// Flips kept that strictly lowered the energy.
    pub improving_moves: usize,

    /// Energy of the grid left behind by the pass.
    pub best_energy: f64,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Whether the cancel flag stopped the pass early.
    pub cancelled: bool,
}

/// Lowest-energy grid seen during a pass, held apart from the live grid.
#[derive(Debug, Clone)]
struct BestSnapshot {
    grid: AssignmentGrid,
    energy: f64,
}

/// Probability of keeping a flip that changes the energy by `delta`.
///
/// Returns `0.0` when `exp(delta / temperature)` overflows.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    let boltzmann = (delta / temperature).exp();
    if boltzmann.is_infinite() {
        return 0.0;
    }
    1.0 / (1.0 + boltzmann)
}

fn accept<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    let p = acceptance_probability(delta, temperature);
    p > 0.0 && rng.random::<f64>() <= p
}

/// Runs anneal passes against an energy model.
#[derive(Debug, Clone)]
pub struct Annealer<'a> {
    model: EnergyModel<'a>,
    config: AnnealConfig,
    mode: EnergyMode,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Annealer<'a> {
    /// Creates an annealer with full energy recomputation.
    pub fn new(model: EnergyModel<'a>, config: AnnealConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            mode: EnergyMode::Full,
            cancel: None,
        })
    }

    pub fn with_energy_mode(mut self, mode: EnergyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks `cancel` before every proposal and stops when it is set.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn model(&self) -> &EnergyModel<'a> {
        &self.model
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Anneals `grid` in place and leaves the best grid found in it.
    ///
    /// `attempt` is only forwarded to the observer.
    ///
    /// # Errors
    ///
    /// [`LookupError`] if an adjacent-epoch pair needs a distance the
    /// table does not have. The grid is left mid-step in that case.
    #[tracing::instrument(level = "debug", name = "anneal", skip_all, fields(attempt = attempt))]
    pub fn anneal<R, O>(
        &self,
        grid: &mut AssignmentGrid,
        rng: &mut R,
        observer: &mut O,
        attempt: usize,
    ) -> Result<PassOutcome, LookupError>
    where
        R: Rng,
        O: AnnealObserver + ?Sized,
    {
        let n = grid.dim();
        let mut energy = self.model.consensus(grid)?;
        let mut best = BestSnapshot {
            grid: grid.snapshot(),
            energy,
        };

        let mut temperature = self.config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        tracing::debug!(energy, temperature, "pass start");

        while n > 0 && temperature >= self.config.min_temperature {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            // One draw over all N² cells, split into (row, col).
            let cell = rng.random_range(0..n * n);
            let (city, epoch) = (cell / n, cell % n);

            let before = energy;
            let after = match self.mode {
                EnergyMode::Full => {
                    grid.flip(city, epoch);
                    self.model.consensus(grid)?
                }
                EnergyMode::Incremental => {
                    let delta = self.model.flip_delta(grid, city, epoch)?;
                    grid.flip(city, epoch);
                    before + delta
                }
            };
            let delta = after - before;

            let accepted = accept(delta, temperature, rng);
            if accepted {
                energy = after;
                accepted_moves += 1;
                if delta < 0.0 {
                    improving_moves += 1;
                }
            } else {
                grid.flip(city, epoch);
                energy = before;
            }

            if energy < best.energy {
                best = BestSnapshot {
                    grid: grid.snapshot(),
                    energy,
                };
            }

            tracing::trace!(city, epoch, delta, accepted, energy, temperature, "step");
            observer.on_progress(&ProgressEvent {
                attempt,
                iteration: iterations,
                temperature,
                energy,
                best_energy: best.energy,
                accepted,
            });

            temperature *= self.config.decay_rate;
            iterations += 1;
        }

        grid.restore(&best.grid);
        let best_energy = match self.mode {
            EnergyMode::Full => best.energy,
            // Drop accumulated rounding from the running sum.
            EnergyMode::Incremental => self.model.consensus(grid)?,
        };

        tracing::debug!(
            iterations,
            accepted_moves,
            improving_moves,
            best_energy,
            cancelled,
            "pass end"
        );

        Ok(PassOutcome {
            iterations,
            accepted_moves,
            improving_moves,
            best_energy,
            final_temperature: temperature,
            cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::NoopObserver;
    use crate::distance::tests::raw;
    use crate::distance::DistanceTable;
    use crate::random::create_rng;

    fn square() -> DistanceTable {
        DistanceTable::build(&raw(&[
            ("a", "b", 1.0),
            ("a", "c", 1.4),
            ("a", "d", 1.0),
            ("b", "c", 1.0),
            ("b", "d", 1.4),
            ("c", "d", 1.0),
        ]))
        .unwrap()
    }

    #[test]
    fn test_acceptance_favors_improvement() {
        assert!(acceptance_probability(-1.0, 10.0) > 0.5);
        assert!((acceptance_probability(0.0, 10.0) - 0.5).abs() < 1e-12);
        assert!(acceptance_probability(1.0, 10.0) < 0.5);
    }

    #[test]
    fn test_acceptance_overflow_rejects() {
        assert_eq!(acceptance_probability(1e6, 1e-3), 0.0);
        let mut rng = create_rng(0);
        for _ in 0..100 {
            assert!(!accept(1e6, 1e-3, &mut rng));
        }
    }

    #[test]
    fn test_acceptance_large_uphill_near_zero() {
        assert!(acceptance_probability(100.0, 1.0) < 1e-40);
    }

    #[test]
    fn test_single_iteration_at_floor() {
        let table = square();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let config = AnnealConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(100.0)
            .with_decay_rate(0.95);
        let annealer = Annealer::new(model, config).unwrap();

        let mut rng = create_rng(1);
        let mut grid = AssignmentGrid::new(4, &mut rng);
        let outcome = annealer
            .anneal(&mut grid, &mut rng, &mut NoopObserver, 1)
            .unwrap();

        assert_eq!(outcome.iterations, 1);
        assert!((outcome.final_temperature - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_ends_at_best_snapshot() {
        let table = square();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let config = AnnealConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.5)
            .with_decay_rate(0.99);
        let annealer = Annealer::new(model.clone(), config).unwrap();

        let mut rng = create_rng(42);
        let mut grid = AssignmentGrid::new(4, &mut rng);
        let mut lowest = model.consensus(&grid).unwrap();
        let mut observer = |e: &ProgressEvent| lowest = lowest.min(e.energy);
        let outcome = annealer
            .anneal(&mut grid, &mut rng, &mut observer, 1)
            .unwrap();

        assert!((outcome.best_energy - lowest).abs() < 1e-9);
        assert!((model.consensus(&grid).unwrap() - outcome.best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_best_energy_non_increasing() {
        let table = square();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let annealer = Annealer::new(
            model,
            AnnealConfig::default()
                .with_initial_temperature(20.0)
                .with_min_temperature(0.1)
                .with_decay_rate(0.98),
        )
        .unwrap();

        let mut rng = create_rng(9);
        let mut grid = AssignmentGrid::new(4, &mut rng);
        let mut history = Vec::new();
        let mut observer = |e: &ProgressEvent| history.push(e.best_energy);
        annealer
            .anneal(&mut grid, &mut rng, &mut observer, 1)
            .unwrap();

        assert!(!history.is_empty());
        for window in history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best energy should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_hot_pass_never_ends_above_start() {
        let table = square();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        // Hot enough that uphill flips are kept about half the time.
        let config = AnnealConfig::default()
            .with_initial_temperature(1000.0)
            .with_min_temperature(900.0)
            .with_decay_rate(0.99);
        let annealer = Annealer::new(model.clone(), config).unwrap();

        for seed in 0..20 {
            let mut grid = AssignmentGrid::from_permutation(&[0, 1, 2, 3]);
            let start = model.consensus(&grid).unwrap();
            let mut first_best = None;
            let mut observer = |e: &ProgressEvent| {
                first_best.get_or_insert(e.best_energy);
            };
            let outcome = annealer
                .anneal(&mut grid, &mut create_rng(seed), &mut observer, 1)
                .unwrap();

            assert!(first_best.is_some_and(|b| b <= start));
            assert!(outcome.best_energy <= start, "seed {seed}");
            assert!((model.consensus(&grid).unwrap() - outcome.best_energy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_incremental_mode_matches_full() {
        // Integer distances keep both energy paths exact.
        let table = DistanceTable::build(&raw(&[
            ("a", "b", 1.0),
            ("a", "c", 2.0),
            ("a", "d", 1.0),
            ("b", "c", 1.0),
            ("b", "d", 2.0),
            ("c", "d", 1.0),
        ]))
        .unwrap();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let config = AnnealConfig::default()
            .with_initial_temperature(30.0)
            .with_min_temperature(1.0)
            .with_decay_rate(0.97);

        let full = Annealer::new(model.clone(), config.clone()).unwrap();
        let incremental = Annealer::new(model, config)
            .unwrap()
            .with_energy_mode(EnergyMode::Incremental);

        let mut grid_a = AssignmentGrid::new(4, &mut create_rng(5));
        let mut grid_b = grid_a.clone();
        let a = full
            .anneal(&mut grid_a, &mut create_rng(6), &mut NoopObserver, 1)
            .unwrap();
        let b = incremental
            .anneal(&mut grid_b, &mut create_rng(6), &mut NoopObserver, 1)
            .unwrap();

        // Same RNG stream and same decisions as long as ΔE agrees.
        assert_eq!(grid_a, grid_b);
        assert!((a.best_energy - b.best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_before_start() {
        let table = square();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let annealer = Annealer::new(model, AnnealConfig::default())
            .unwrap()
            .with_cancel(Arc::new(AtomicBool::new(true)));

        let mut rng = create_rng(3);
        let mut grid = AssignmentGrid::new(4, &mut rng);
        let before = grid.clone();
        let outcome = annealer
            .anneal(&mut grid, &mut rng, &mut NoopObserver, 1)
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_missing_distance_aborts() {
        // a and c are never connected
        let table = DistanceTable::build(&raw(&[("a", "b", 1.0), ("b", "c", 1.0)])).unwrap();
        let model = EnergyModel::new(&table, 10.0, 5.0).unwrap();
        let annealer = Annealer::new(model, AnnealConfig::default()).unwrap();

        // a@0, c@1 is an adjacent pair with no distance
        let mut grid = AssignmentGrid::from_permutation(&[0, 2, 1]);
        let err = annealer
            .anneal(&mut grid, &mut create_rng(0), &mut NoopObserver, 1)
            .unwrap_err();
        assert_eq!(err.from, "a");
        assert_eq!(err.to, "c");
    }
}
