//! Validity-gated retry loop around the annealer.
//!
//! A pass whose best grid is not a valid tour is followed by another pass
//! with the same schedule, up to `max_attempts` passes in total. By default
//! the retry continues from the grid the previous pass left behind.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::config::SolverConfig;
use crate::anneal::{AnnealObserver, Annealer, NoopObserver, PassOutcome};
use crate::distance::{DistanceTable, RawDistances};
use crate::energy::EnergyModel;
use crate::error::Result;
use crate::grid::AssignmentGrid;
use crate::path::{extract_path, is_valid, Path, PathWarning};
use crate::random::rng_from_seed;

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourResult {
    /// Closed tour read from the final grid.
    pub path: Path,

    /// Length of `path`, `None` if a leg has no known distance.
    pub path_length: Option<f64>,

    /// Consensus of the final grid.
    pub final_energy: f64,

    /// Anneal passes executed.
    pub attempts_used: usize,

    /// Whether the final grid passed the validity check.
    pub converged: bool,

    /// Whether the cancel flag stopped the run.
    pub cancelled: bool,

    /// Problems encountered while reading `path` from the grid.
    pub warnings: Vec<PathWarning>,

    /// Final grid.
    pub grid: AssignmentGrid,

    /// Per-pass statistics, in order.
    pub passes: Vec<PassOutcome>,
}

/// Runs anneal passes until the grid is a valid tour or attempts run out.
pub struct TourSolver;

impl TourSolver {
    /// Builds the distance table from `raw` and runs the solver.
    pub fn solve(raw: &RawDistances, config: &SolverConfig) -> Result<TourResult> {
        let distances = DistanceTable::build(raw)?;
        Self::run(&distances, config)
    }

    /// Runs the solver without progress reporting or cancellation.
    pub fn run(distances: &DistanceTable, config: &SolverConfig) -> Result<TourResult> {
        Self::run_with(distances, config, &mut NoopObserver, None)
    }

    /// Runs the solver with a progress observer and an optional cancel flag.
    ///
    /// # Errors
    ///
    /// - [`BoltzmannError::Config`](crate::BoltzmannError::Config) if the
    ///   configuration is invalid.
    /// - [`BoltzmannError::Lookup`](crate::BoltzmannError::Lookup) if the
    ///   search needs a distance the table does not have.
    ///
    /// Failing to reach a valid grid is not an error: the result has
    /// `converged == false` and carries the extraction warnings. Neither is
    /// an unknown distance between consecutive tour cities, which leaves
    /// `path_length` empty and adds [`PathWarning::MissingDistance`].
    pub fn run_with<O>(
        distances: &DistanceTable,
        config: &SolverConfig,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TourResult>
    where
        O: AnnealObserver + ?Sized,
    {
        config.validate()?;

        let model = EnergyModel::new(distances, config.penalty, config.bonus)?;
        let mut annealer =
            Annealer::new(model, config.anneal.clone())?.with_energy_mode(config.energy_mode);
        if let Some(flag) = cancel {
            annealer = annealer.with_cancel(flag);
        }

        let mut rng = rng_from_seed(config.seed);
        let mut grid = AssignmentGrid::new(distances.len(), &mut rng);

        tracing::info!(
            cities = distances.len(),
            penalty = config.penalty,
            bonus = config.bonus,
            initial_temperature = config.anneal.initial_temperature,
            min_temperature = config.anneal.min_temperature,
            decay_rate = config.anneal.decay_rate,
            steps_per_pass = config.anneal.steps(),
            "solving"
        );

        let mut passes: Vec<PassOutcome> = Vec::with_capacity(config.max_attempts);
        let mut converged = false;
        let mut cancelled = false;

        for attempt in 1..=config.max_attempts {
            if attempt > 1 && config.reset_on_retry {
                grid.randomize(&mut rng);
            }

            let outcome = annealer.anneal(&mut grid, &mut rng, &mut *observer, attempt)?;
            cancelled = outcome.cancelled;
            passes.push(outcome);

            if is_valid(&grid) {
                converged = true;
                break;
            }
            if cancelled {
                break;
            }
            tracing::debug!(attempt, "best grid is not a valid tour");
        }

        let attempts_used = passes.len();
        let final_energy = annealer.model().consensus(&grid)?;

        tracing::debug!("final grid:\n{}", grid.render(distances.cities()));

        if !converged {
            tracing::warn!(
                attempts_used,
                "no valid tour found; try a different penalty, bonus or schedule"
            );
        }

        let mut extraction = extract_path(&grid, distances.cities());
        let length = extraction.measure(distances);
        for warning in &extraction.warnings {
            tracing::warn!(%warning, "path extraction");
        }

        tracing::info!(
            attempts_used,
            converged,
            final_energy,
            path_length = ?length,
            path = %extraction.path.join(" -> "),
            "solved"
        );

        Ok(TourResult {
            path: extraction.path,
            path_length: length,
            final_energy,
            attempts_used,
            converged,
            cancelled,
            warnings: extraction.warnings,
            grid,
            passes,
        })
    }
}
