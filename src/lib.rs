//! Travelling Salesman tours from an annealed Boltzmann machine.
//!
//! A tour over `N` cities is encoded as an `N × N` grid of binary cells,
//! row = city, column = tour position ("epoch"). A consensus function
//! penalizes a city appearing twice or two cities sharing an epoch,
//! charges the travel distance between consecutive epochs and rewards
//! every enabled cell. Annealing single-cell flips drives the grid
//! toward a low-energy permutation matrix, which is read back as a tour.
//!
//! - [`distance`]: symmetric completion of a partial distance dataset.
//! - [`grid`]: the city × epoch assignment grid.
//! - [`energy`]: pair weights and the consensus functional.
//! - [`anneal`]: one annealing pass with best-grid tracking.
//! - [`solver`]: validity-gated retries and the [`TourSolver`] entry point.
//! - [`path`]: validity check, tour extraction and tour length.
//!
//! # Examples
//!
//! ```
//! use boltzmann_tsp::anneal::AnnealConfig;
//! use boltzmann_tsp::distance::RawDistances;
//! use boltzmann_tsp::solver::{SolverConfig, TourSolver};
//!
//! let mut raw = RawDistances::new();
//! raw.entry("a".into()).or_default().insert("b".into(), 1.0);
//! raw.entry("b".into()).or_default().insert("c".into(), 2.0);
//! raw.entry("c".into()).or_default().insert("a".into(), 3.0);
//!
//! let config = SolverConfig::default()
//!     .with_penalty(100.0)
//!     .with_bonus(50.0)
//!     .with_anneal(
//!         AnnealConfig::default()
//!             .with_initial_temperature(50.0)
//!             .with_min_temperature(0.05)
//!             .with_decay_rate(0.99),
//!     )
//!     .with_seed(1);
//!
//! let result = TourSolver::solve(&raw, &config).unwrap();
//! println!("{} ({:?})", result.path.join(" -> "), result.path_length);
//! assert!(result.attempts_used >= 1);
//! ```

pub mod anneal;
pub mod distance;
pub mod energy;
pub mod error;
pub mod grid;
pub mod path;
pub mod random;
pub mod solver;

pub use error::{BoltzmannError, ConfigError, LookupError, Result};
pub use solver::{SolverConfig, TourResult, TourSolver};
