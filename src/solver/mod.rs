//! Tour solver: the retry controller and the crate's main entry point.

mod config;
mod runner;

pub use config::SolverConfig;
pub use runner::{TourResult, TourSolver};
