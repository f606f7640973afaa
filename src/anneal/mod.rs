//! Boltzmann-machine annealing.
//!
//! A single pass flips one random cell at a time, judges the flip with a
//! logistic acceptance rule at the current temperature and cools
//! geometrically. The grid left behind is the lowest-energy grid seen.
//!
//! # References
//!
//! - Aarts & Korst (1989), "Simulated Annealing and Boltzmann Machines"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::AnnealConfig;
pub use runner::{acceptance_probability, Annealer, PassOutcome};
pub use types::{AnnealObserver, NoopObserver, ProgressEvent};
