//! Error taxonomy.
//!
//! Configuration problems are rejected before any search starts. Missing
//! distances surface while the energy is being evaluated. Numeric overflow
//! in the acceptance rule and failure to converge are not errors at all:
//! the former rejects the move, the latter is reported on
//! [`TourResult`](crate::solver::TourResult).

/// Invalid dataset or parameters, detected at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("penalty ({penalty}) must be greater than bonus ({bonus})")]
    PenaltyNotAboveBonus { penalty: f64, bonus: f64 },

    #[error("distance dataset contains no cities")]
    EmptyCitySet,

    #[error("distance {from} -> {to} is {value}, expected a finite non-negative number")]
    InvalidDistance { from: String, to: String, value: f64 },

    #[error("distance {from} -> {to} refers to unknown city {to:?}")]
    UnknownCity { from: String, to: String },

    #[error("distance {a} <-> {b} disagrees between directions ({forward} vs {backward})")]
    AsymmetricDistance {
        a: String,
        b: String,
        forward: f64,
        backward: f64,
    },

    #[error("invalid annealing schedule: {0}")]
    Schedule(String),

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// A distance needed by the energy function or the path length is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no distance known between {from} and {to}")]
pub struct LookupError {
    pub from: String,
    pub to: String,
}

/// Hard failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoltzmannError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type Result<T> = std::result::Result<T, BoltzmannError>;
