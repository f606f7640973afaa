//! Solver configuration.

use crate::anneal::AnnealConfig;
use crate::energy::EnergyMode;
use crate::error::ConfigError;

/// Configuration for [`TourSolver`](super::TourSolver).
///
/// # Examples
///
/// ```
/// use boltzmann_tsp::anneal::AnnealConfig;
/// use boltzmann_tsp::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_penalty(800.0)
///     .with_bonus(400.0)
///     .with_anneal(AnnealConfig::default().with_decay_rate(0.995))
///     .with_max_attempts(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Weight of a constraint violation (city twice, or epoch shared).
    pub penalty: f64,

    /// Reward per enabled cell. Must be below `penalty`.
    pub bonus: f64,

    /// Temperature schedule of each anneal pass.
    pub anneal: AnnealConfig,

    /// Total anneal passes allowed before giving up on a valid grid.
    pub max_attempts: usize,

    /// Re-randomize the grid before each retry instead of continuing
    /// from the previous pass's best grid.
    pub reset_on_retry: bool,

    /// How flip energy changes are computed.
    pub energy_mode: EnergyMode,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            penalty: 1000.0,
            bonus: 500.0,
            anneal: AnnealConfig::default(),
            max_attempts: 10,
            reset_on_retry: false,
            energy_mode: EnergyMode::Full,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_bonus(mut self, bonus: f64) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn with_reset_on_retry(mut self, reset: bool) -> Self {
        self.reset_on_retry = reset;
        self
    }

    pub fn with_energy_mode(mut self, mode: EnergyMode) -> Self {
        self.energy_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.penalty > self.bonus) {
            return Err(ConfigError::PenaltyNotAboveBonus {
                penalty: self.penalty,
                bonus: self.bonus,
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        self.anneal.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_attempts, 10);
        assert!(!config.reset_on_retry);
        assert_eq!(config.energy_mode, EnergyMode::Full);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_penalty_not_above_bonus() {
        let config = SolverConfig::default().with_penalty(10.0).with_bonus(10.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PenaltyNotAboveBonus {
                penalty: 10.0,
                bonus: 10.0
            })
        );
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = SolverConfig::default().with_max_attempts(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
    }

    #[test]
    fn test_validate_bad_schedule() {
        let config =
            SolverConfig::default().with_anneal(AnnealConfig::default().with_decay_rate(2.0));
        assert!(matches!(config.validate(), Err(ConfigError::Schedule(_))));
    }
}
