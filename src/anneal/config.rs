//! Temperature schedule for a single anneal pass.

use crate::error::ConfigError;

/// Geometric cooling schedule: `T_{k+1} = decay_rate * T_k`.
///
/// One proposal is made per temperature step and the pass runs while
/// `T >= min_temperature`.
///
/// # Examples
///
/// ```
/// use boltzmann_tsp::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(500.0)
///     .with_min_temperature(50.0)
///     .with_decay_rate(0.99);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Starting temperature. Higher values accept more uphill flips.
    pub initial_temperature: f64,

    /// The pass stops once the temperature falls below this floor.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub decay_rate: f64,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 100.0,
            decay_rate: 0.999,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_decay_rate(mut self, r: f64) -> Self {
        self.decay_rate = r;
        self
    }

    /// Number of proposals a pass with this schedule makes, 0 if invalid.
    pub fn steps(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut temperature = self.initial_temperature;
        let mut steps = 0;
        while temperature >= self.min_temperature {
            temperature *= self.decay_rate;
            steps += 1;
        }
        steps
    }

    /// Validates the schedule.
    ///
    /// `min_temperature == initial_temperature` is allowed and yields a
    /// single-step pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0) || !self.initial_temperature.is_finite() {
            return Err(ConfigError::Schedule(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature > 0.0) {
            return Err(ConfigError::Schedule(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature > self.initial_temperature {
            return Err(ConfigError::Schedule(
                "min_temperature must not exceed initial_temperature".into(),
            ));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate < 1.0) {
            return Err(ConfigError::Schedule(format!(
                "decay_rate must be in (0, 1), got {}",
                self.decay_rate
            )));
        }
        Ok(())
    }
}
