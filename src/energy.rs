//! Consensus (energy) of an assignment grid.
//!
//! Every pair of enabled cells interacts through [`EnergyModel::weight`]:
//! constraint violations cost `penalty`, forward-adjacent epochs cost the
//! travel distance. Every enabled cell earns `bonus`. Lower is better.
//!
//! Each unordered pair is scored once, from the cell that comes first in
//! row-major order (see [`AssignmentGrid::cells_from`]). A forward-adjacent
//! pair whose later-epoch city has the lower row index therefore adds no
//! distance, and the consensus only partly reflects tour length.

use crate::distance::DistanceTable;
use crate::error::{ConfigError, LookupError};
use crate::grid::AssignmentGrid;

/// How the annealer obtains the energy change of a proposed flip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnergyMode {
    /// Recompute the whole consensus after every flip. O(N⁴) per step.
    #[default]
    Full,
    /// Score only the pairs involving the flipped cell. O(N²) per step.
    Incremental,
}

/// Energy function parameterized by a distance table.
#[derive(Debug, Clone)]
pub struct EnergyModel<'a> {
    distances: &'a DistanceTable,
    penalty: f64,
    bonus: f64,
}

impl<'a> EnergyModel<'a> {
    /// Creates a model.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PenaltyNotAboveBonus`] unless `penalty > bonus`;
    /// without that gap nothing pushes the grid toward a permutation.
    pub fn new(
        distances: &'a DistanceTable,
        penalty: f64,
        bonus: f64,
    ) -> Result<Self, ConfigError> {
        if !(penalty > bonus) {
            return Err(ConfigError::PenaltyNotAboveBonus { penalty, bonus });
        }
        Ok(Self {
            distances,
            penalty,
            bonus,
        })
    }

    pub fn distances(&self) -> &'a DistanceTable {
        self.distances
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    /// Interaction weight between cell `(city_a, epoch_a)` and `(city_b, epoch_b)`.
    ///
    /// Only the forward-adjacent direction carries a distance, so the
    /// result is not symmetric in its two cells.
    pub fn weight(
        &self,
        city_a: usize,
        epoch_a: usize,
        city_b: usize,
        epoch_b: usize,
    ) -> Result<f64, LookupError> {
        if city_a == city_b {
            Ok(if epoch_a != epoch_b { self.penalty } else { 0.0 })
        } else if epoch_a == epoch_b {
            Ok(self.penalty)
        } else if epoch_b == epoch_a + 1 {
            self.distances.lookup(city_a, city_b)
        } else {
            Ok(0.0)
        }
    }

    /// Full consensus of `grid`.
    pub fn consensus(&self, grid: &AssignmentGrid) -> Result<f64, LookupError> {
        let mut weight_term = 0.0;
        let mut enabled = 0usize;
        for (city_a, epoch_a, on) in grid.cells() {
            if !on {
                continue;
            }
            enabled += 1;
            for (city_b, epoch_b, other) in grid.cells_from(city_a, epoch_a) {
                if other {
                    weight_term += self.weight(city_a, epoch_a, city_b, epoch_b)?;
                }
            }
        }
        Ok(weight_term - self.bonus * enabled as f64)
    }

    /// Change in consensus that flipping `(city, epoch)` would cause.
    ///
    /// Evaluated on the grid *before* the flip. Agrees with the difference
    /// of two [`consensus`](Self::consensus) calls up to rounding.
    pub fn flip_delta(
        &self,
        grid: &AssignmentGrid,
        city: usize,
        epoch: usize,
    ) -> Result<f64, LookupError> {
        let sign = if grid.get(city, epoch) { -1.0 } else { 1.0 };
        let anchor = (city, epoch);

        let mut weight_sum = 0.0;
        for (other_city, other_epoch, on) in grid.cells() {
            if !on || (other_city, other_epoch) == anchor {
                continue;
            }
            // Score the pair in the direction the full scan would.
            weight_sum += if (other_city, other_epoch) < anchor {
                self.weight(other_city, other_epoch, city, epoch)?
            } else {
                self.weight(city, epoch, other_city, other_epoch)?
            };
        }
        Ok(sign * (weight_sum - self.bonus))
    }
}
