//! Symmetric inter-city distance lookup.
//!
//! The input may list each pair in one direction only (a triangular
//! matrix). [`DistanceTable::build`] mirrors the missing direction and
//! assigns every city a dense index in sorted-label order; that index is
//! the grid row used everywhere else.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ConfigError, LookupError};

/// Raw distance dataset: `from -> to -> distance`, possibly one-directional.
pub type RawDistances = BTreeMap<String, BTreeMap<String, f64>>;

/// Completed, immutable distance table indexed by dense city index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceTable {
    cities: Vec<String>,
    /// Row-major `n * n`; `None` where the pair was absent in both directions.
    distances: Vec<Option<f64>>,
}

impl DistanceTable {
    /// Builds a table from a raw dataset, completing missing directions.
    ///
    /// The city set is the set of outer keys. Inner keys must name one of
    /// those cities. Pairs absent in both directions stay absent; looking
    /// them up later yields a [`LookupError`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyCitySet`] if there are no outer keys.
    /// - [`ConfigError::InvalidDistance`] for negative or non-finite values.
    /// - [`ConfigError::UnknownCity`] for an inner key that is not a city.
    /// - [`ConfigError::AsymmetricDistance`] if both directions are given
    ///   and disagree.
    pub fn build(raw: &RawDistances) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyCitySet);
        }

        // BTreeMap iteration is already sorted by label.
        let cities: Vec<String> = raw.keys().cloned().collect();
        let n = cities.len();
        let index: HashMap<&str, usize> = cities
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut distances = vec![None; n * n];
        for (from, row) in raw {
            let i = index[from.as_str()];
            for (to, &value) in row {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidDistance {
                        from: from.clone(),
                        to: to.clone(),
                        value,
                    });
                }
                let j = *index.get(to.as_str()).ok_or_else(|| ConfigError::UnknownCity {
                    from: from.clone(),
                    to: to.clone(),
                })?;
                distances[i * n + j] = Some(value);
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                match (distances[i * n + j], distances[j * n + i]) {
                    (Some(d), None) => distances[j * n + i] = Some(d),
                    (None, Some(d)) => distances[i * n + j] = Some(d),
                    (Some(forward), Some(backward)) if forward != backward => {
                        return Err(ConfigError::AsymmetricDistance {
                            a: cities[i].clone(),
                            b: cities[j].clone(),
                            forward,
                            backward,
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(Self { cities, distances })
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Cities in index order (sorted by label).
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Label of the city at `index`.
    pub fn city(&self, index: usize) -> &str {
        &self.cities[index]
    }

    /// Dense index of a city label.
    pub fn index_of(&self, city: &str) -> Option<usize> {
        self.cities.binary_search_by(|c| c.as_str().cmp(city)).ok()
    }

    /// Raw entry for `(from, to)`, `None` if unknown.
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.distances[from * self.len() + to]
    }

    /// Distance between two cities by index.
    ///
    /// A city's distance to itself is `0` unless the dataset says otherwise.
    pub fn lookup(&self, from: usize, to: usize) -> Result<f64, LookupError> {
        match self.get(from, to) {
            Some(d) => Ok(d),
            None if from == to => Ok(0.0),
            None => Err(LookupError {
                from: self.cities[from].clone(),
                to: self.cities[to].clone(),
            }),
        }
    }

    /// Distance between two cities by label.
    pub fn distance(&self, from: &str, to: &str) -> Result<f64, LookupError> {
        let missing = || LookupError {
            from: from.to_string(),
            to: to.to_string(),
        };
        let i = self.index_of(from).ok_or_else(missing)?;
        let j = self.index_of(to).ok_or_else(missing)?;
        self.lookup(i, j)
    }
}
