//! Grid validity and tour extraction.
//!
//! [`is_valid`] only checks the enabled-cell count and that every row is
//! used; it does not check that each column is used exactly once. A grid
//! that passes may still put two cities on the same epoch, in which case
//! [`extract_path`] keeps only one of them and reports a
//! [`PathWarning::DroppedCity`].
//!
//! Skipped epochs and the closing edge can pair cities the energy never
//! weighed, so measuring a tour may hit a distance the dataset lacks.
//! [`PathExtraction::measure`] reports that as
//! [`PathWarning::MissingDistance`] instead of failing.

use std::collections::BTreeMap;
use std::fmt;

use crate::distance::DistanceTable;
use crate::error::LookupError;
use crate::grid::AssignmentGrid;

/// Closed tour: first city repeated at the end.
pub type Path = Vec<String>;

/// Irregularities found while reading a tour out of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathWarning {
    /// The city's row has no enabled cell; it is left out of the tour.
    UnassignedCity { city: String },
    /// The city's row has several enabled cells; only the first is used.
    MultipleEpochs {
        city: String,
        used: usize,
        ignored: Vec<usize>,
    },
    /// Two cities share an epoch; `dropped` loses to `kept`.
    DroppedCity {
        dropped: String,
        kept: String,
        epoch: usize,
    },
    /// No city was assigned to this epoch.
    EmptyEpoch { epoch: usize },
    /// Consecutive tour cities with no known distance; the tour has no length.
    MissingDistance { from: String, to: String },
}

impl fmt::Display for PathWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathWarning::UnassignedCity { city } => {
                write!(f, "city {city} is not assigned to any epoch")
            }
            PathWarning::MultipleEpochs { city, used, ignored } => write!(
                f,
                "city {city} enabled at several epochs; using {used}, ignoring {ignored:?}"
            ),
            PathWarning::DroppedCity {
                dropped,
                kept,
                epoch,
            } => write!(f, "cities {dropped} and {kept} share epoch {epoch}; dropped {dropped}"),
            PathWarning::EmptyEpoch { epoch } => write!(f, "no city assigned to epoch {epoch}"),
            PathWarning::MissingDistance { from, to } => {
                write!(f, "no distance known between {from} and {to}; tour length unknown")
            }
        }
    }
}

/// Tour read out of a grid, plus anything that went wrong reading it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathExtraction {
    pub path: Path,
    pub warnings: Vec<PathWarning>,
}

impl PathExtraction {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Length of the tour, or `None` with a
    /// [`PathWarning::MissingDistance`] recorded if a leg is unknown.
    pub fn measure(&mut self, distances: &DistanceTable) -> Option<f64> {
        match path_length(&self.path, distances) {
            Ok(length) => Some(length),
            Err(LookupError { from, to }) => {
                self.warnings.push(PathWarning::MissingDistance { from, to });
                None
            }
        }
    }
}

/// Whether `grid` has exactly `N` enabled cells and every row has one.
pub fn is_valid(grid: &AssignmentGrid) -> bool {
    grid.count_true() == grid.dim() && grid.rows().all(|row| row.contains(&true))
}

/// Reads the tour out of `grid`; `cities[i]` labels row `i`.
///
/// Each city is placed at the first enabled epoch in its row. When several
/// cities share an epoch the one with the highest row index is kept. For a
/// permutation grid the path has `N + 1` entries and no warnings.
pub fn extract_path(grid: &AssignmentGrid, cities: &[String]) -> PathExtraction {
    let mut warnings = Vec::new();
    let mut by_epoch: BTreeMap<usize, usize> = BTreeMap::new();

    for (city, row) in grid.rows().enumerate() {
        let mut enabled = row.iter().enumerate().filter(|&(_, &on)| on).map(|(e, _)| e);
        let Some(epoch) = enabled.next() else {
            warnings.push(PathWarning::UnassignedCity {
                city: cities[city].clone(),
            });
            continue;
        };
        let ignored: Vec<usize> = enabled.collect();
        if !ignored.is_empty() {
            warnings.push(PathWarning::MultipleEpochs {
                city: cities[city].clone(),
                used: epoch,
                ignored,
            });
        }
        if let Some(previous) = by_epoch.insert(epoch, city) {
            warnings.push(PathWarning::DroppedCity {
                dropped: cities[previous].clone(),
                kept: cities[city].clone(),
                epoch,
            });
        }
    }

    for epoch in 0..grid.dim() {
        if !by_epoch.contains_key(&epoch) {
            warnings.push(PathWarning::EmptyEpoch { epoch });
        }
    }

    let mut path: Path = by_epoch.values().map(|&c| cities[c].clone()).collect();
    if let Some(first) = path.first().cloned() {
        path.push(first);
    }

    PathExtraction { path, warnings }
}

/// Sum of consecutive distances along `path`.
pub fn path_length(path: &[String], distances: &DistanceTable) -> Result<f64, LookupError> {
    path.windows(2)
        .map(|pair| distances.distance(&pair[0], &pair[1]))
        .sum()
}
