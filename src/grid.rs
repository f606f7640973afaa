//! City × epoch assignment grid.
//!
//! Row `i` is a city, column `j` a tour position ("epoch"). A cell set to
//! `true` means the city is visited at that position. Nothing constrains
//! the grid during search; only the final grid is expected to be a
//! permutation matrix.

use std::fmt;

use rand::Rng;

/// Square boolean matrix, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentGrid {
    n: usize,
    cells: Vec<bool>,
}

impl AssignmentGrid {
    /// Creates an `n × n` grid of independent fair coin flips.
    pub fn new<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut grid = Self::empty(n);
        grid.randomize(rng);
        grid
    }

    /// Creates an all-false `n × n` grid.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            cells: vec![false; n * n],
        }
    }

    /// Builds a grid from explicit rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not form a square matrix.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let n = rows.len();
        assert!(
            rows.iter().all(|r| r.len() == n),
            "assignment grid must be square"
        );
        Self {
            n,
            cells: rows.iter().flatten().copied().collect(),
        }
    }

    /// Permutation grid: city `i` is visited at epoch `order[i]`.
    pub fn from_permutation(order: &[usize]) -> Self {
        let mut grid = Self::empty(order.len());
        for (city, &epoch) in order.iter().enumerate() {
            grid.set(city, epoch, true);
        }
        grid
    }

    /// Re-draws every cell uniformly at random.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = rng.random_bool(0.5);
        }
    }

    /// Side length (number of cities).
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        self.cells[i * self.n + j] = value;
    }

    /// Toggles a single cell.
    pub fn flip(&mut self, i: usize, j: usize) {
        let cell = &mut self.cells[i * self.n + j];
        *cell = !*cell;
    }

    /// Number of enabled cells.
    pub fn count_true(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Rows in city-index order.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        // `chunks(0)` panics, and an empty grid has no rows anyway.
        self.cells.chunks(self.n.max(1))
    }

    /// Every cell as `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.cells_from(0, 0)
    }

    /// Cells from `(start_row, start_col)` onward in row-major order.
    ///
    /// The first row is entered at `start_col`; later rows are full. Anchoring
    /// this at a cell visits exactly the cells that come at or after it.
    pub fn cells_from(
        &self,
        start_row: usize,
        start_col: usize,
    ) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let n = self.n;
        let start = (start_row * n + start_col).min(self.cells.len());
        self.cells[start..]
            .iter()
            .enumerate()
            .map(move |(k, &v)| {
                let idx = start + k;
                (idx / n, idx % n, v)
            })
    }

    /// Independent value copy of the grid.
    pub fn snapshot(&self) -> AssignmentGrid {
        self.clone()
    }

    /// Replaces this grid's contents with `snapshot`.
    pub fn restore(&mut self, snapshot: &AssignmentGrid) {
        self.n = snapshot.n;
        self.cells.clone_from(&snapshot.cells);
    }

    /// Renders the grid with city labels, one row per city.
    ///
    /// `labels` must have one entry per row.
    pub fn render(&self, labels: &[String]) -> String {
        let mut out = String::from("       ");
        let header: Vec<String> = (1..=self.n).map(|e| e.to_string()).collect();
        out.push_str(&header.join("   "));
        out.push('\n');
        for (label, row) in labels.iter().zip(self.rows()) {
            let short: String = label.chars().take(4).collect();
            let cells: Vec<&str> = row.iter().map(|&c| if c { "O" } else { "-" }).collect();
            out.push_str(&format!("{short:>4} | {} |\n", cells.join(" | ")));
        }
        out
    }
}

impl fmt::Display for AssignmentGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = (0..self.n).map(|i| i.to_string()).collect();
        f.write_str(&self.render(&labels))
    }
}
