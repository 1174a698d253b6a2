//! Bounds-safe access to a 2-D string grid.
//!
//! Every positional heuristic in the extractors goes through [`Grid::cell`],
//! so "missing cell" and "empty cell" are indistinguishable by design:
//! ragged rows behave exactly as if padded with empty strings.

use serde::{Deserialize, Serialize};

/// A row-major, 0-indexed grid of text cells.
///
/// Rows may be ragged (different lengths). The grid carries no extraction
/// logic of its own; it only answers trimmed cell reads that never fail.
///
/// ## Example
///
/// ```
/// use labmark::grid::Grid;
///
/// let grid = Grid::from_rows(vec![
///     vec!["Purpose".to_string(), String::new(), " LOD check ".to_string()],
/// ]);
/// assert_eq!(grid.cell(0, 2), "LOD check");
/// assert_eq!(grid.cell(0, 99), "");
/// assert_eq!(grid.cell(99, 0), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create a grid from row-major cell values.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the trimmed value of a cell, or `""` when `row`/`col` is outside
    /// the grid's bounds or the row is shorter than `col`. Never panics.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", |v| v.trim())
    }

    /// Raw cells of one row, or an empty slice when `row` is out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map_or(&[], Vec::as_slice)
    }

    /// Non-blank cells of a row joined with spaces and uppercased.
    ///
    /// Used by anchor checks that look for a marker anywhere in a row
    /// (e.g. `TRIAL` / `RUN ID` on the Ct table header).
    #[must_use]
    pub fn row_text_upper(&self, row: usize) -> String {
        self.row(row)
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }
}

impl From<Vec<Vec<String>>> for Grid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::from_rows(rows)
    }
}
