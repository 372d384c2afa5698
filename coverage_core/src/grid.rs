//! Obstacle grids.
//!
//! The editable map is coarse (one cell per 2x2 block of the movement grid).
//! The engine only ever reads the fine grid produced by [`Grid::upsample`].

use crate::error::{CoverageError, Result};
use serde::{Deserialize, Serialize};

/// Free cell value.
pub const FREE: u8 = 0;

/// Blocked cell value.
pub const BLOCKED: u8 = 1;

/// Row-major binary obstacle matrix (`0` = free, `1` = blocked).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates an all-free grid.
    pub fn free(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![FREE; rows * cols],
        }
    }

    /// Creates an all-free square grid.
    pub fn free_square(size: usize) -> Self {
        Self::free(size, size)
    }

    /// Builds a grid from nested rows.
    ///
    /// Rejects empty input, ragged rows and any value outside `{0, 1}`.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(CoverageError::EmptyMap);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CoverageError::RaggedRow {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if value > BLOCKED {
                    return Err(CoverageError::invalid_cell(r, c, value));
                }
                cells.push(value);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Returns the grid as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.cols.max(1)).map(<[u8]>::to_vec).collect()
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when rows == cols.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Cell value at `(col, row)`, or `None` outside the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Cell value at signed coordinates; negative indices are outside.
    pub fn get_signed(&self, col: i64, row: i64) -> Option<u8> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.get(col, row)
    }

    /// Sets a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, col: usize, row: usize, value: u8) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = value.min(BLOCKED);
        }
    }

    /// True only when the cell exists and is blocked.
    ///
    /// Missing cells read as "not obstacle".
    pub fn is_blocked(&self, col: usize, row: usize) -> bool {
        self.get(col, row) == Some(BLOCKED)
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == FREE).count()
    }

    /// Doubles both dimensions, replicating each cell into a 2x2 block.
    pub fn upsample(&self) -> Grid {
        let cols = self.cols * 2;
        let rows = self.rows * 2;
        let mut cells = Vec::with_capacity(rows * cols);

        for row in self.cells.chunks(self.cols.max(1)) {
            let doubled: Vec<u8> = row.iter().flat_map(|&c| [c, c]).collect();
            cells.extend_from_slice(&doubled);
            cells.extend_from_slice(&doubled);
        }

        Grid { rows, cols, cells }
    }
}
