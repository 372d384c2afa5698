//! Visited-cell tracking on the fine grid.

use crate::geometry::{Geometry, Vec2};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Visited-cell matrix, same shape as the fine obstacle grid.
///
/// Values are counts but the marking policy is binary: a marked cell holds 1
/// no matter how often it is marked. Within a run the matrix only grows
/// until [`Heatmap::clear`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl Heatmap {
    /// Creates an all-unvisited heatmap.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Creates an all-unvisited heatmap covering the geometry's fine grid.
    pub fn for_geometry(geometry: &Geometry) -> Self {
        Self::new(geometry.grid_size, geometry.grid_size)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(col, row)`, or `None` outside the matrix.
    pub fn get(&self, col: usize, row: usize) -> Option<u32> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Value at signed coordinates; negative indices are outside.
    pub fn get_signed(&self, col: i64, row: i64) -> Option<u32> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.get(col, row)
    }

    /// True only when the cell exists and has never been visited.
    pub fn is_unvisited(&self, col: usize, row: usize) -> bool {
        self.get(col, row) == Some(0)
    }

    /// Marks a single cell visited. Out-of-range writes are ignored.
    pub fn visit(&mut self, col: usize, row: usize) {
        if col < self.cols && row < self.rows {
            let cell = &mut self.cells[row * self.cols + col];
            *cell = (*cell).max(1);
        }
    }

    /// Returns a copy with the disc of `radius` cells around `position` visited.
    ///
    /// The disc is centred on the cell containing `position`; a cell is in
    /// the disc when its Euclidean distance from the centre cell, in cell
    /// units, is at most `radius`. `self` is left untouched.
    pub fn mark(&self, geometry: &Geometry, position: &Vec2, radius: u32) -> Heatmap {
        let mut marked = self.clone();
        marked.mark_in_place(geometry, position, radius);
        marked
    }

    /// In-place form of [`Heatmap::mark`] for owners of the matrix.
    ///
    /// Returns the number of cells that went from unvisited to visited.
    pub fn mark_in_place(&mut self, geometry: &Geometry, position: &Vec2, radius: u32) -> usize {
        let (cx, cy) = geometry.position_to_cell(position);
        let r = i64::from(radius);
        let mut newly_visited = 0;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let col = cx as i64 + dx;
                let row = cy as i64 + dy;
                if self.get_signed(col, row) == Some(0) {
                    newly_visited += 1;
                }
                if col >= 0 && row >= 0 {
                    self.visit(col as usize, row as usize);
                }
            }
        }

        newly_visited
    }

    /// Returns an all-unvisited heatmap of the same shape.
    pub fn clear(&self) -> Heatmap {
        Self::new(self.rows, self.cols)
    }

    /// Number of visited cells.
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Fraction of free obstacle cells that have been visited.
    ///
    /// Cells outside `obstacles` count as free.
    pub fn coverage(&self, obstacles: &Grid) -> f64 {
        let mut free = 0usize;
        let mut visited = 0usize;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if obstacles.is_blocked(col, row) {
                    continue;
                }
                free += 1;
                if !self.is_unvisited(col, row) {
                    visited += 1;
                }
            }
        }
        if free == 0 {
            0.0
        } else {
            visited as f64 / free as f64
        }
    }

    /// True when every cell of `self` is at least its value in `earlier`.
    pub fn dominates(&self, earlier: &Heatmap) -> bool {
        self.rows == earlier.rows
            && self.cols == earlier.cols
            && self.cells.iter().zip(&earlier.cells).all(|(now, then)| now >= then)
    }

    /// Binary rows (`1` = visited) for the map interchange format.
    pub fn to_binary_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|&c| u8::from(c > 0)).collect())
            .collect()
    }
}
