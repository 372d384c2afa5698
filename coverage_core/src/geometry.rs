//! Pixel/cell geometry shared by every component.
//!
//! Agents live in continuous pixel space; sensing, collision and coverage
//! all happen on the fine grid. `Geometry` owns the conversion between the two.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D vector used for positions, velocities and displacements (pixels).
pub type Vec2 = Vector2<f64>;

/// Canvas extent per axis in pixels.
pub const CANVAS_SIZE: f64 = 500.0;

/// Side of one fine cell in pixels (one drone footprint).
pub const CELL_SIZE: f64 = 10.0;

/// Fine grid cells per axis.
pub const FINE_GRID_SIZE: usize = 50;

/// Coarse (editable) map cells per axis.
pub const MAP_GRID_SIZE: usize = FINE_GRID_SIZE / 2;

/// Fine-grid geometry of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Cell side in pixels
    pub cell_size: f64,

    /// Cells per axis on the fine grid
    pub grid_size: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            grid_size: FINE_GRID_SIZE,
        }
    }
}

impl Geometry {
    /// Canvas extent in pixels (`cell_size * grid_size`).
    pub fn canvas_extent(&self) -> f64 {
        self.cell_size * self.grid_size as f64
    }

    /// Expected coarse map dimension for this fine grid.
    pub fn map_grid_size(&self) -> usize {
        self.grid_size / 2
    }

    /// Canvas centre in pixels.
    pub fn center(&self) -> Vec2 {
        let half = self.canvas_extent() / 2.0;
        Vec2::new(half, half)
    }

    /// Returns the `(col, row)` of the fine cell containing `position`.
    ///
    /// Positions outside the canvas are clamped onto the border cells, so the
    /// result is always a valid index.
    pub fn position_to_cell(&self, position: &Vec2) -> (usize, usize) {
        let max = self.grid_size.saturating_sub(1) as f64;
        let col = (position.x / self.cell_size).clamp(0.0, max).trunc();
        let row = (position.y / self.cell_size).clamp(0.0, max).trunc();
        // NaN casts to 0
        (col as usize, row as usize)
    }

    /// Pixel centre of the cell at `(col, row)`.
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            (col as f64 + 0.5) * self.cell_size,
            (row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Clamps a position to `[0, extent - 1]` on both axes.
    pub fn clamp_to_canvas(&self, position: Vec2) -> Vec2 {
        let max = self.canvas_extent() - 1.0;
        Vec2::new(position.x.clamp(0.0, max), position.y.clamp(0.0, max))
    }
}
