//! Axis-sliding wall collision and canvas clamping.

use crate::geometry::{Geometry, Vec2};
use crate::grid::Grid;

/// How a tentative move was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landing cell was free
    Clear,
    /// Horizontal component reverted (slid along a vertical wall)
    SlideX,
    /// Vertical component reverted (slid along a horizontal wall)
    SlideY,
    /// Neither single-axis revert was free; the move was undone
    Blocked,
    /// Started inside an obstacle; the move was let through
    Escaping,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Final position, clamped to the canvas
    pub position: Vec2,
    /// Velocity with blocked components zeroed
    pub velocity: Vec2,
    /// What happened
    pub contact: Contact,
}

fn blocked_at(obstacles: &Grid, geometry: &Geometry, position: &Vec2) -> bool {
    let (col, row) = geometry.position_to_cell(position);
    obstacles.is_blocked(col, row)
}

/// Resolves a move from `previous` to `tentative` against the fine obstacle grid.
///
/// When the landing cell is blocked, each axis revert is tested against the
/// original tentative position:
/// - reverting X alone frees the cell: keep Y, restore X, zero `velocity.x`
/// - otherwise reverting Y alone frees it: keep X, restore Y, zero `velocity.y`
/// - neither: restore `previous` and zero the whole velocity
///
/// X wins when both reverts are free (grazing a corner diagonally). An agent
/// whose `previous` position is itself blocked (the map was edited under it)
/// keeps its tentative position and velocity instead, so it can walk out.
/// The result is clamped to `[0, extent - 1]` in every case.
pub fn resolve(
    previous: Vec2,
    tentative: Vec2,
    velocity: Vec2,
    obstacles: &Grid,
    geometry: &Geometry,
) -> Resolution {
    let (position, velocity, contact) = if !blocked_at(obstacles, geometry, &tentative) {
        (tentative, velocity, Contact::Clear)
    } else {
        let revert_x = Vec2::new(previous.x, tentative.y);
        let revert_y = Vec2::new(tentative.x, previous.y);

        if !blocked_at(obstacles, geometry, &revert_x) {
            (revert_x, Vec2::new(0.0, velocity.y), Contact::SlideX)
        } else if !blocked_at(obstacles, geometry, &revert_y) {
            (revert_y, Vec2::new(velocity.x, 0.0), Contact::SlideY)
        } else if blocked_at(obstacles, geometry, &previous) {
            (tentative, velocity, Contact::Escaping)
        } else {
            (previous, Vec2::zeros(), Contact::Blocked)
        }
    };

    Resolution {
        position: geometry.clamp_to_canvas(position),
        velocity,
        contact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BLOCKED;
    use proptest::prelude::*;

    fn grid_with(cells: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::free_square(50);
        for &(col, row) in cells {
            grid.set(col, row, BLOCKED);
        }
        grid
    }

    #[test]
    fn test_free_move_passes_through() {
        let geometry = Geometry::default();
        let grid = Grid::free_square(50);
        let res = resolve(
            Vec2::new(100.0, 100.0),
            Vec2::new(105.0, 103.0),
            Vec2::new(5.0, 3.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::Clear);
        assert_eq!(res.position, Vec2::new(105.0, 103.0));
        assert_eq!(res.velocity, Vec2::new(5.0, 3.0));
    }

    #[test]
    fn test_head_on_loses_only_x() {
        let geometry = Geometry::default();
        let grid = grid_with(&[(11, 10)]);
        let res = resolve(
            Vec2::new(105.0, 105.0),
            Vec2::new(112.0, 105.0),
            Vec2::new(7.0, 0.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::SlideX);
        assert_eq!(res.position, Vec2::new(105.0, 105.0));
        assert_eq!(res.velocity, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_diagonal_slides_along_vertical_wall() {
        let geometry = Geometry::default();
        // Column 11 is a wall spanning rows 9..=11
        let grid = grid_with(&[(11, 9), (11, 10), (11, 11)]);
        let res = resolve(
            Vec2::new(108.0, 105.0),
            Vec2::new(112.0, 108.0),
            Vec2::new(4.0, 3.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::SlideX);
        assert_eq!(res.position, Vec2::new(108.0, 108.0));
        assert_eq!(res.velocity, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_diagonal_slides_along_horizontal_wall() {
        let geometry = Geometry::default();
        // Row 11 is a wall spanning columns 9..=12
        let grid = grid_with(&[(9, 11), (10, 11), (11, 11), (12, 11)]);
        let res = resolve(
            Vec2::new(105.0, 108.0),
            Vec2::new(108.0, 112.0),
            Vec2::new(3.0, 4.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::SlideY);
        assert_eq!(res.position, Vec2::new(108.0, 108.0));
        assert_eq!(res.velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_inside_corner_blocks_both_axes() {
        let geometry = Geometry::default();
        // L-shaped corner around (11, 11)
        let grid = grid_with(&[(11, 10), (11, 11), (10, 11)]);
        let res = resolve(
            Vec2::new(108.0, 108.0),
            Vec2::new(112.0, 112.0),
            Vec2::new(4.0, 4.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::Blocked);
        assert_eq!(res.position, Vec2::new(108.0, 108.0));
        assert_eq!(res.velocity, Vec2::zeros());
    }

    #[test]
    fn test_clamped_to_canvas() {
        let geometry = Geometry::default();
        let grid = Grid::free_square(50);
        let res = resolve(
            Vec2::new(497.0, 2.0),
            Vec2::new(503.0, -4.0),
            Vec2::new(6.0, -6.0),
            &grid,
            &geometry,
        );
        assert_eq!(res.contact, Contact::Clear);
        assert_eq!(res.position, Vec2::new(499.0, 0.0));
    }

    #[test]
    fn test_agent_inside_obstacle_walks_out() {
        let geometry = Geometry::default();
        // 2x2 block covering x, y in [100, 120)
        let grid = grid_with(&[(10, 10), (11, 10), (10, 11), (11, 11)]);
        let velocity = Vec2::new(2.0, 0.0);

        let res = resolve(Vec2::new(105.0, 105.0), Vec2::new(107.0, 105.0), velocity, &grid, &geometry);
        assert_eq!(res.contact, Contact::Escaping);
        assert_eq!(res.position, Vec2::new(107.0, 105.0));
        assert_eq!(res.velocity, velocity);

        let mut position = Vec2::new(105.0, 105.0);
        for _ in 0..8 {
            position = resolve(position, position + velocity, velocity, &grid, &geometry).position;
        }
        let (col, row) = geometry.position_to_cell(&position);
        assert!(!grid.is_blocked(col, row));
        assert_eq!(position, Vec2::new(121.0, 105.0));
    }

    proptest! {
        #[test]
        fn prop_never_lands_on_obstacle(
            blocked in proptest::collection::vec((0usize..50, 0usize..50), 0..400),
            px in 0.0f64..500.0,
            py in 0.0f64..500.0,
            vx in -25.0f64..25.0,
            vy in -25.0f64..25.0,
        ) {
            let geometry = Geometry::default();
            let mut grid = grid_with(&blocked);
            let previous = Vec2::new(px, py);
            let (pc, pr) = geometry.position_to_cell(&previous);
            grid.set(pc, pr, 0);

            let velocity = Vec2::new(vx, vy);
            let res = resolve(previous, previous + velocity, velocity, &grid, &geometry);
            let (col, row) = geometry.position_to_cell(&res.position);
            prop_assert!(!grid.is_blocked(col, row));
            prop_assert!(res.position.x >= 0.0 && res.position.x <= 499.0);
            prop_assert!(res.position.y >= 0.0 && res.position.y <= 499.0);
        }
    }
}
