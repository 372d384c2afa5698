//! Greedy coverage: head for the nearest unvisited free cell.

use super::{advance, MovementStrategy, StepOutcome, World};
use crate::avoidance::avoid;
use crate::geometry::{Geometry, Vec2};
use crate::grid::Grid;
use crate::heatmap::Heatmap;
use crate::params::GreedyCoverageParams;
use rand::{Rng, RngCore};

/// Chance per tick of a random velocity nudge while exploring.
pub const EXPLORE_IMPULSE_PROB: f64 = 0.05;

/// Velocity decay per tick while exploring.
pub const EXPLORE_DAMPING: f64 = 0.9;

/// Targets closer than this are treated as reached.
const ARRIVED: f64 = 1e-6;

/// Finds the centre of the nearest unvisited, unobstructed cell.
///
/// Scans square rings of growing Chebyshev radius around the cell containing
/// `position`, up to `ceil(max_radius / cell_size)` rings (the whole grid
/// when `max_radius` is `None`). Candidates are ranked by Euclidean pixel
/// distance to their centre and must lie within `max_radius`; the first ring
/// that yields any candidate ends the search.
pub fn nearest_unvisited(
    position: &Vec2,
    heatmap: &Heatmap,
    obstacles: &Grid,
    geometry: &Geometry,
    max_radius: Option<f64>,
) -> Option<Vec2> {
    let rows = heatmap.rows();
    let cols = heatmap.cols();
    if rows == 0 || cols == 0 {
        return None;
    }

    let (cx, cy) = geometry.position_to_cell(position);
    // Rings past the grid edge are fully clipped and find nothing new
    let grid_rings = rows.max(cols);
    let max_rings = match max_radius {
        Some(r) => ((r / geometry.cell_size).ceil().max(0.0) as usize).min(grid_rings),
        None => grid_rings,
    };

    let mut best: Option<(f64, Vec2)> = None;

    for ring in 0..=max_rings {
        let x0 = cx.saturating_sub(ring);
        let x1 = (cx + ring).min(cols - 1);
        let y0 = cy.saturating_sub(ring);
        let y1 = (cy + ring).min(rows - 1);
        let mut found_any = false;

        let left_right = (y0..=y1).flat_map(|row| [(x0, row), (x1, row)]);
        let top_bottom = (x0..=x1).flat_map(|col| [(col, y0), (col, y1)]);

        for (col, row) in left_right.chain(top_bottom) {
            if !heatmap.is_unvisited(col, row) || obstacles.is_blocked(col, row) {
                continue;
            }
            let center = geometry.cell_center(col, row);
            let d = (position - center).norm();
            let in_range = max_radius.map_or(true, |r| d <= r);
            if in_range && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, center));
                found_any = true;
            }
        }

        if found_any {
            break;
        }
    }

    best.map(|(_, center)| center)
}

/// Greedy coverage strategy.
#[derive(Debug, Clone)]
pub struct GreedyCoverage {
    params: GreedyCoverageParams,
}

impl GreedyCoverage {
    /// Creates the strategy.
    pub fn new(params: GreedyCoverageParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &GreedyCoverageParams {
        &self.params
    }

    /// Smoothed random walk used when nothing is in sensing range.
    fn explore(&self, velocity: Vec2, rng: &mut dyn RngCore) -> Vec2 {
        let mut velocity = velocity;
        if rng.gen::<f64>() < EXPLORE_IMPULSE_PROB {
            velocity += Vec2::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5);
        }
        velocity *= EXPLORE_DAMPING;

        let speed = velocity.norm();
        if speed > self.params.speed && speed > 0.0 {
            velocity *= self.params.speed / speed;
        }
        velocity
    }
}

impl MovementStrategy for GreedyCoverage {
    fn name(&self) -> &'static str {
        "Greedy Coverage"
    }

    fn step(&self, index: usize, world: &World<'_>, rng: &mut dyn RngCore) -> StepOutcome {
        let agent = world.agents[index];

        let target = nearest_unvisited(
            &agent.position,
            world.heatmap,
            world.obstacles,
            world.geometry,
            Some(self.params.sensing_radius),
        );

        let velocity = match target {
            Some(target) => {
                let to_target = target - agent.position;
                let d = to_target.norm();
                if d > ARRIVED {
                    to_target / d * self.params.speed
                } else {
                    agent.velocity
                }
            }
            None => self.explore(agent.velocity, rng),
        };

        let nudge = avoid(
            index,
            world.agents,
            self.params.avoid_radius,
            self.params.avoid_strength,
        );
        let (next, contact) = advance(&agent, velocity, nudge, world);

        StepOutcome {
            agent: next,
            velocity,
            contact,
            moved: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::grid::BLOCKED;
    use crate::strategy::test_support::Fixture;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn visit_all(heatmap: &mut Heatmap) {
        for row in 0..heatmap.rows() {
            for col in 0..heatmap.cols() {
                heatmap.visit(col, row);
            }
        }
    }

    #[test]
    fn test_nearest_is_own_cell_when_unvisited() {
        let geometry = Geometry::default();
        let heatmap = Heatmap::for_geometry(&geometry);
        let grid = Grid::free_square(50);
        let target = nearest_unvisited(&Vec2::new(250.0, 250.0), &heatmap, &grid, &geometry, Some(200.0));
        assert_eq!(target, Some(Vec2::new(255.0, 255.0)));
    }

    #[test]
    fn test_nearest_skips_visited_and_blocked() {
        let geometry = Geometry::default();
        let mut heatmap = Heatmap::for_geometry(&geometry);
        heatmap.visit(25, 25);
        let mut grid = Grid::free_square(50);
        // Everything on ring 1 except (24, 25) is blocked
        for (col, row) in [(24, 24), (25, 24), (26, 24), (26, 25), (24, 26), (25, 26), (26, 26)] {
            grid.set(col, row, BLOCKED);
        }
        let target = nearest_unvisited(&Vec2::new(255.0, 255.0), &heatmap, &grid, &geometry, Some(200.0));
        assert_eq!(target, Some(Vec2::new(245.0, 255.0)));
    }

    #[test]
    fn test_nearest_respects_radius() {
        let geometry = Geometry::default();
        let mut sparse = Heatmap::for_geometry(&geometry);
        for row in 0..50 {
            for col in 0..50 {
                if (col, row) != (45, 25) {
                    sparse.visit(col, row);
                }
            }
        }
        let grid = Grid::free_square(50);
        let position = Vec2::new(255.0, 255.0);
        assert_eq!(nearest_unvisited(&position, &sparse, &grid, &geometry, Some(150.0)), None);
        assert_eq!(
            nearest_unvisited(&position, &sparse, &grid, &geometry, Some(200.0)),
            Some(Vec2::new(455.0, 255.0))
        );
        assert_eq!(
            nearest_unvisited(&position, &sparse, &grid, &geometry, None),
            Some(Vec2::new(455.0, 255.0))
        );
    }

    #[test]
    fn test_huge_radius_is_bounded_by_grid() {
        let geometry = Geometry::default();
        let mut heatmap = Heatmap::for_geometry(&geometry);
        visit_all(&mut heatmap);
        let grid = Grid::free_square(50);
        let position = Vec2::new(10.0, 10.0);

        for radius in [1e9, f64::INFINITY, f64::NAN] {
            assert_eq!(nearest_unvisited(&position, &heatmap, &grid, &geometry, Some(radius)), None);
        }

        // Far corner is still found once the ring count is capped
        let mut corner = Heatmap::for_geometry(&geometry);
        for row in 0..50 {
            for col in 0..50 {
                if (col, row) != (49, 49) {
                    corner.visit(col, row);
                }
            }
        }
        assert_eq!(
            nearest_unvisited(&position, &corner, &grid, &geometry, Some(1e9)),
            Some(Vec2::new(495.0, 495.0))
        );
    }

    #[test]
    fn test_step_heads_to_target_at_speed() {
        let fixture = Fixture::open(vec![Agent::at(250.0, 250.0)]);
        let strategy = GreedyCoverage::new(GreedyCoverageParams {
            sensing_radius: 200.0,
            ..Default::default()
        });
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_relative_eq!(outcome.velocity.norm(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.velocity.x, outcome.velocity.y, epsilon = 1e-9);
        assert!(outcome.moved);
    }

    #[test]
    fn test_explore_decays_and_caps() {
        let mut fixture = Fixture::open(vec![Agent::at(250.0, 250.0).with_velocity(Vec2::new(30.0, 0.0))]);
        visit_all(&mut fixture.heatmap);
        let strategy = GreedyCoverage::new(GreedyCoverageParams::default());

        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(3));
        assert!(outcome.velocity.norm() <= 10.0 + 1e-9);

        let slow = GreedyCoverage::new(GreedyCoverageParams::default()).explore(Vec2::new(1.0, 0.0), &mut NoImpulse);
        assert_relative_eq!(slow.x, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_avoidance_displaces_without_persisting() {
        let mut fixture = Fixture::open(vec![Agent::at(250.0, 250.0), Agent::at(240.0, 250.0)]);
        visit_all(&mut fixture.heatmap);
        let strategy = GreedyCoverage::new(GreedyCoverageParams::default());
        let outcome = strategy.step(0, &fixture.world(), &mut NoImpulse);

        assert_eq!(outcome.agent.velocity, Vec2::zeros());
        assert_relative_eq!(outcome.agent.position.x, 250.5, epsilon = 1e-12);
        assert_relative_eq!(outcome.agent.position.y, 250.0, epsilon = 1e-12);
    }

    /// RNG whose uniform draws are all close to 1, so no impulse fires.
    struct NoImpulse;

    impl RngCore for NoImpulse {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xff);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0xff);
            Ok(())
        }
    }
}
