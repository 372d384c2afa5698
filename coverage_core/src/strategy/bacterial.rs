//! Bacterial foraging: repulsive dispersal followed by swim/tumble chemotaxis.

use super::{advance, MovementStrategy, StepOutcome, World};
use crate::agent::Agent;
use crate::avoidance::repel;
use crate::collision::Contact;
use crate::geometry::Vec2;
use crate::params::BacterialForagingParams;
use rand::{Rng, RngCore};
use std::f64::consts::TAU;

/// Number of evenly spaced sensors.
pub const SENSING_HEADINGS: usize = 8;

/// Half-width of the sensor neighbourhood in fine cells (5x5 window).
const SENSOR_HALF_WIDTH: i64 = 2;

/// Bacterial foraging strategy.
#[derive(Debug, Clone)]
pub struct BacterialForaging {
    params: BacterialForagingParams,
}

/// Counts free, unvisited cells in the 5x5 window around `sensor`.
///
/// The window is anchored on the truncated cell coordinate of the sensor,
/// which may lie outside the grid; cells that do not exist in either grid
/// never count.
pub fn sense_score(sensor: &Vec2, world: &World<'_>) -> usize {
    let cell = world.geometry.cell_size;
    let base_col = (sensor.x / cell).trunc() as i64;
    let base_row = (sensor.y / cell).trunc() as i64;
    let mut score = 0;

    for dx in -SENSOR_HALF_WIDTH..=SENSOR_HALF_WIDTH {
        for dy in -SENSOR_HALF_WIDTH..=SENSOR_HALF_WIDTH {
            let col = base_col + dx;
            let row = base_row + dy;
            if world.obstacles.get_signed(col, row) == Some(0)
                && world.heatmap.get_signed(col, row) == Some(0)
            {
                score += 1;
            }
        }
    }

    score
}

impl BacterialForaging {
    /// Creates the strategy.
    pub fn new(params: BacterialForagingParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &BacterialForagingParams {
        &self.params
    }

    fn heading(&self, angle: f64) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin()) * self.params.step_size
    }

    /// Dispersal phase: add summed repulsion to the current velocity.
    fn disperse(&self, index: usize, world: &World<'_>) -> Vec2 {
        let agent = &world.agents[index];
        let mut velocity = agent.velocity
            + repel(
                index,
                world.agents,
                self.params.repel_radius,
                self.params.repel_strength,
            );

        if let Some(cap) = self.params.max_speed {
            let speed = velocity.norm();
            if speed > cap && speed > 0.0 {
                velocity *= cap / speed;
            }
        }
        velocity
    }

    /// Coverage phase: swim, tumble or pick the best sensed heading.
    ///
    /// Returns the new velocity and swim counter.
    fn chemotaxis(&self, index: usize, world: &World<'_>, rng: &mut dyn RngCore) -> (Vec2, u32) {
        let agent = &world.agents[index];

        if agent.swim_count > 0 {
            return (agent.velocity, agent.swim_count - 1);
        }

        if rng.gen::<f64>() < self.params.tumble_prob {
            let angle = rng.gen::<f64>() * TAU;
            return (self.heading(angle), self.params.swim_length);
        }

        let mut best: Option<(f64, usize)> = None;
        for k in 0..SENSING_HEADINGS {
            let angle = k as f64 / SENSING_HEADINGS as f64 * TAU;
            let sensor = agent.position + Vec2::new(angle.cos(), angle.sin()) * self.params.sensing_radius;
            let score = sense_score(&sensor, world);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((angle, score));
            }
        }

        match best {
            Some((angle, score)) if score > 0 => (self.heading(angle), self.params.swim_length),
            _ => (agent.velocity, 0),
        }
    }
}

impl MovementStrategy for BacterialForaging {
    fn name(&self) -> &'static str {
        "Bacterial Foraging"
    }

    fn step(&self, index: usize, world: &World<'_>, rng: &mut dyn RngCore) -> StepOutcome {
        let agent = world.agents[index];

        let (velocity, swim_count) = if world.iteration < self.params.dispersal_steps {
            (self.disperse(index, world), agent.swim_count)
        } else {
            self.chemotaxis(index, world, rng)
        };

        let steered = Agent { swim_count, ..agent };
        let (mut next, contact) = advance(&steered, velocity, Vec2::zeros(), world);
        if contact == Contact::Blocked {
            next.swim_count = 0;
        }

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
    use crate::grid::BLOCKED;
    use crate::strategy::test_support::Fixture;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn coverage_params() -> BacterialForagingParams {
        BacterialForagingParams {
            dispersal_steps: 0,
            tumble_prob: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_dispersal_pushes_apart() {
        let mut fixture = Fixture::open(vec![Agent::at(250.0, 250.0), Agent::at(260.0, 250.0)]);
        fixture.iteration = 0;
        let strategy = BacterialForaging::new(BacterialForagingParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let left = strategy.step(0, &fixture.world(), &mut rng);
        let right = strategy.step(1, &fixture.world(), &mut rng);

        assert!(left.velocity.x < 0.0);
        assert!(right.velocity.x > 0.0);
        assert!(left.agent.position.x < 250.0);
        assert!(right.agent.position.x > 260.0);
    }

    #[test]
    fn test_dispersal_speed_cap() {
        let agents = vec![
            Agent::at(250.0, 250.0),
            Agent::at(250.5, 250.0),
            Agent::at(250.0, 250.5),
        ];
        let fixture = Fixture::open(agents);
        let strategy = BacterialForaging::new(BacterialForagingParams {
            max_speed: Some(2.0),
            ..Default::default()
        });
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));
        assert!(outcome.velocity.norm() <= 2.0 + 1e-9);
    }

    #[test]
    fn test_swim_keeps_velocity_and_counts_down() {
        let mut agent = Agent::at(100.0, 100.0).with_velocity(Vec2::new(2.0, 0.0));
        agent.swim_count = 3;
        let fixture = Fixture::open(vec![agent]);
        let strategy = BacterialForaging::new(coverage_params());

        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(outcome.velocity, Vec2::new(2.0, 0.0));
        assert_eq!(outcome.agent.swim_count, 2);
        assert_eq!(outcome.agent.position, Vec2::new(102.0, 100.0));
    }

    #[test]
    fn test_tumble_sets_step_size_and_swim() {
        let fixture = Fixture::open(vec![Agent::at(250.0, 250.0)]);
        let strategy = BacterialForaging::new(BacterialForagingParams {
            dispersal_steps: 0,
            tumble_prob: 1.0,
            ..Default::default()
        });
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(9));
        assert!((outcome.velocity.norm() - 2.0).abs() < 1e-9);
        assert_eq!(outcome.agent.swim_count, 4);
    }

    #[test]
    fn test_sensing_prefers_unvisited_side() {
        let mut fixture = Fixture::open(vec![Agent::at(250.0, 250.0)]);
        // Visit everything except a block to the west (heading k = 4)
        for row in 0..50 {
            for col in 0..50 {
                if !(20..=23).contains(&col) || !(23..=27).contains(&row) {
                    fixture.heatmap.visit(col, row);
                }
            }
        }
        let strategy = BacterialForaging::new(coverage_params());
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));

        assert!((outcome.velocity.x + 2.0).abs() < 1e-9);
        assert!(outcome.velocity.y.abs() < 1e-9);
        assert_eq!(outcome.agent.swim_count, 4);
    }

    #[test]
    fn test_sensing_ties_take_first_heading() {
        let fixture = Fixture::open(vec![Agent::at(250.0, 250.0)]);
        let strategy = BacterialForaging::new(coverage_params());
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));
        // Every sensor scores 25 on an empty map; heading 0 points east
        assert!((outcome.velocity.x - 2.0).abs() < 1e-9);
        assert!(outcome.velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_zero_score_keeps_velocity() {
        let mut fixture = Fixture::open(vec![Agent::at(250.0, 250.0).with_velocity(Vec2::new(0.5, 0.5))]);
        for row in 0..50 {
            for col in 0..50 {
                fixture.heatmap.visit(col, row);
            }
        }
        let strategy = BacterialForaging::new(coverage_params());
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(outcome.velocity, Vec2::new(0.5, 0.5));
        assert_eq!(outcome.agent.swim_count, 0);
    }

    #[test]
    fn test_sense_score_outside_grid_counts_nothing() {
        let fixture = Fixture::open(vec![Agent::at(0.0, 0.0)]);
        let world = fixture.world();
        assert_eq!(sense_score(&Vec2::new(-100.0, -100.0), &world), 0);
        // Window at the corner keeps only the 3x3 in-grid part
        assert_eq!(sense_score(&Vec2::new(0.0, 0.0), &world), 9);
    }

    #[test]
    fn test_blocked_resets_swim() {
        let mut agent = Agent::at(108.0, 108.0).with_velocity(Vec2::new(4.0, 4.0));
        agent.swim_count = 3;
        let mut fixture = Fixture::open(vec![agent]);
        fixture.obstacles.set(11, 10, BLOCKED);
        fixture.obstacles.set(11, 11, BLOCKED);
        fixture.obstacles.set(10, 11, BLOCKED);

        let strategy = BacterialForaging::new(coverage_params());
        let outcome = strategy.step(0, &fixture.world(), &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(outcome.contact, Contact::Blocked);
        assert_eq!(outcome.agent.position, Vec2::new(108.0, 108.0));
        assert_eq!(outcome.agent.velocity, Vec2::zeros());
        assert_eq!(outcome.agent.swim_count, 0);
    }
}
