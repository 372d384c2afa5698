//! Agent kinematic state and spawning.

use crate::geometry::{Geometry, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-width of the square spawn cluster around the canvas centre (pixels).
pub const SPAWN_JITTER: f64 = 15.0;

/// Maximum initial speed per axis (pixels/tick).
pub const SPAWN_SPEED: f64 = 1.0;

/// A single drone.
///
/// Agents have no identity beyond their index in the session's agent list.
/// Strategies never mutate an agent; they return a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Position in pixels
    pub position: Vec2,

    /// Velocity in pixels per tick
    pub velocity: Vec2,

    /// Remaining inertial run ticks (bacterial foraging)
    pub swim_count: u32,
}

impl Agent {
    /// Creates an agent with the given position and velocity.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            swim_count: 0,
        }
    }

    /// Creates a stationary agent.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::zeros())
    }

    /// Returns a copy with a different velocity.
    pub fn with_velocity(self, velocity: Vec2) -> Self {
        Self { velocity, ..self }
    }

    /// Current speed (pixels/tick).
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Spawns `count` agents clustered around the canvas centre.
///
/// Each agent gets uniform jitter of +-[`SPAWN_JITTER`] px per axis and a
/// uniform initial velocity of +-[`SPAWN_SPEED`] per axis.
pub fn spawn_agents<R: Rng + ?Sized>(count: usize, geometry: &Geometry, rng: &mut R) -> Vec<Agent> {
    let center = geometry.center();
    (0..count)
        .map(|_| {
            let position = Vec2::new(
                center.x + rng.gen_range(-SPAWN_JITTER..SPAWN_JITTER),
                center.y + rng.gen_range(-SPAWN_JITTER..SPAWN_JITTER),
            );
            let velocity = Vec2::new(
                rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED),
                rng.gen_range(-SPAWN_SPEED..SPAWN_SPEED),
            );
            Agent::new(position, velocity)
        })
        .collect()
}

/// Smallest distance between any two agents, or `None` with fewer than two.
pub fn min_pairwise_distance(agents: &[Agent]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (i, a) in agents.iter().enumerate() {
        for b in &agents[i + 1..] {
            let d = (a.position - b.position).norm();
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_cluster_near_center() {
        let geometry = Geometry::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let agents = spawn_agents(30, &geometry, &mut rng);

        assert_eq!(agents.len(), 30);
        for agent in &agents {
            assert!((agent.position.x - 250.0).abs() <= SPAWN_JITTER);
            assert!((agent.position.y - 250.0).abs() <= SPAWN_JITTER);
            assert!(agent.velocity.x.abs() <= SPAWN_SPEED);
            assert!(agent.velocity.y.abs() <= SPAWN_SPEED);
            assert_eq!(agent.swim_count, 0);
        }
    }

    #[test]
    fn test_spawn_deterministic() {
        let geometry = Geometry::default();
        let a = spawn_agents(5, &geometry, &mut ChaCha8Rng::seed_from_u64(7));
        let b = spawn_agents(5, &geometry, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_min_pairwise_distance() {
        let agents = vec![Agent::at(0.0, 0.0), Agent::at(3.0, 4.0), Agent::at(10.0, 0.0)];
        assert_eq!(min_pairwise_distance(&agents), Some(5.0));
        assert_eq!(min_pairwise_distance(&agents[..1]), None);
    }
}
