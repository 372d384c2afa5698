//! Movement strategies.
//!
//! A strategy is a pure function of one agent and a read-only view of the
//! world at the start of the tick. It returns a new agent value; nothing it
//! is handed is mutated. Randomness is drawn from the caller's RNG so runs
//! stay reproducible from a single seed.

mod bacterial;
mod bee;
mod greedy;

pub use bacterial::{sense_score, BacterialForaging, SENSING_HEADINGS};
pub use bee::BeeColony;
pub use greedy::{nearest_unvisited, GreedyCoverage, EXPLORE_DAMPING, EXPLORE_IMPULSE_PROB};

use crate::agent::Agent;
use crate::collision::{self, Contact};
use crate::geometry::{Geometry, Vec2};
use crate::grid::Grid;
use crate::heatmap::Heatmap;
use crate::params::AlgorithmParams;
use rand::RngCore;

/// Read-only world snapshot handed to every strategy call within a tick.
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    /// All agents as they were at the start of the tick
    pub agents: &'a [Agent],

    /// Fine-resolution obstacle grid
    pub obstacles: &'a Grid,

    /// Heatmap as it was at the start of the tick
    pub heatmap: &'a Heatmap,

    /// Pixel/cell geometry
    pub geometry: &'a Geometry,

    /// Ticks completed before this one
    pub iteration: u64,
}

/// Result of one strategy step for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// New agent state after collision resolution
    pub agent: Agent,

    /// Velocity the strategy chose, before collision zeroed any component
    pub velocity: Vec2,

    /// How the move was resolved against walls
    pub contact: Contact,

    /// False when the strategy left the agent where it was by design
    pub moved: bool,
}

/// Common contract for movement strategies.
pub trait MovementStrategy {
    /// Display name of the strategy.
    fn name(&self) -> &'static str;

    /// Computes the next state of the agent at `index`.
    fn step(&self, index: usize, world: &World<'_>, rng: &mut dyn RngCore) -> StepOutcome;
}

/// Builds the strategy for the given parameters.
pub fn strategy_for(params: &AlgorithmParams) -> Box<dyn MovementStrategy> {
    match params {
        AlgorithmParams::BacterialForaging(p) => Box::new(BacterialForaging::new(p.clone())),
        AlgorithmParams::BeeColony(p) => Box::new(BeeColony::new(p.clone())),
        AlgorithmParams::GreedyCoverage(p) => Box::new(GreedyCoverage::new(p.clone())),
    }
}

/// Integrates `velocity` (plus a one-off `displacement`) and resolves walls.
///
/// The displacement moves the agent this tick only; it is not folded into
/// the returned velocity.
pub(crate) fn advance(
    agent: &Agent,
    velocity: Vec2,
    displacement: Vec2,
    world: &World<'_>,
) -> (Agent, Contact) {
    let tentative = agent.position + velocity + displacement;
    let res = collision::resolve(
        agent.position,
        tentative,
        velocity,
        world.obstacles,
        world.geometry,
    );
    let next = Agent {
        position: res.position,
        velocity: res.velocity,
        swim_count: agent.swim_count,
    };
    (next, res.contact)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::geometry::Geometry;

    /// Owns everything a [`World`] borrows.
    pub struct Fixture {
        pub agents: Vec<Agent>,
        pub obstacles: Grid,
        pub heatmap: Heatmap,
        pub geometry: Geometry,
        pub iteration: u64,
    }

    impl Fixture {
        pub fn open(agents: Vec<Agent>) -> Self {
            let geometry = Geometry::default();
            Self {
                agents,
                obstacles: Grid::free_square(geometry.grid_size),
                heatmap: Heatmap::for_geometry(&geometry),
                geometry,
                iteration: 0,
            }
        }

        pub fn world(&self) -> World<'_> {
            World {
                agents: &self.agents,
                obstacles: &self.obstacles,
                heatmap: &self.heatmap,
                geometry: &self.geometry,
                iteration: self.iteration,
            }
        }
    }
}
