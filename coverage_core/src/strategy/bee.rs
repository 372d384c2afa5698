//! Bee colony placeholder.
//!
//! The scout/forager parameters are accepted so the algorithm can be
//! selected and configured, but there is no movement rule: every agent is
//! returned unchanged and nothing is marked on the heatmap.

use super::{MovementStrategy, StepOutcome, World};
use crate::collision::Contact;
use crate::params::BeeColonyParams;
use rand::RngCore;

/// No-op strategy holding the declared bee colony configuration.
#[derive(Debug, Clone)]
pub struct BeeColony {
    params: BeeColonyParams,
}

impl BeeColony {
    /// Creates the strategy.
    pub fn new(params: BeeColonyParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &BeeColonyParams {
        &self.params
    }
}

impl MovementStrategy for BeeColony {
    fn name(&self) -> &'static str {
        "Bee Colony"
    }

    fn step(&self, index: usize, world: &World<'_>, _rng: &mut dyn RngCore) -> StepOutcome {
        let agent = world.agents[index];
        StepOutcome {
            agent,
            velocity: agent.velocity,
            contact: Contact::Clear,
            moved: false,
        }
    }
}
