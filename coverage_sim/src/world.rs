//! SimWorld - a session driven on a fixed tick period.

use crate::error::SimResult;

use coverage_core::{
    AlgorithmParams, Geometry, Grid, Heatmap, SessionConfig, SimulationContext, TickReport,
};
use std::time::Duration;
use tracing::debug;

/// Log a progress line every this many ticks.
const PROGRESS_INTERVAL: u64 = 20;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Active algorithm and its parameters
    pub params: AlgorithmParams,

    /// Agents to spawn (`None` = the params' population)
    pub drone_count: Option<usize>,

    /// Wall-clock period of one tick in milliseconds
    pub tick_period_ms: u64,

    /// Ticks executed by [`SimWorld::run_to_end`]
    pub max_ticks: u64,

    /// Fine grid geometry
    pub geometry: Geometry,

    /// Coarse obstacle map (`None` = all free)
    pub obstacle_map: Option<Grid>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            params: AlgorithmParams::default(),
            drone_count: None,
            tick_period_ms: 50,
            max_ticks: 600,
            geometry: Geometry::default(),
            obstacle_map: None,
        }
    }
}

impl SimConfig {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            seed: self.seed,
            geometry: self.geometry,
            obstacle_map: self.obstacle_map.clone(),
            params: self.params.clone(),
            drone_count: self.drone_count,
        }
    }
}

/// The SimWorld - container for one coverage run.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Engine session
    session: SimulationContext,

    /// Ticks executed since creation or the last reset
    tick_count: u64,

    /// Fully blocked moves summed over the run
    blocked_moves: u64,
}

impl SimWorld {
    /// Creates a new SimWorld with the given configuration.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let session = SimulationContext::new(config.session_config())?;
        Ok(Self {
            config,
            session,
            tick_count: 0,
            blocked_moves: 0,
        })
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickReport {
        let report = self.session.tick();
        self.tick_count += 1;
        self.blocked_moves += report.blocked as u64;

        if self.tick_count % PROGRESS_INTERVAL == 0 {
            debug!(
                "  t={:.1}s | coverage={:.1}% | +{} cells | blocked={}",
                self.time(),
                self.coverage() * 100.0,
                report.newly_visited,
                report.blocked
            );
        }

        report
    }

    /// Runs the remaining ticks up to `max_ticks`, returning how many ran.
    pub fn run_to_end(&mut self) -> u64 {
        let remaining = self.config.max_ticks.saturating_sub(self.tick_count);
        for _ in 0..remaining {
            self.tick();
        }
        remaining
    }

    /// Respawns agents, clears coverage and restarts the clock.
    pub fn reset(&mut self) {
        let count = self
            .config
            .drone_count
            .unwrap_or_else(|| self.session.params().population());
        self.session.reset(count);
        self.tick_count = 0;
        self.blocked_moves = 0;
    }

    /// Returns true once `max_ticks` ticks have run.
    pub fn is_finished(&self) -> bool {
        self.tick_count >= self.config.max_ticks
    }

    /// Duration of one tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.config.tick_period_ms)
    }

    /// Returns the current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.tick_count as f64 * self.tick_period().as_secs_f64()
    }

    /// Returns the current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Fully blocked moves since the start of the run.
    pub fn blocked_moves(&self) -> u64 {
        self.blocked_moves
    }

    /// Fraction of free cells covered.
    pub fn coverage(&self) -> f64 {
        self.session.coverage()
    }

    /// Current heatmap.
    pub fn heatmap(&self) -> &Heatmap {
        self.session.heatmap()
    }

    /// Underlying engine session.
    pub fn session(&self) -> &SimulationContext {
        &self.session
    }

    /// Mutable access for map edits and parameter changes mid-run.
    pub fn session_mut(&mut self) -> &mut SimulationContext {
        &mut self.session
    }
}
