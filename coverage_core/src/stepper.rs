//! One global tick, and the session that owns state across ticks.
//!
//! Every agent is stepped against the same snapshot of the agent list and
//! heatmap taken at the start of the tick, then the whole set is replaced.
//! Results therefore do not depend on the order agents are visited in.

use crate::agent::{spawn_agents, Agent};
use crate::collision::Contact;
use crate::error::{CoverageError, Result};
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::heatmap::Heatmap;
use crate::params::{Algorithm, AlgorithmParams};
use crate::strategy::{strategy_for, MovementStrategy, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

/// Radius, in fine cells, marked around each agent after it moves.
pub const MARK_RADIUS: u32 = 1;

/// New world state produced by [`simulate_tick`].
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Replacement agent set, same order as the input
    pub agents: Vec<Agent>,

    /// Heatmap with every moved agent's landing disc marked
    pub heatmap: Heatmap,

    /// Cells that became visited during the tick
    pub newly_visited: usize,

    /// Agents whose move was fully blocked by walls
    pub blocked: usize,
}

/// Advances every agent one tick with `strategy`.
///
/// `fine_obstacles` must already be at movement resolution. Inputs are not
/// modified.
pub fn simulate_tick(
    strategy: &dyn MovementStrategy,
    agents: &[Agent],
    heatmap: &Heatmap,
    fine_obstacles: &Grid,
    geometry: &Geometry,
    iteration: u64,
    rng: &mut dyn RngCore,
) -> TickOutput {
    let world = World {
        agents,
        obstacles: fine_obstacles,
        heatmap,
        geometry,
        iteration,
    };

    let outcomes: Vec<_> = (0..agents.len())
        .map(|i| strategy.step(i, &world, &mut *rng))
        .collect();

    let mut next_heatmap = heatmap.clone();
    let mut newly_visited = 0;
    for outcome in outcomes.iter().filter(|o| o.moved) {
        newly_visited += next_heatmap.mark_in_place(geometry, &outcome.agent.position, MARK_RADIUS);
    }

    TickOutput {
        agents: outcomes.iter().map(|o| o.agent).collect(),
        heatmap: next_heatmap,
        newly_visited,
        blocked: outcomes.iter().filter(|o| o.contact == Contact::Blocked).count(),
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Master seed for spawn jitter and strategy randomness
    pub seed: u64,

    /// Fine grid geometry
    pub geometry: Geometry,

    /// Coarse obstacle map (`None` = all free)
    pub obstacle_map: Option<Grid>,

    /// Active algorithm and its parameters
    pub params: AlgorithmParams,

    /// Agents to spawn (`None` = the params' population)
    pub drone_count: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            geometry: Geometry::default(),
            obstacle_map: None,
            params: AlgorithmParams::default(),
            drone_count: None,
        }
    }
}

/// Summary of one [`SimulationContext::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Iteration value the strategies saw
    pub iteration: u64,

    /// Cells that became visited
    pub newly_visited: usize,

    /// Agents fully blocked by walls
    pub blocked: usize,
}

/// Owns all state of one simulation run.
///
/// The obstacle map is supplied by the caller and only read by the engine;
/// the agents and the heatmap belong to the session.
pub struct SimulationContext {
    seed: u64,
    geometry: Geometry,
    obstacle_map: Grid,
    fine_obstacles: Grid,
    heatmap: Heatmap,
    agents: Vec<Agent>,
    params: AlgorithmParams,
    strategy: Box<dyn MovementStrategy>,
    iteration: u64,
    rng: ChaCha8Rng,
}

impl SimulationContext {
    /// Creates a session and spawns its agents.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let geometry = config.geometry;
        check_geometry(&geometry)?;
        let obstacle_map = match config.obstacle_map {
            Some(map) => {
                check_dimensions(&map, geometry.map_grid_size())?;
                map
            }
            None => Grid::free_square(geometry.map_grid_size()),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let count = config.drone_count.unwrap_or_else(|| config.params.population());
        let agents = spawn_agents(count, &geometry, &mut rng);

        info!(
            "Session created: {} agents, algorithm={}, seed={}",
            agents.len(),
            config.params.algorithm(),
            config.seed
        );
        warn_if_placeholder(config.params.algorithm());

        let fine_obstacles = obstacle_map.upsample();
        let heatmap = Heatmap::new(fine_obstacles.rows(), fine_obstacles.cols());

        Ok(Self {
            seed: config.seed,
            geometry,
            fine_obstacles,
            obstacle_map,
            heatmap,
            agents,
            strategy: strategy_for(&config.params),
            params: config.params,
            iteration: 0,
            rng,
        })
    }

    /// Runs one tick and replaces agents and heatmap with the result.
    pub fn tick(&mut self) -> TickReport {
        let output = simulate_tick(
            self.strategy.as_ref(),
            &self.agents,
            &self.heatmap,
            &self.fine_obstacles,
            &self.geometry,
            self.iteration,
            &mut self.rng,
        );

        let report = TickReport {
            iteration: self.iteration,
            newly_visited: output.newly_visited,
            blocked: output.blocked,
        };

        self.agents = output.agents;
        self.heatmap = output.heatmap;
        self.iteration += 1;

        report
    }

    /// Runs `ticks` ticks, returning the number of newly visited cells.
    pub fn run(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.tick().newly_visited).sum()
    }

    /// Replaces the coarse obstacle map.
    ///
    /// The map must be square with the session's coarse dimension; on error
    /// nothing changes.
    pub fn set_obstacle_map(&mut self, map: Grid) -> Result<()> {
        check_dimensions(&map, self.geometry.map_grid_size())?;
        self.fine_obstacles = map.upsample();
        self.obstacle_map = map;
        debug!(
            "Obstacle map replaced ({} free coarse cells)",
            self.obstacle_map.free_count()
        );
        Ok(())
    }

    /// Switches algorithm and/or parameters. Agents and heatmap are kept.
    pub fn set_params(&mut self, params: AlgorithmParams) {
        if params.algorithm() != self.params.algorithm() {
            info!("Algorithm switched: {} -> {}", self.params.algorithm(), params.algorithm());
            warn_if_placeholder(params.algorithm());
        }
        self.strategy = strategy_for(&params);
        self.params = params;
    }

    /// Respawns `drone_count` agents, clears coverage and restarts the
    /// iteration counter.
    pub fn reset(&mut self, drone_count: usize) {
        self.agents = spawn_agents(drone_count, &self.geometry, &mut self.rng);
        self.heatmap = self.heatmap.clear();
        self.iteration = 0;
        info!("Session reset with {} agents", drone_count);
    }

    /// Replaces the agent set with caller-placed agents.
    ///
    /// Coverage and the iteration counter are left alone.
    pub fn place_agents(&mut self, agents: Vec<Agent>) {
        debug!("Placed {} agents", agents.len());
        self.agents = agents;
    }

    /// Clears the heatmap only.
    pub fn clear_heatmap(&mut self) {
        self.heatmap = self.heatmap.clear();
    }

    /// Current agents.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Current heatmap.
    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    /// Coarse obstacle map as supplied.
    pub fn obstacle_map(&self) -> &Grid {
        &self.obstacle_map
    }

    /// Fine obstacle grid used for movement.
    pub fn fine_obstacles(&self) -> &Grid {
        &self.fine_obstacles
    }

    /// Active parameters.
    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }

    /// Ticks completed since creation or the last reset.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Session geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Master seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fraction of free fine cells visited so far.
    pub fn coverage(&self) -> f64 {
        self.heatmap.coverage(&self.fine_obstacles)
    }
}

/// The fine grid must split evenly into 2x2 coarse blocks.
fn check_geometry(geometry: &Geometry) -> Result<()> {
    let grid_size = geometry.grid_size;
    if grid_size == 0 || grid_size % 2 != 0 || !(geometry.cell_size > 0.0 && geometry.cell_size.is_finite()) {
        return Err(CoverageError::InvalidGeometry {
            grid_size,
            cell_size: geometry.cell_size,
        });
    }
    Ok(())
}

fn check_dimensions(map: &Grid, expected: usize) -> Result<()> {
    if map.rows() != expected || map.cols() != expected {
        return Err(CoverageError::WrongDimensions {
            expected,
            rows: map.rows(),
            cols: map.cols(),
        });
    }
    Ok(())
}

fn warn_if_placeholder(algorithm: Algorithm) {
    if algorithm == Algorithm::BeeColony {
        warn!("Bee Colony has no movement rule; agents will hold position");
    }
}
