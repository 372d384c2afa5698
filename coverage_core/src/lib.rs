//! Coverage Core - multi-agent area-coverage engine
//!
//! Mobile point agents ("drones") move over a bounded 2D grid with static
//! obstacles. Each tick every agent picks a velocity with one of several
//! interchangeable movement strategies, walls are resolved by axis sliding,
//! and a shared heatmap records which cells have been covered.
//!
//! # Resolution
//!
//! The editable obstacle map is coarse. Movement, sensing and coverage all
//! run on the fine grid obtained by [`Grid::upsample`] (2x per axis).
//!
//! # Usage
//!
//! ```ignore
//! use coverage_core::{AlgorithmParams, Algorithm, SessionConfig, SimulationContext};
//!
//! let mut session = SimulationContext::new(SessionConfig {
//!     params: AlgorithmParams::defaults_for(Algorithm::GreedyCoverage),
//!     ..Default::default()
//! })?;
//!
//! for _ in 0..200 {
//!     session.tick();
//! }
//! println!("covered {:.1}%", session.coverage() * 100.0);
//! ```

pub mod agent;
pub mod avoidance;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod heatmap;
pub mod map_io;
pub mod params;
pub mod stepper;
pub mod strategy;

pub use agent::{min_pairwise_distance, spawn_agents, Agent};
pub use collision::{resolve, Contact, Resolution};
pub use error::{CoverageError, Result};
pub use geometry::{Geometry, Vec2};
pub use grid::Grid;
pub use heatmap::Heatmap;
pub use map_io::{load_map, parse_map, save_heatmap, save_map};
pub use params::{
    Algorithm, AlgorithmParams, BacterialForagingParams, BeeColonyParams, GreedyCoverageParams,
};
pub use stepper::{simulate_tick, SessionConfig, SimulationContext, TickOutput, TickReport};
pub use strategy::{strategy_for, MovementStrategy, StepOutcome, World};
