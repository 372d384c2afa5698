//! Coverage Simulation Harness
//!
//! Drives a [`coverage_core::SimulationContext`] on a fixed tick period and
//! runs built-in scenarios that check the engine's observable guarantees.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  SimWorld                    │
//! │  ┌────────────────────────────────────────┐  │
//! │  │ SimulationContext (agents + heatmap)   │  │
//! │  └────────────────────────────────────────┘  │
//! │        ▲                        │            │
//! │        │ obstacle map           │ tick()     │
//! │  ┌─────┴─────┐           ┌──────▼──────┐     │
//! │  │  map I/O  │           │  exporter   │     │
//! │  └───────────┘           └─────────────┘     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use coverage_sim::{SimConfig, SimWorld};
//!
//! let mut world = SimWorld::new(SimConfig {
//!     seed: 7,
//!     max_ticks: 400,
//!     ..Default::default()
//! })?;
//!
//! world.run_to_end();
//! println!("{:.1}% covered", world.coverage() * 100.0);
//! ```

mod error;
mod exporter;
mod runner;
mod world;
pub mod scenarios;

pub use error::{SimError, SimResult};
pub use exporter::{export_heatmap, RunSummary};
pub use runner::{scattered_map, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{SimConfig, SimWorld};
