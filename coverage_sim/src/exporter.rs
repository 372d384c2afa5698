//! JSON exporter for run summaries and coverage heatmaps.

use crate::error::SimResult;
use crate::world::SimWorld;

use coverage_core::{save_heatmap, Heatmap};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Summary of a free run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Algorithm display name
    pub algorithm: String,

    /// Seed used
    pub seed: u64,

    /// Number of agents
    pub drones: usize,

    /// Ticks executed
    pub ticks: u64,

    /// Simulated time in seconds
    pub time_secs: f64,

    /// Fraction of free cells covered
    pub coverage: f64,

    /// Fine cells marked visited
    pub visited_cells: usize,

    /// Moves undone because neither axis could slide
    pub blocked_moves: u64,
}

impl RunSummary {
    /// Captures the current state of a world.
    pub fn from_world(world: &SimWorld) -> Self {
        let session = world.session();
        Self {
            algorithm: session.params().algorithm().to_string(),
            seed: session.seed(),
            drones: session.agents().len(),
            ticks: world.tick_count(),
            time_secs: world.time(),
            coverage: world.coverage(),
            visited_cells: world.heatmap().visited_count(),
            blocked_moves: world.blocked_moves(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Writes the heatmap as a binary matrix in the obstacle map format.
pub fn export_heatmap(path: impl AsRef<Path>, heatmap: &Heatmap) -> SimResult<()> {
    save_heatmap(path, heatmap)?;
    Ok(())
}
