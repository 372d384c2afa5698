//! Built-in coverage scenarios.

use crate::error::SimError;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// COV-001: one greedy tick marks a plus-shaped disc of radius 1
    MarkRadius,

    /// COV-002: a lone greedy agent reaches the last unvisited cell
    GreedyConvergence,

    /// COV-003: dispersal pushes co-located foragers apart
    DispersalSeparation,

    /// COV-004: a diagonal swim into a wall slides along it
    WallSliding,

    /// COV-005: every algorithm keeps the run invariants on a cluttered map
    InvariantSweep,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::MarkRadius,
            ScenarioId::GreedyConvergence,
            ScenarioId::DispersalSeparation,
            ScenarioId::WallSliding,
            ScenarioId::InvariantSweep,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::MarkRadius => "mark_radius",
            ScenarioId::GreedyConvergence => "greedy_convergence",
            ScenarioId::DispersalSeparation => "dispersal_separation",
            ScenarioId::WallSliding => "wall_sliding",
            ScenarioId::InvariantSweep => "invariant_sweep",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::MarkRadius => "Single greedy tick from the centre marks exactly 5 cells",
            ScenarioId::GreedyConvergence => "One unvisited cell left, greedy agent arrives within d/speed ticks",
            ScenarioId::DispersalSeparation => "4 foragers on one point, minimum spacing grows over 10 ticks",
            ScenarioId::WallSliding => "Diagonal swim into a vertical wall keeps its vertical motion",
            ScenarioId::InvariantSweep => "All algorithms on a scattered map: monotone heatmap, no wall hits",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mark_radius" | "markradius" | "cov-001" => Ok(ScenarioId::MarkRadius),
            "greedy_convergence" | "greedyconvergence" | "cov-002" => Ok(ScenarioId::GreedyConvergence),
            "dispersal_separation" | "dispersal" | "cov-003" => Ok(ScenarioId::DispersalSeparation),
            "wall_sliding" | "wallsliding" | "cov-004" => Ok(ScenarioId::WallSliding),
            "invariant_sweep" | "invariants" | "cov-005" => Ok(ScenarioId::InvariantSweep),
            _ => Err(SimError::UnknownScenario(s.to_string())),
        }
    }
}
