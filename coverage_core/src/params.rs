//! Algorithm selection and per-algorithm parameters.
//!
//! Parameters are not validated: nonsensical values (negative radii, zero
//! speed) produce odd but non-panicking behaviour.

use crate::error::CoverageError;
use serde::{Deserialize, Serialize};

/// Movement algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Dispersal then chemotaxis-style swim/tumble coverage
    #[serde(rename = "Bacterial Foraging")]
    BacterialForaging,

    /// Declared scout/forager configuration without a movement rule
    #[serde(rename = "Bee Colony")]
    BeeColony,

    /// Nearest-unvisited-cell ring search
    #[serde(rename = "Greedy Coverage")]
    GreedyCoverage,
}

impl Algorithm {
    /// Returns every algorithm.
    pub fn all() -> Vec<Algorithm> {
        vec![
            Algorithm::BacterialForaging,
            Algorithm::BeeColony,
            Algorithm::GreedyCoverage,
        ]
    }

    /// Display name, as used by the parameter tag.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BacterialForaging => "Bacterial Foraging",
            Algorithm::BeeColony => "Bee Colony",
            Algorithm::GreedyCoverage => "Greedy Coverage",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        match key.trim() {
            "bacterial foraging" | "bacterial" | "bfo" => Ok(Algorithm::BacterialForaging),
            "bee colony" | "bee" | "abc" => Ok(Algorithm::BeeColony),
            "greedy coverage" | "greedy" => Ok(Algorithm::GreedyCoverage),
            _ => Err(CoverageError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Bacterial foraging parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BacterialForagingParams {
    /// Agents spawned on reset
    pub population: usize,

    /// Ticks spent in the repulsion-driven dispersal phase
    pub dispersal_steps: u64,

    /// Speed after a tumble or sensed heading (pixels/tick)
    pub step_size: f64,

    /// Distance of the eight sensors (pixels)
    pub sensing_radius: f64,

    /// Inertial run length after choosing a heading (ticks)
    pub swim_length: u32,

    /// Probability of a random tumble when not swimming
    pub tumble_prob: f64,

    /// Dispersal repulsion range (pixels)
    pub repel_radius: f64,

    /// Dispersal repulsion strength
    pub repel_strength: f64,

    /// Optional speed cap applied after dispersal repulsion
    pub max_speed: Option<f64>,
}

impl Default for BacterialForagingParams {
    fn default() -> Self {
        Self {
            population: 30,
            dispersal_steps: 50,
            step_size: 2.0,
            sensing_radius: 30.0,
            swim_length: 4,
            tumble_prob: 0.2,
            repel_radius: 40.0,
            repel_strength: 1.5,
            max_speed: None,
        }
    }
}

/// Greedy coverage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GreedyCoverageParams {
    /// Agents spawned on reset
    pub num_drones: usize,

    /// Travel speed toward the target, and the exploration speed cap
    pub speed: f64,

    /// Maximum target distance (pixels)
    pub sensing_radius: f64,

    /// Neighbour avoidance range (pixels)
    pub avoid_radius: f64,

    /// Neighbour avoidance displacement per tick (pixels)
    pub avoid_strength: f64,
}

impl Default for GreedyCoverageParams {
    fn default() -> Self {
        Self {
            num_drones: 30,
            speed: 10.0,
            sensing_radius: 150.0,
            avoid_radius: 30.0,
            avoid_strength: 0.5,
        }
    }
}

/// Bee colony parameters. Declared for configuration only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeeColonyParams {
    pub num_scouts: usize,
    pub num_foragers: usize,
    pub search_radius: f64,
}

impl Default for BeeColonyParams {
    fn default() -> Self {
        Self {
            num_scouts: 10,
            num_foragers: 20,
            search_radius: 50.0,
        }
    }
}

/// Parameters of the active algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum AlgorithmParams {
    #[serde(rename = "Bacterial Foraging")]
    BacterialForaging(BacterialForagingParams),

    #[serde(rename = "Bee Colony")]
    BeeColony(BeeColonyParams),

    #[serde(rename = "Greedy Coverage")]
    GreedyCoverage(GreedyCoverageParams),
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self::BacterialForaging(BacterialForagingParams::default())
    }
}

impl AlgorithmParams {
    /// Default parameters for `algorithm`.
    pub fn defaults_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::BacterialForaging => Self::BacterialForaging(Default::default()),
            Algorithm::BeeColony => Self::BeeColony(Default::default()),
            Algorithm::GreedyCoverage => Self::GreedyCoverage(Default::default()),
        }
    }

    /// Which algorithm these parameters drive.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::BacterialForaging(_) => Algorithm::BacterialForaging,
            Self::BeeColony(_) => Algorithm::BeeColony,
            Self::GreedyCoverage(_) => Algorithm::GreedyCoverage,
        }
    }

    /// Configured agent count for a fresh spawn.
    pub fn population(&self) -> usize {
        match self {
            Self::BacterialForaging(p) => p.population,
            Self::BeeColony(p) => p.num_scouts + p.num_foragers,
            Self::GreedyCoverage(p) => p.num_drones,
        }
    }

    /// Parses parameters from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
