//! Engine configuration
//!
//! Everything here is serializable so tools can keep tuned values in a JSON
//! file next to a world. Region and block dimensions are compile-time
//! constants and are not configurable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// One fractal noise layer: octave count, persistence, sampling frequency,
/// plus a constant added after the layer's shaping curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub octaves: usize,
    pub persistence: f64,
    pub frequency: f64,
    pub offset: f64,
}

impl NoiseLayer {
    pub const fn new(octaves: usize, persistence: f64, frequency: f64, offset: f64) -> Self {
        Self { octaves, persistence, frequency, offset }
    }
}

/// Parameters for terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub seed: u32,
    /// Base elevation; sampled but not used for any layer threshold
    pub height: NoiseLayer,
    pub rock: NoiseLayer,
    pub clay: NoiseLayer,
    pub soil: NoiseLayer,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            height: NoiseLayer::new(8, 0.1, 0.0004, 0.0),
            rock: NoiseLayer::new(6, 0.20, 0.0060, 16.0),
            clay: NoiseLayer::new(8, 0.20, 0.0005, -40.0),
            soil: NoiseLayer::new(10, 0.11, 0.0001, 0.0),
        }
    }
}

/// Cost model and limits for A* search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Multiplier applied to the Manhattan distance estimate
    pub heuristic_scale: i32,
    pub straight_cost: i32,
    pub diagonal_cost: i32,
    /// Extra cost per block of vertical movement
    pub climb_cost_per_block: i32,
    /// Floor for a single step's cost; long drops would otherwise go negative
    pub min_step_cost: i32,
    /// Maximum fall is `fall_multiplier * jump_height` blocks
    pub fall_multiplier: i32,
    /// Give up after expanding this many nodes
    pub max_expansions: Option<usize>,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            heuristic_scale: 10,
            straight_cost: 10,
            diagonal_cost: 14,
            climb_cost_per_block: 2,
            min_step_cost: 1,
            fall_multiplier: 2,
            max_expansions: None,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub generation: GenerationConfig,
    pub pathfinding: PathfinderConfig,
}

impl EngineConfig {
    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
