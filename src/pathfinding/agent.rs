//! Mobile agents as seen by the pathfinder

use crate::core::types::Vec3;
use crate::voxel::{BlockPosition, BLOCK_DIAMETER, BLOCK_HEIGHT};

/// Standing height of a villager in world units
pub const AGENT_HEIGHT: f32 = 2.0;
/// Blocks of clearance a standing villager needs: `ceil(AGENT_HEIGHT / BLOCK_HEIGHT)`
pub const PASSABLE_BLOCK_HEIGHT: i32 = 4;
/// Blocks a villager can climb in one step
pub const DEFAULT_JUMP_HEIGHT: i32 = 2;

/// Physical constraints of something that walks on terrain
pub trait Agent {
    /// World point inside the block the agent stands on
    fn world_position(&self) -> Vec3;
    /// Maximum blocks climbed in one step
    fn jump_height(&self) -> i32;
    /// Vertical clearance in blocks needed to occupy a cell
    fn bound_height(&self) -> i32;
}

/// Plain agent description
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentProfile {
    pub position: Vec3,
    pub jump_height: i32,
    pub bound_height: i32,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            jump_height: DEFAULT_JUMP_HEIGHT,
            bound_height: PASSABLE_BLOCK_HEIGHT,
        }
    }
}

impl AgentProfile {
    /// Default agent standing on `block`, positioned at the block's center
    pub fn standing_on(block: BlockPosition) -> Self {
        let position = block.world_position()
            + Vec3::new(BLOCK_DIAMETER * 0.5, BLOCK_HEIGHT * 0.5, BLOCK_DIAMETER * 0.5);
        Self { position, ..Default::default() }
    }

    pub fn with_jump_height(mut self, jump_height: i32) -> Self {
        self.jump_height = jump_height;
        self
    }

    pub fn with_bound_height(mut self, bound_height: i32) -> Self {
        self.bound_height = bound_height;
        self
    }
}

impl Agent for AgentProfile {
    fn world_position(&self) -> Vec3 {
        self.position
    }

    fn jump_height(&self) -> i32 {
        self.jump_height
    }

    fn bound_height(&self) -> i32 {
        self.bound_height
    }
}
