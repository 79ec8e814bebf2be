//! Error types for the terrain core

use thiserror::Error;

use crate::voxel::{BlockPosition, RegionCoord};

/// Main error type for the terrain core
#[derive(Debug, Error)]
pub enum Error {
    #[error("region-local coordinate ({x}, {y}, {z}) is out of bounds")]
    OutOfBounds { x: i32, y: i32, z: i32 },

    #[error("world coordinate ({x}, {y}, {z}) is outside the generated terrain")]
    OutsideTerrain { x: f32, y: f32, z: f32 },

    #[error("region {0:?} does not exist")]
    RegionMissing(RegionCoord),

    #[error("block {0:?} is not accessible")]
    NotAccessible(BlockPosition),

    #[error("path search gave up after expanding {expanded} nodes")]
    SearchBudgetExhausted { expanded: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Build an `OutsideTerrain` error from a world-space point
    pub fn outside_terrain(pos: glam::Vec3) -> Self {
        Error::OutsideTerrain { x: pos.x, y: pos.y, z: pos.z }
    }
}
