//! Hamlet - voxel terrain and pathfinding core for a town-building game

pub mod core;
pub mod math;
pub mod voxel;
pub mod config;
pub mod terrain;
pub mod pathfinding;

pub use config::EngineConfig;
pub use terrain::TerrainMap;
pub use pathfinding::Pathfinder;
