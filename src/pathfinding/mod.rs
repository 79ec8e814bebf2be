//! Walkable path search for agents on terrain

pub mod agent;
pub mod pathfinder;

pub use agent::{Agent, AgentProfile, PASSABLE_BLOCK_HEIGHT};
pub use pathfinder::{MovementKind, PathStep, Pathfinder};
