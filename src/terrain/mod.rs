//! Terrain: procedural generation, the region grid and its queries

pub mod generator;
pub use generator::{LayerHeights, TerrainGenerator};

pub mod map;
pub use map::{EditOutcome, TerrainMap, TerrainPickResult};

pub mod surface;
pub use surface::{RegionSurface, SurfaceBlock};
