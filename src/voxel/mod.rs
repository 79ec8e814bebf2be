//! Voxel data structures: block catalog, addressing, sparse index, regions

pub mod block;
pub mod orientation;
pub mod sparse;
pub mod position;
pub mod region;

pub use block::BlockMaterial;
pub use orientation::Orientation;
pub use sparse::{SparseMatrix, SparseMatrix2D, SparseMatrix3D};
pub use position::{BlockPosition, BLOCK_DIAMETER, BLOCK_HEIGHT};
pub use region::{
    neighbor, AccessibilityScan, NeighborMaterials, Region, RegionCoord, RegionLookup,
    REGION_HEIGHT, REGION_LENGTH, REGION_WIDTH,
};
