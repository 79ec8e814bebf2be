//! Per-region surface data handed to presentation
//!
//! A surface lists every accessible block of a region together with the
//! materials around it, which is all a mesher or texture blender needs.

use crate::voxel::region::{Region, RegionCoord, RegionLookup};
use crate::voxel::{BlockMaterial, BlockPosition};

/// An accessible block and its 14 surrounding materials
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceBlock {
    pub position: BlockPosition,
    pub material: BlockMaterial,
    /// Indexed by the slots in [`crate::voxel::neighbor`]
    pub neighbors: [BlockMaterial; 14],
}

/// Published surface of one region, blocks sorted by position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionSurface {
    pub coord: RegionCoord,
    pub blocks: Vec<SurfaceBlock>,
}

impl RegionSurface {
    /// Snapshot the accessible blocks of `region`
    pub fn build<L: RegionLookup>(region: &Region, regions: &L) -> Self {
        let mut blocks: Vec<SurfaceBlock> = region
            .accessible_blocks()
            .values()
            .map(|position| {
                let neighbors = region.get_extended_neighbors(regions, position.x, position.y, position.z);
                SurfaceBlock {
                    position: *position,
                    material: region
                        .get_block(position.x, position.y, position.z)
                        .unwrap_or_default(),
                    neighbors,
                }
            })
            .collect();
        blocks.sort_unstable_by_key(|b| b.position);

        Self { coord: region.coord(), blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
