//! Block addressing: region-relative cell coordinates plus the owning region's origin

use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;

use super::region::{RegionCoord, REGION_LENGTH, REGION_WIDTH};

/// Height of a block in world units
pub const BLOCK_HEIGHT: f32 = 0.5;
/// Width and length of a block in world units
pub const BLOCK_DIAMETER: f32 = 1.0;

/// Identifies one terrain cell.
///
/// `x`, `y`, `z` are local to the region whose world origin (in blocks) is
/// `(region_x, region_z)`. Equality and hashing cover all five fields, so the
/// same local offset in two different regions is two different positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub region_x: i32,
    pub region_z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32, region_x: i32, region_z: i32) -> Self {
        Self { x, y, z, region_x, region_z }
    }

    /// Position of the cell at global block coordinates `block`
    pub fn from_world_block(block: IVec3) -> Self {
        let region = RegionCoord::containing_block(block.x, block.z);
        let (origin_x, origin_z) = region.origin();
        Self {
            x: block.x - origin_x,
            y: block.y,
            z: block.z - origin_z,
            region_x: origin_x,
            region_z: origin_z,
        }
    }

    /// Global block coordinates
    pub fn world_block(&self) -> IVec3 {
        IVec3::new(self.region_x + self.x, self.y, self.region_z + self.z)
    }

    /// Minimum corner of the block in world space
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(
            (self.region_x + self.x) as f32 * BLOCK_DIAMETER,
            self.y as f32 * BLOCK_HEIGHT,
            (self.region_z + self.z) as f32 * BLOCK_DIAMETER,
        )
    }

    /// World-space bounds of the block
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_origin_size(
            self.world_position(),
            Vec3::new(BLOCK_DIAMETER, BLOCK_HEIGHT, BLOCK_DIAMETER),
        )
    }

    /// Grid coordinate of the owning region
    pub fn region_coord(&self) -> RegionCoord {
        RegionCoord::new(
            self.region_x.div_euclid(REGION_WIDTH),
            self.region_z.div_euclid(REGION_LENGTH),
        )
    }

    /// Local coordinates as an index key
    pub fn local(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// The cell `(dx, dy, dz)` away, re-homed into whichever region owns it
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::from_world_block(self.world_block() + IVec3::new(dx, dy, dz))
    }
}
