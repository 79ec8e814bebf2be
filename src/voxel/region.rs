//! Regions: fixed-size 16x128x16 block grids that tile the terrain
//!
//! Cells are stored in a flat array indexed `x * LENGTH * HEIGHT + z * HEIGHT + y`,
//! so a column is contiguous and scanning upward is a pointer bump.
//!
//! Regions never hold references to each other. Lateral links are grid
//! coordinates resolved through a [`RegionLookup`], normally the owning
//! terrain map's region grid.

use std::ops::Deref;

use crate::core::{Error, Result};
use crate::core::types::Vec3;
use crate::math::Aabb;

use super::block::BlockMaterial;
use super::orientation::Orientation;
use super::position::{BlockPosition, BLOCK_DIAMETER, BLOCK_HEIGHT};
use super::sparse::{SparseMatrix2D, SparseMatrix3D};

/// Blocks along x
pub const REGION_WIDTH: i32 = 16;
/// Blocks along z
pub const REGION_LENGTH: i32 = 16;
/// Blocks along y
pub const REGION_HEIGHT: i32 = 128;

/// Array stride of one x step
pub const BLOCK_INDEXING_FACTOR_X: usize = (REGION_LENGTH * REGION_HEIGHT) as usize;
/// Array stride of one z step
pub const BLOCK_INDEXING_FACTOR_Z: usize = REGION_HEIGHT as usize;
/// Cells per region
pub const REGION_VOLUME: usize = (REGION_WIDTH * REGION_LENGTH * REGION_HEIGHT) as usize;

/// Slots of the array returned by [`Region::get_neighbors`]
pub mod neighbor {
    pub const UP: usize = 0;
    pub const DOWN: usize = 1;
    pub const NORTH: usize = 2;
    pub const EAST: usize = 3;
    pub const SOUTH: usize = 4;
    pub const WEST: usize = 5;
    pub const NORTH_UP: usize = 6;
    pub const NORTH_DOWN: usize = 7;
    pub const EAST_UP: usize = 8;
    pub const EAST_DOWN: usize = 9;
    pub const SOUTH_UP: usize = 10;
    pub const SOUTH_DOWN: usize = 11;
    pub const WEST_UP: usize = 12;
    pub const WEST_DOWN: usize = 13;
}

/// Integer coordinate identifying a region in the terrain grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCoord {
    pub x: i32,
    pub z: i32,
}

impl RegionCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Region containing the global block column `(block_x, block_z)`
    pub fn containing_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(REGION_WIDTH),
            z: block_z.div_euclid(REGION_LENGTH),
        }
    }

    /// Region containing a world-space point, ignoring height
    pub fn from_world_pos(pos: Vec3) -> Self {
        Self {
            x: (pos.x / (REGION_WIDTH as f32 * BLOCK_DIAMETER)).floor() as i32,
            z: (pos.z / (REGION_LENGTH as f32 * BLOCK_DIAMETER)).floor() as i32,
        }
    }

    /// Origin of the region in global block coordinates
    pub fn origin(&self) -> (i32, i32) {
        (self.x * REGION_WIDTH, self.z * REGION_LENGTH)
    }

    /// Adjacent grid cell in a lateral direction; up/down return `self`
    pub fn neighbor(&self, orientation: Orientation) -> Self {
        let (dx, _, dz) = orientation.offset();
        Self::new(self.x + dx, self.z + dz)
    }

    /// Key into a 2D sparse matrix
    pub fn key(&self) -> [i32; 2] {
        [self.x, self.z]
    }

    /// World-space bounds of the whole region column
    pub fn world_bounds(&self) -> Aabb {
        let (ox, oz) = self.origin();
        Aabb::from_origin_size(
            Vec3::new(ox as f32 * BLOCK_DIAMETER, 0.0, oz as f32 * BLOCK_DIAMETER),
            Vec3::new(
                REGION_WIDTH as f32 * BLOCK_DIAMETER,
                REGION_HEIGHT as f32 * BLOCK_HEIGHT,
                REGION_LENGTH as f32 * BLOCK_DIAMETER,
            ),
        )
    }
}

/// Resolves region grid coordinates to regions
pub trait RegionLookup {
    fn region(&self, coord: RegionCoord) -> Option<&Region>;
}

impl RegionLookup for SparseMatrix2D<Region> {
    fn region(&self, coord: RegionCoord) -> Option<&Region> {
        self.get(coord.key())
    }
}

/// Materials around a cell, see [`neighbor`] for slot meanings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborMaterials {
    /// Up, down, north, east, south, west
    Direct([BlockMaterial; 6]),
    /// Direct neighbors followed by the up/down cells of each lateral neighbor
    Extended([BlockMaterial; 14]),
}

impl NeighborMaterials {
    pub fn as_slice(&self) -> &[BlockMaterial] {
        match self {
            NeighborMaterials::Direct(m) => m,
            NeighborMaterials::Extended(m) => m,
        }
    }
}

impl Deref for NeighborMaterials {
    type Target = [BlockMaterial];

    fn deref(&self) -> &[BlockMaterial] {
        self.as_slice()
    }
}

/// Result of an accessibility pass, applied with [`Region::apply_accessibility`]
#[derive(Debug)]
pub struct AccessibilityScan {
    accessible: SparseMatrix3D<BlockPosition>,
    grass: Vec<usize>,
}

impl AccessibilityScan {
    /// Number of accessible cells found
    pub fn accessible_count(&self) -> usize {
        self.accessible.len()
    }

    /// Number of soil cells that turn to grass
    pub fn grass_count(&self) -> usize {
        self.grass.len()
    }
}

/// One tile of terrain
#[derive(Clone, Debug)]
pub struct Region {
    coord: RegionCoord,
    blocks: Vec<BlockMaterial>,
    /// Lateral links, indexed by `Orientation::lateral_index`
    neighbors: [Option<RegionCoord>; 4],
    accessible: SparseMatrix3D<BlockPosition>,
    changed: bool,
}

impl Region {
    /// Create a region filled with air
    pub fn new(coord: RegionCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockMaterial::None; REGION_VOLUME],
            neighbors: [None; 4],
            accessible: SparseMatrix3D::new(),
            changed: true,
        }
    }

    /// Create a region from a full block array in storage order
    pub(crate) fn from_blocks(coord: RegionCoord, blocks: Vec<BlockMaterial>) -> Self {
        debug_assert_eq!(blocks.len(), REGION_VOLUME);
        Self {
            blocks,
            ..Self::new(coord)
        }
    }

    /// Array index of a local cell, `None` when out of bounds
    #[inline]
    pub fn block_index(x: i32, y: i32, z: i32) -> Option<usize> {
        if (0..REGION_WIDTH).contains(&x)
            && (0..REGION_HEIGHT).contains(&y)
            && (0..REGION_LENGTH).contains(&z)
        {
            Some(x as usize * BLOCK_INDEXING_FACTOR_X + z as usize * BLOCK_INDEXING_FACTOR_Z + y as usize)
        } else {
            None
        }
    }

    fn checked_index(x: i32, y: i32, z: i32) -> Result<usize> {
        Self::block_index(x, y, z).ok_or(Error::OutOfBounds { x, y, z })
    }

    pub fn coord(&self) -> RegionCoord {
        self.coord
    }

    /// World origin in blocks
    pub fn origin(&self) -> (i32, i32) {
        self.coord.origin()
    }

    /// Raw cells in storage order
    pub fn blocks(&self) -> &[BlockMaterial] {
        &self.blocks
    }

    /// Material at a local cell
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<BlockMaterial> {
        Ok(self.blocks[Self::checked_index(x, y, z)?])
    }

    /// Overwrite a local cell. Accessibility is not recomputed.
    pub fn set_block(&mut self, material: BlockMaterial, x: i32, y: i32, z: i32) -> Result<()> {
        let index = Self::checked_index(x, y, z)?;
        self.blocks[index] = material;
        self.changed = true;
        Ok(())
    }

    /// Position value for a local cell of this region
    pub fn block_position(&self, x: i32, y: i32, z: i32) -> BlockPosition {
        let (ox, oz) = self.origin();
        BlockPosition::new(x, y, z, ox, oz)
    }

    /// Linked neighbor in a lateral direction
    pub fn neighbor(&self, orientation: Orientation) -> Option<RegionCoord> {
        orientation.lateral_index().and_then(|i| self.neighbors[i])
    }

    fn linked<'a, L: RegionLookup>(&self, regions: &'a L, orientation: Orientation) -> Option<&'a Region> {
        self.neighbor(orientation).and_then(|c| regions.region(c))
    }

    fn link(&mut self, orientation: Orientation, coord: RegionCoord) {
        if let Some(i) = orientation.lateral_index() {
            self.neighbors[i] = Some(coord);
        }
    }

    fn link_both(&mut self, other: &mut Region, orientation: Orientation) {
        self.link(orientation, other.coord);
        other.link(orientation.opposite(), self.coord);
    }

    /// Link to the regions east and south of this one; each links back west/north.
    pub fn connect_regions(&mut self, east: Option<&mut Region>, south: Option<&mut Region>) {
        if let Some(east) = east {
            self.link_both(east, Orientation::East);
        }
        if let Some(south) = south {
            self.link_both(south, Orientation::South);
        }
    }

    /// Material at local coordinates that may lie outside this region.
    ///
    /// Lateral overflow follows neighbor links; a missing link or a height
    /// outside the region yields air.
    pub fn material_at<'a, L: RegionLookup>(
        &'a self,
        regions: &'a L,
        x: i32,
        y: i32,
        z: i32,
    ) -> BlockMaterial {
        if !(0..REGION_HEIGHT).contains(&y) {
            return BlockMaterial::None;
        }

        let mut region: &'a Region = self;
        let (mut x, mut z) = (x, z);

        while x < 0 {
            let Some(next) = region.linked(regions, Orientation::West) else { return BlockMaterial::None };
            region = next;
            x += REGION_WIDTH;
        }
        while x >= REGION_WIDTH {
            let Some(next) = region.linked(regions, Orientation::East) else { return BlockMaterial::None };
            region = next;
            x -= REGION_WIDTH;
        }
        while z < 0 {
            let Some(next) = region.linked(regions, Orientation::North) else { return BlockMaterial::None };
            region = next;
            z += REGION_LENGTH;
        }
        while z >= REGION_LENGTH {
            let Some(next) = region.linked(regions, Orientation::South) else { return BlockMaterial::None };
            region = next;
            z -= REGION_LENGTH;
        }

        match Self::block_index(x, y, z) {
            Some(index) => region.blocks[index],
            None => BlockMaterial::None,
        }
    }

    /// Materials around a local cell.
    ///
    /// With `direct_only` the 6 face neighbors are returned, otherwise 14
    /// entries that add the cells above and below each lateral neighbor.
    pub fn get_neighbors<L: RegionLookup>(
        &self,
        regions: &L,
        x: i32,
        y: i32,
        z: i32,
        direct_only: bool,
    ) -> NeighborMaterials {
        if direct_only {
            NeighborMaterials::Direct(self.direct_neighbors(regions, x, y, z))
        } else {
            NeighborMaterials::Extended(self.get_extended_neighbors(regions, x, y, z))
        }
    }

    /// All 14 neighbor materials of a local cell, indexed by [`neighbor`] slot
    pub fn get_extended_neighbors<L: RegionLookup>(&self, regions: &L, x: i32, y: i32, z: i32) -> [BlockMaterial; 14] {
        let at = |dx: i32, dy: i32, dz: i32| self.material_at(regions, x + dx, y + dy, z + dz);

        let mut all = [BlockMaterial::None; 14];
        all[..6].copy_from_slice(&self.direct_neighbors(regions, x, y, z));
        all[neighbor::NORTH_UP] = at(0, 1, -1);
        all[neighbor::NORTH_DOWN] = at(0, -1, -1);
        all[neighbor::EAST_UP] = at(1, 1, 0);
        all[neighbor::EAST_DOWN] = at(1, -1, 0);
        all[neighbor::SOUTH_UP] = at(0, 1, 1);
        all[neighbor::SOUTH_DOWN] = at(0, -1, 1);
        all[neighbor::WEST_UP] = at(-1, 1, 0);
        all[neighbor::WEST_DOWN] = at(-1, -1, 0);
        all
    }

    fn direct_neighbors<L: RegionLookup>(&self, regions: &L, x: i32, y: i32, z: i32) -> [BlockMaterial; 6] {
        let at = |dx: i32, dy: i32, dz: i32| self.material_at(regions, x + dx, y + dy, z + dz);
        [
            at(0, 1, 0),
            at(0, -1, 0),
            at(0, 0, -1),
            at(1, 0, 0),
            at(0, 0, 1),
            at(-1, 0, 0),
        ]
    }

    /// True when every cell above `(x, y, z)` up to the region ceiling is air
    pub fn has_sunlight(&self, x: i32, y: i32, z: i32) -> Result<bool> {
        let index = Self::checked_index(x, y, z)?;
        Ok(self.sunlit(index, y))
    }

    fn sunlit(&self, index: usize, y: i32) -> bool {
        let above = (REGION_HEIGHT - 1 - y) as usize;
        self.blocks[index + 1..=index + above].iter().all(|m| m.is_empty())
    }

    /// Count of consecutive air cells directly above a local cell
    pub fn free_blocks_above(&self, x: i32, y: i32, z: i32) -> Result<u32> {
        let index = Self::checked_index(x, y, z)?;
        let above = (REGION_HEIGHT - 1 - y) as usize;
        Ok(self.blocks[index + 1..=index + above]
            .iter()
            .take_while(|m| m.is_empty())
            .count() as u32)
    }

    /// Find accessible cells without mutating anything.
    ///
    /// A solid cell is accessible when its up, north, east, south or west
    /// neighbor is air; the cell below does not count. The outermost ring on
    /// any side without a linked neighbor is skipped.
    pub fn scan_accessibility<L: RegionLookup>(&self, regions: &L) -> AccessibilityScan {
        let start_x = if self.neighbor(Orientation::West).is_some() { 0 } else { 1 };
        let end_x = if self.neighbor(Orientation::East).is_some() { REGION_WIDTH } else { REGION_WIDTH - 1 };
        let start_z = if self.neighbor(Orientation::North).is_some() { 0 } else { 1 };
        let end_z = if self.neighbor(Orientation::South).is_some() { REGION_LENGTH } else { REGION_LENGTH - 1 };

        let (ox, oz) = self.origin();
        let mut accessible = SparseMatrix3D::new();
        let mut grass = Vec::new();

        for x in start_x..end_x {
            for z in start_z..end_z {
                let column = x as usize * BLOCK_INDEXING_FACTOR_X + z as usize * BLOCK_INDEXING_FACTOR_Z;
                // bottom up
                for y in 0..REGION_HEIGHT {
                    let index = column + y as usize;
                    let block = self.blocks[index];
                    if block.is_empty() {
                        continue;
                    }

                    let up_open = y == REGION_HEIGHT - 1 || self.blocks[index + 1].is_empty();
                    let is_accessible = up_open
                        || self.material_at(regions, x, y, z - 1).is_empty()
                        || self.material_at(regions, x + 1, y, z).is_empty()
                        || self.material_at(regions, x, y, z + 1).is_empty()
                        || self.material_at(regions, x - 1, y, z).is_empty();

                    if is_accessible {
                        if block == BlockMaterial::Soil && self.sunlit(index, y) {
                            grass.push(index);
                        }
                        accessible.insert([x, y, z], BlockPosition::new(x, y, z, ox, oz));
                    }
                }
            }
        }

        AccessibilityScan { accessible, grass }
    }

    /// Install a scan: replace the accessible index and grow grass on sunlit soil
    pub fn apply_accessibility(&mut self, scan: AccessibilityScan) {
        for index in scan.grass {
            self.blocks[index] = BlockMaterial::Grass;
        }
        self.accessible = scan.accessible;
        self.changed = true;
    }

    /// Rebuild the accessible index from scratch, converting sunlit surface soil to grass
    pub fn calculate_accessible_blocks<L: RegionLookup>(&mut self, regions: &L) {
        let scan = self.scan_accessibility(regions);
        self.apply_accessibility(scan);
    }

    /// Index of accessible cells keyed by local `[x, y, z]`
    pub fn accessible_blocks(&self) -> &SparseMatrix3D<BlockPosition> {
        &self.accessible
    }

    /// Accessible block at a local cell
    pub fn accessible_block(&self, x: i32, y: i32, z: i32) -> Option<&BlockPosition> {
        self.accessible.get([x, y, z])
    }

    /// Bounds of the region, tightened vertically to its accessible cells.
    /// `None` when nothing is accessible.
    pub fn accessible_bounds(&self) -> Option<Aabb> {
        let (min, max) = (self.accessible.min()?, self.accessible.max()?);
        let full = self.coord.world_bounds();
        Some(Aabb::new(
            Vec3::new(full.min.x, min[1] as f32 * BLOCK_HEIGHT, full.min.z),
            Vec3::new(full.max.x, (max[1] + 1) as f32 * BLOCK_HEIGHT, full.max.z),
        ))
    }

    /// Whether blocks or accessibility changed since presentation data was last built
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub(crate) fn mark_presented(&mut self) {
        self.changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_region(coord: RegionCoord, top: i32, material: BlockMaterial) -> Region {
        let mut region = Region::new(coord);
        for x in 0..REGION_WIDTH {
            for z in 0..REGION_LENGTH {
                for y in 0..=top {
                    region.set_block(material, x, y, z).unwrap();
                }
            }
        }
        region
    }

    #[test]
    fn test_indexing_round_trip() {
        let mut region = Region::new(RegionCoord::new(0, 0));
        let cells = [(0, 0, 0), (15, 127, 15), (3, 64, 9), (15, 0, 0), (0, 127, 15)];
        for (i, (x, y, z)) in cells.iter().copied().enumerate() {
            let material = BlockMaterial::ALL[i + 1];
            region.set_block(material, x, y, z).unwrap();
            assert_eq!(region.get_block(x, y, z).unwrap(), material);
        }
    }

    #[test]
    fn test_indexing_layout_is_column_major() {
        assert_eq!(Region::block_index(0, 1, 0), Some(1));
        assert_eq!(Region::block_index(0, 0, 1), Some(128));
        assert_eq!(Region::block_index(1, 0, 0), Some(2048));
        assert_eq!(Region::block_index(15, 127, 15), Some(REGION_VOLUME - 1));
    }

    #[test]
    fn test_out_of_bounds_fails() {
        let mut region = Region::new(RegionCoord::new(0, 0));
        assert!(matches!(region.get_block(16, 0, 0), Err(Error::OutOfBounds { x: 16, .. })));
        assert!(matches!(region.get_block(0, -1, 0), Err(Error::OutOfBounds { .. })));
        assert!(matches!(region.get_block(0, 128, 0), Err(Error::OutOfBounds { .. })));
        assert!(region.set_block(BlockMaterial::Rock, 0, 0, 16).is_err());
    }

    #[test]
    fn test_has_sunlight() {
        let mut region = Region::new(RegionCoord::new(0, 0));
        region.set_block(BlockMaterial::Soil, 4, 10, 4).unwrap();
        assert!(region.has_sunlight(4, 10, 4).unwrap());
        assert!(region.has_sunlight(4, 127, 4).unwrap());

        region.set_block(BlockMaterial::Rock, 4, 120, 4).unwrap();
        assert!(!region.has_sunlight(4, 10, 4).unwrap());
        assert!(region.has_sunlight(4, 120, 4).unwrap());
    }

    #[test]
    fn test_free_blocks_above() {
        let mut region = Region::new(RegionCoord::new(0, 0));
        region.set_block(BlockMaterial::Rock, 2, 5, 2).unwrap();
        region.set_block(BlockMaterial::Rock, 2, 9, 2).unwrap();
        assert_eq!(region.free_blocks_above(2, 5, 2).unwrap(), 3);
        assert_eq!(region.free_blocks_above(2, 9, 2).unwrap(), 118);
        assert_eq!(region.free_blocks_above(2, 127, 2).unwrap(), 0);
    }

    #[test]
    fn test_direct_neighbors_isolated_region() {
        let region = flat_region(RegionCoord::new(0, 0), 3, BlockMaterial::Rock);
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();

        let inner = region.get_neighbors(&regions, 5, 3, 5, true);
        assert_eq!(inner.len(), 6);
        assert_eq!(inner[neighbor::UP], BlockMaterial::None);
        assert_eq!(inner[neighbor::DOWN], BlockMaterial::Rock);
        assert_eq!(inner[neighbor::NORTH], BlockMaterial::Rock);
        assert_eq!(inner[neighbor::WEST], BlockMaterial::Rock);

        // Walking off an unlinked edge reads as air
        let edge = region.get_neighbors(&regions, 15, 2, 0, true);
        assert_eq!(edge[neighbor::EAST], BlockMaterial::None);
        assert_eq!(edge[neighbor::NORTH], BlockMaterial::None);
        assert_eq!(edge[neighbor::WEST], BlockMaterial::Rock);

        // Bottom layer has nothing below
        let bottom = region.get_neighbors(&regions, 5, 0, 5, true);
        assert_eq!(bottom[neighbor::DOWN], BlockMaterial::None);
    }

    #[test]
    fn test_extended_neighbors() {
        let mut region = flat_region(RegionCoord::new(0, 0), 3, BlockMaterial::Rock);
        region.set_block(BlockMaterial::Clay, 6, 4, 5).unwrap();
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();

        let all = region.get_neighbors(&regions, 5, 3, 5, false);
        assert_eq!(all.len(), 14);
        assert_eq!(all[neighbor::EAST_UP], BlockMaterial::Clay);
        assert_eq!(all[neighbor::EAST_DOWN], BlockMaterial::Rock);
        assert_eq!(all[neighbor::WEST_UP], BlockMaterial::None);
        assert_eq!(all[neighbor::NORTH_DOWN], BlockMaterial::Rock);

        // Top of the region never wraps into another column
        let top = region.get_neighbors(&regions, 5, 127, 5, false);
        assert_eq!(top[neighbor::UP], BlockMaterial::None);
        assert_eq!(top[neighbor::EAST_UP], BlockMaterial::None);

        let extended = region.get_extended_neighbors(&regions, 5, 3, 5);
        assert_eq!(&extended[..], all.as_slice());
        assert_eq!(extended[..6], region.get_neighbors(&regions, 5, 3, 5, true)[..]);
    }

    #[test]
    fn test_cross_region_neighbors() {
        let mut west = Region::new(RegionCoord::new(0, 0));
        let mut east = Region::new(RegionCoord::new(1, 0));
        west.set_block(BlockMaterial::Rock, 15, 7, 3).unwrap();
        east.set_block(BlockMaterial::Sand, 0, 7, 3).unwrap();
        west.connect_regions(Some(&mut east), None);

        assert_eq!(west.neighbor(Orientation::East), Some(RegionCoord::new(1, 0)));
        assert_eq!(east.neighbor(Orientation::West), Some(RegionCoord::new(0, 0)));

        let mut regions = SparseMatrix2D::new();
        regions.insert(west.coord().key(), west);
        regions.insert(east.coord().key(), east);

        let west = regions.region(RegionCoord::new(0, 0)).unwrap();
        let east = regions.region(RegionCoord::new(1, 0)).unwrap();
        assert_eq!(west.get_neighbors(&regions, 15, 7, 3, true)[neighbor::EAST], BlockMaterial::Sand);
        assert_eq!(east.get_neighbors(&regions, 0, 7, 3, true)[neighbor::WEST], BlockMaterial::Rock);

        // No link to the north: air, not a failure
        assert_eq!(west.get_neighbors(&regions, 15, 7, 0, true)[neighbor::NORTH], BlockMaterial::None);
    }

    #[test]
    fn test_connect_regions_is_idempotent() {
        let mut a = Region::new(RegionCoord::new(0, 0));
        let mut east = Region::new(RegionCoord::new(1, 0));
        let mut south = Region::new(RegionCoord::new(0, 1));
        a.connect_regions(Some(&mut east), Some(&mut south));
        a.connect_regions(Some(&mut east), Some(&mut south));

        assert_eq!(a.neighbor(Orientation::East), Some(east.coord()));
        assert_eq!(a.neighbor(Orientation::South), Some(south.coord()));
        assert_eq!(a.neighbor(Orientation::North), None);
        assert_eq!(a.neighbor(Orientation::West), None);
        assert_eq!(south.neighbor(Orientation::North), Some(a.coord()));
        assert_eq!(east.neighbor(Orientation::West), Some(a.coord()));
    }

    #[test]
    fn test_accessible_surface_of_isolated_slab() {
        let mut region = flat_region(RegionCoord::new(0, 0), 3, BlockMaterial::Rock);
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();
        region.calculate_accessible_blocks(&regions);

        // Outer ring skipped, only the top layer is exposed inside it
        assert_eq!(region.accessible_blocks().len(), 14 * 14);
        assert!(region.accessible_block(5, 3, 5).is_some());
        assert!(region.accessible_block(5, 2, 5).is_none());
        assert!(region.accessible_block(0, 3, 5).is_none());
        assert!(region.accessible_block(1, 2, 1).is_none());
        for pos in region.accessible_blocks().values() {
            assert_eq!(pos.y, 3);
        }
    }

    #[test]
    fn test_undercut_block_is_not_accessible() {
        let mut region = flat_region(RegionCoord::new(0, 0), 3, BlockMaterial::Rock);
        region.set_block(BlockMaterial::None, 5, 1, 5).unwrap();
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();
        region.calculate_accessible_blocks(&regions);

        // Air below does not expose a block
        assert!(region.accessible_block(5, 2, 5).is_none());
        // The floor of the cavity is exposed upward
        assert!(region.accessible_block(5, 0, 5).is_some());
        // Cavity walls are exposed sideways
        assert!(region.accessible_block(4, 1, 5).is_some());
        assert!(region.accessible_block(5, 1, 6).is_some());
    }

    #[test]
    fn test_accessibility_matches_neighbor_rule() {
        let mut region = flat_region(RegionCoord::new(0, 0), 5, BlockMaterial::Clay);
        region.set_block(BlockMaterial::None, 7, 5, 7).unwrap();
        region.set_block(BlockMaterial::None, 8, 4, 7).unwrap();
        region.set_block(BlockMaterial::Rock, 3, 6, 3).unwrap();
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();
        region.calculate_accessible_blocks(&regions);

        for x in 1..REGION_WIDTH - 1 {
            for z in 1..REGION_LENGTH - 1 {
                for y in 0..REGION_HEIGHT {
                    let block = region.get_block(x, y, z).unwrap();
                    let n = region.get_neighbors(&regions, x, y, z, true);
                    let expected = block.is_solid()
                        && [neighbor::UP, neighbor::NORTH, neighbor::EAST, neighbor::SOUTH, neighbor::WEST]
                            .iter()
                            .any(|&slot| n[slot].is_empty());
                    assert_eq!(
                        region.accessible_block(x, y, z).is_some(),
                        expected,
                        "cell ({}, {}, {})",
                        x, y, z
                    );
                }
            }
        }
    }

    #[test]
    fn test_grass_conversion_and_idempotence() {
        let mut region = flat_region(RegionCoord::new(0, 0), 2, BlockMaterial::Rock);
        for x in 0..REGION_WIDTH {
            for z in 0..REGION_LENGTH {
                region.set_block(BlockMaterial::Soil, x, 3, z).unwrap();
            }
        }
        // A rock overhang keeps one soil cell in shade
        region.set_block(BlockMaterial::Rock, 6, 20, 6).unwrap();
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();

        region.calculate_accessible_blocks(&regions);
        assert_eq!(region.get_block(5, 3, 5).unwrap(), BlockMaterial::Grass);
        assert_eq!(region.get_block(6, 3, 6).unwrap(), BlockMaterial::Soil);
        // Skipped outer ring stays soil
        assert_eq!(region.get_block(0, 3, 0).unwrap(), BlockMaterial::Soil);

        let blocks_before = region.blocks().to_vec();
        let mut index_before = region.accessible_blocks().sorted_keys();

        region.calculate_accessible_blocks(&regions);
        assert_eq!(region.blocks(), &blocks_before[..]);
        let mut index_after = region.accessible_blocks().sorted_keys();
        index_before.sort();
        index_after.sort();
        assert_eq!(index_before, index_after);
    }

    #[test]
    fn test_scan_does_not_mutate() {
        let mut region = flat_region(RegionCoord::new(0, 0), 3, BlockMaterial::Soil);
        region.mark_presented();
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();

        let scan = region.scan_accessibility(&regions);
        assert_eq!(scan.accessible_count(), 14 * 14);
        assert_eq!(scan.grass_count(), 14 * 14);
        assert!(region.accessible_blocks().is_empty());
        assert!(!region.has_changed());

        region.apply_accessibility(scan);
        assert!(region.has_changed());
        assert_eq!(region.get_block(4, 3, 4).unwrap(), BlockMaterial::Grass);
    }

    #[test]
    fn test_accessible_bounds() {
        let mut region = flat_region(RegionCoord::new(1, 0), 3, BlockMaterial::Rock);
        let regions: SparseMatrix2D<Region> = SparseMatrix2D::new();
        assert!(region.accessible_bounds().is_none());

        region.calculate_accessible_blocks(&regions);
        let bounds = region.accessible_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(16.0, 1.5, 0.0));
        assert_eq!(bounds.max, Vec3::new(32.0, 2.0, 16.0));
    }

    #[test]
    fn test_region_coord_from_world_pos() {
        assert_eq!(RegionCoord::from_world_pos(Vec3::new(0.5, 3.0, 15.9)), RegionCoord::new(0, 0));
        assert_eq!(RegionCoord::from_world_pos(Vec3::new(16.0, 0.0, 33.0)), RegionCoord::new(1, 2));
        assert_eq!(RegionCoord::from_world_pos(Vec3::new(-0.5, 0.0, 0.0)), RegionCoord::new(-1, 0));
    }
}
