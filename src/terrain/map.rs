//! Terrain map: the region grid, world generation, queries and edits

use rayon::prelude::*;

use crate::config::GenerationConfig;
use crate::core::types::Vec3;
use crate::core::{Error, Result};
use crate::math::{Aabb, Ray};
use crate::voxel::region::{Region, RegionCoord, RegionLookup, REGION_HEIGHT, REGION_LENGTH, REGION_WIDTH};
use crate::voxel::{
    BlockMaterial, BlockPosition, Orientation, SparseMatrix2D, BLOCK_DIAMETER, BLOCK_HEIGHT,
};

use super::generator::TerrainGenerator;
use super::surface::RegionSurface;

/// Closest accessible block hit by a ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPickResult {
    pub region: RegionCoord,
    pub block_position: BlockPosition,
    /// Distance along the ray to the block's bounding box
    pub distance: f32,
    /// Air cells directly above the block, up to the region ceiling
    pub free_blocks_above: u32,
}

/// Regions recomputed by an edit, in the order they were recomputed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub recalculated: Vec<RegionCoord>,
}

/// Owns every region of the world.
///
/// Regions are only mutated through the map, which keeps neighbor links,
/// accessible indices and published surfaces consistent.
pub struct TerrainMap {
    generator: TerrainGenerator,
    regions: SparseMatrix2D<Region>,
    surfaces: SparseMatrix2D<RegionSurface>,
}

impl TerrainMap {
    /// Create an empty map
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            generator: TerrainGenerator::new(config),
            regions: SparseMatrix2D::new(),
            surfaces: SparseMatrix2D::new(),
        }
    }

    /// Build a map from prepared regions: connect adjacent pairs, compute
    /// accessibility and publish surfaces
    pub fn from_regions(config: GenerationConfig, regions: impl IntoIterator<Item = Region>) -> Self {
        let mut map = Self::new(config);
        for region in regions {
            map.regions.insert(region.coord().key(), region);
        }
        map.build();
        map
    }

    /// Generate a `width x length` grid of regions starting at grid origin,
    /// replacing anything already in the map
    pub fn generate_random_world(&mut self, width: i32, length: i32) {
        let start = std::time::Instant::now();
        let coords: Vec<RegionCoord> = (0..width)
            .flat_map(|x| (0..length).map(move |z| RegionCoord::new(x, z)))
            .collect();

        log::info!(
            "Generating {}x{} regions (seed {})...",
            width,
            length,
            self.generator.config().seed
        );

        let generator = &self.generator;
        let regions: Vec<Region> = coords
            .par_iter()
            .map(|&coord| generator.generate_region(coord))
            .collect();

        self.regions = SparseMatrix2D::new();
        self.surfaces = SparseMatrix2D::new();
        for region in regions {
            self.regions.insert(region.coord().key(), region);
        }
        self.build();

        let accessible: usize = self.regions.values().map(|r| r.accessible_blocks().len()).sum();
        log::info!(
            "Generated {} regions with {} accessible blocks in {:.2}s",
            self.regions.len(),
            accessible,
            start.elapsed().as_secs_f64()
        );
    }

    fn build(&mut self) {
        self.connect_all();
        self.recalculate_all();
        let coords: Vec<RegionCoord> = self
            .regions
            .sorted_keys()
            .into_iter()
            .map(|[x, z]| RegionCoord::new(x, z))
            .collect();
        self.publish_surfaces(&coords);
    }

    fn connect_all(&mut self) {
        for [x, z] in self.regions.sorted_keys() {
            self.connect(RegionCoord::new(x, z));
        }
    }

    /// Link a region with its east and south grid neighbors, if present
    fn connect(&mut self, coord: RegionCoord) {
        let Some(mut region) = self.regions.remove(coord.key()) else {
            return;
        };
        let mut east = self.regions.remove(coord.neighbor(Orientation::East).key());
        let mut south = self.regions.remove(coord.neighbor(Orientation::South).key());

        region.connect_regions(east.as_mut(), south.as_mut());

        for region in [Some(region), east, south].into_iter().flatten() {
            self.regions.insert(region.coord().key(), region);
        }
    }

    /// Recompute every region's accessible index. Scans only read block
    /// materials, so they run in parallel before being applied.
    fn recalculate_all(&mut self) {
        let regions = &self.regions;
        let scans: Vec<_> = regions
            .sorted_keys()
            .par_iter()
            .filter_map(|&key| regions.get(key).map(|r| (key, r.scan_accessibility(regions))))
            .collect();

        for (key, scan) in scans {
            if let Some(region) = self.regions.get_mut(key) {
                region.apply_accessibility(scan);
            }
        }
    }

    /// Recompute one region's accessible index from its current blocks
    pub fn recalculate_region(&mut self, coord: RegionCoord) -> Result<()> {
        let region = self.regions.get(coord.key()).ok_or(Error::RegionMissing(coord))?;
        let scan = region.scan_accessibility(&self.regions);
        log::debug!(
            "Region {:?}: {} accessible blocks, {} new grass",
            coord,
            scan.accessible_count(),
            scan.grass_count()
        );

        let region = self.regions.get_mut(coord.key()).ok_or(Error::RegionMissing(coord))?;
        region.apply_accessibility(scan);
        Ok(())
    }

    fn publish_surfaces(&mut self, coords: &[RegionCoord]) {
        for &coord in coords {
            let Some(region) = self.regions.get(coord.key()) else {
                continue;
            };
            let surface = RegionSurface::build(region, &self.regions);
            self.surfaces.insert(coord.key(), surface);
            if let Some(region) = self.regions.get_mut(coord.key()) {
                region.mark_presented();
            }
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        self.generator.config()
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// The region grid
    pub fn regions(&self) -> &SparseMatrix2D<Region> {
        &self.regions
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Published surface of a region
    pub fn surface(&self, coord: RegionCoord) -> Option<&RegionSurface> {
        self.surfaces.get(coord.key())
    }

    /// All published surfaces, in no particular order
    pub fn surfaces(&self) -> impl Iterator<Item = &RegionSurface> {
        self.surfaces.values()
    }

    /// World-space rectangle covered by generated regions
    pub fn world_bounds(&self) -> Option<Aabb> {
        let (min, max) = (self.regions.min()?, self.regions.max()?);
        let lo = RegionCoord::new(min[0], min[1]).world_bounds();
        let hi = RegionCoord::new(max[0], max[1]).world_bounds();
        Some(Aabb::new(lo.min, hi.max))
    }

    /// Region owning a world-space point, ignoring height
    pub fn get_region_for_world_coordinates(&self, pos: Vec3) -> Option<&Region> {
        self.regions.region(RegionCoord::from_world_pos(pos))
    }

    /// Block cell containing a world-space point
    pub fn get_block_position_for_world_coordinates(&self, pos: Vec3) -> Result<BlockPosition> {
        let region = self
            .get_region_for_world_coordinates(pos)
            .ok_or_else(|| Error::outside_terrain(pos))?;
        let (ox, oz) = region.origin();

        let x = (pos.x / BLOCK_DIAMETER).floor() as i32 - ox;
        let y = (pos.y / BLOCK_HEIGHT).floor() as i32;
        let z = (pos.z / BLOCK_DIAMETER).floor() as i32 - oz;
        if !(0..REGION_HEIGHT).contains(&y) {
            return Err(Error::OutOfBounds { x, y, z });
        }

        Ok(BlockPosition::new(x, y, z, ox, oz))
    }

    /// Closest accessible block whose bounding box the ray hits.
    ///
    /// Regions are culled by their accessible bounds, then every accessible
    /// block in the remaining regions is tested. Equal distances resolve to
    /// the smaller block position.
    pub fn get_picked_terrain_block(&self, ray: &Ray) -> Option<TerrainPickResult> {
        let mut best: Option<(f32, BlockPosition)> = None;

        for region in self.regions.values() {
            let Some(bounds) = region.accessible_bounds() else {
                continue;
            };
            if ray.intersects_aabb(&bounds).is_none() {
                continue;
            }

            for position in region.accessible_blocks().values() {
                let Some(distance) = ray.hit_distance(&position.bounding_box()) else {
                    continue;
                };
                let closer = match best {
                    None => true,
                    Some((d, p)) => distance < d || (distance == d && *position < p),
                };
                if closer {
                    best = Some((distance, *position));
                }
            }
        }

        let (distance, block_position) = best?;
        let region = block_position.region_coord();
        let free_blocks_above = self
            .regions
            .region(region)
            .and_then(|r| r.free_blocks_above(block_position.x, block_position.y, block_position.z).ok())
            .unwrap_or(0);

        Some(TerrainPickResult {
            region,
            block_position,
            distance,
            free_blocks_above,
        })
    }

    /// Dig out a picked block
    pub fn remove_block(&mut self, pick: &TerrainPickResult) -> Result<EditOutcome> {
        self.edit_block(pick.block_position, BlockMaterial::None)
    }

    /// Put a block into a cell
    pub fn place_block(&mut self, position: BlockPosition, material: BlockMaterial) -> Result<EditOutcome> {
        self.edit_block(position, material)
    }

    /// Write one cell, then recompute the regions sharing its border before
    /// the region itself, then republish their surfaces
    fn edit_block(&mut self, position: BlockPosition, material: BlockMaterial) -> Result<EditOutcome> {
        let coord = position.region_coord();
        let region = self.regions.get_mut(coord.key()).ok_or(Error::RegionMissing(coord))?;
        region.set_block(material, position.x, position.y, position.z)?;

        let mut recalculated: Vec<RegionCoord> = border_sides(&position)
            .filter_map(|side| region.neighbor(side))
            .collect();
        recalculated.retain(|c| self.regions.contains(c.key()));
        recalculated.push(coord);

        for &c in &recalculated {
            self.recalculate_region(c)?;
        }
        self.publish_surfaces(&recalculated);

        log::debug!(
            "Set {:?} to {:?}, recalculated {:?}",
            position,
            material,
            recalculated
        );
        Ok(EditOutcome { recalculated })
    }
}

/// Lateral sides of its region that a cell touches
fn border_sides(position: &BlockPosition) -> impl Iterator<Item = Orientation> {
    let touches = [
        position.z == 0,
        position.x == REGION_WIDTH - 1,
        position.z == REGION_LENGTH - 1,
        position.x == 0,
    ];
    Orientation::LATERAL
        .into_iter()
        .zip(touches)
        .filter_map(|(side, hit)| hit.then_some(side))
}

impl RegionLookup for TerrainMap {
    fn region(&self, coord: RegionCoord) -> Option<&Region> {
        self.regions.region(coord)
    }
}
