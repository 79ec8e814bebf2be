//! Layered noise terrain generation
//!
//! Each geological layer (rock, clay, soil) is an independent heightfield
//! sampled per block column. A cell takes the first layer whose height it
//! lies under, checked in the order rock, clay, soil. The bottom cell is
//! always bedrock.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::{GenerationConfig, NoiseLayer};
use crate::voxel::region::{Region, RegionCoord, REGION_HEIGHT, REGION_LENGTH, REGION_VOLUME, REGION_WIDTH};
use crate::voxel::BlockMaterial;

/// Layer thresholds for one block column, in blocks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerHeights {
    pub rock: f64,
    pub clay: f64,
    pub soil: f64,
}

impl LayerHeights {
    /// Material of cell `y` in a column with these thresholds
    pub fn material_at(&self, y: i32) -> BlockMaterial {
        let level = y as f64;
        if y == 0 {
            BlockMaterial::BedRock
        } else if level <= self.rock {
            BlockMaterial::Rock
        } else if level <= self.clay {
            BlockMaterial::Clay
        } else if level <= self.soil {
            BlockMaterial::Soil
        } else {
            BlockMaterial::None
        }
    }
}

/// Procedural terrain generator using one fractal Brownian motion field per layer
pub struct TerrainGenerator {
    config: GenerationConfig,
    height: Fbm<Perlin>,
    rock: Fbm<Perlin>,
    clay: Fbm<Perlin>,
    soil: Fbm<Perlin>,
}

fn layer_noise(seed: u32, layer: &NoiseLayer) -> Fbm<Perlin> {
    Fbm::<Perlin>::new(seed)
        .set_octaves(layer.octaves)
        .set_persistence(layer.persistence)
        .set_frequency(layer.frequency)
}

/// Sharpen ridges: `v^4 * (5 - 4v)`
fn ridge(v: f64) -> f64 {
    v.powi(4) * (5.0 - 4.0 * v)
}

impl TerrainGenerator {
    /// Create a generator. Layers are seeded `seed`, `seed + 1`, `seed + 2`, `seed + 3`.
    pub fn new(config: GenerationConfig) -> Self {
        let seed = config.seed;
        Self {
            height: layer_noise(seed, &config.height),
            rock: layer_noise(seed.wrapping_add(1), &config.rock),
            clay: layer_noise(seed.wrapping_add(2), &config.clay),
            soil: layer_noise(seed.wrapping_add(3), &config.soil),
            config,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Sample a field at a world column, mapped from [-1, 1] to [0, 1]
    fn sample(noise: &Fbm<Perlin>, x: i32, z: i32) -> f64 {
        let value = noise.get([x as f64, z as f64]);
        ((value + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// Base elevation in [0, 1]. Not used by the layer thresholds.
    pub fn height_at(&self, x: i32, z: i32) -> f64 {
        Self::sample(&self.height, x, z)
    }

    /// Layer thresholds at global block column `(x, z)`
    pub fn layer_heights(&self, x: i32, z: i32) -> LayerHeights {
        let scale = REGION_HEIGHT as f64;
        LayerHeights {
            rock: ridge(Self::sample(&self.rock, x, z)) * scale + self.config.rock.offset,
            clay: Self::sample(&self.clay, x, z) * scale + self.config.clay.offset,
            soil: Self::sample(&self.soil, x, z) * scale + self.config.soil.offset,
        }
    }

    /// Fill one column (`REGION_HEIGHT` cells, bottom first) at global block column `(x, z)`
    pub fn fill_column(&self, column: &mut [BlockMaterial], x: i32, z: i32) {
        let heights = self.layer_heights(x, z);
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = heights.material_at(y as i32);
        }
    }

    /// Generate the blocks of one region. The result is unlinked and has no
    /// accessible index yet.
    pub fn generate_region(&self, coord: RegionCoord) -> Region {
        let (ox, oz) = coord.origin();
        let mut blocks = vec![BlockMaterial::None; REGION_VOLUME];

        // Storage order is x-major then z, so chunks of REGION_HEIGHT are columns
        for (i, column) in blocks.chunks_exact_mut(REGION_HEIGHT as usize).enumerate() {
            let x = i as i32 / REGION_LENGTH;
            let z = i as i32 % REGION_LENGTH;
            debug_assert!(x < REGION_WIDTH);
            self.fill_column(column, ox + x, oz + z);
        }

        Region::from_blocks(coord, blocks)
    }
}
