//! Terrain generator binary: builds a world, reports on it, and runs a sample pick and path.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --width <REGIONS>    Regions along x (default: 4)
//!   --length <REGIONS>   Regions along z (default: 4)
//!   --seed <SEED>        Random seed (overrides the config file)
//!   --config <PATH>      Engine config JSON (default: built-in defaults)

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;

use hamlet::core::Result;
use hamlet::math::Ray;
use hamlet::pathfinding::{AgentProfile, MovementKind, Pathfinder};
use hamlet::voxel::BLOCK_HEIGHT;
use hamlet::voxel::REGION_HEIGHT;
use hamlet::{EngineConfig, TerrainMap};

fn main() -> Result<()> {
    hamlet::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let width = parse_i32_arg(&args, "--width").unwrap_or(4).max(1);
    let length = parse_i32_arg(&args, "--length").unwrap_or(4).max(1);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => EngineConfig::load_sync(&PathBuf::from(path))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.generation.seed = seed;
    }

    println!("=== Hamlet Terrain Generator ===");
    println!("Regions: {} x {}", width, length);
    println!("Seed:    {}", config.generation.seed);
    println!();

    let start = Instant::now();
    let mut map = TerrainMap::new(config.generation.clone());
    map.generate_random_world(width, length);
    let elapsed = start.elapsed();

    let mut materials: BTreeMap<String, usize> = BTreeMap::new();
    let mut accessible = 0usize;
    for region in map.regions().values() {
        for block in region.blocks() {
            if block.is_solid() {
                *materials.entry(format!("{:?}", block)).or_default() += 1;
            }
        }
        accessible += region.accessible_blocks().len();
    }

    println!("Generated in {:.2}s", elapsed.as_secs_f64());
    for (material, count) in &materials {
        println!("  {:<8} {}", material, count);
    }
    println!("Accessible blocks: {}", accessible);
    println!();

    let Some(bounds) = map.world_bounds() else {
        return Ok(());
    };
    let top = REGION_HEIGHT as f32 * BLOCK_HEIGHT + 10.0;
    let down = Vec3::new(0.0, -1.0, 0.0);
    let center = bounds.center();

    let Some(pick) = map.get_picked_terrain_block(&Ray::new(Vec3::new(center.x + 0.5, top, center.z + 0.5), down)) else {
        println!("Pick below world centre missed");
        return Ok(());
    };
    println!(
        "Picked {:?} in region {:?} at distance {:.1}, {} free blocks above",
        pick.block_position.world_block(),
        pick.region,
        pick.distance,
        pick.free_blocks_above
    );

    let target = Vec3::new(center.x + 8.5, top, center.z + 8.5);
    let Some(goal) = map.get_picked_terrain_block(&Ray::new(target, down)) else {
        return Ok(());
    };

    let pathfinder = Pathfinder::new(config.pathfinding.clone());
    let agent = AgentProfile::standing_on(pick.block_position);
    let path = pathfinder.find_path(&map, &agent, goal.block_position);
    if path.is_empty() {
        println!("No path to {:?}", goal.block_position.world_block());
        return Ok(());
    }

    let mut moves: BTreeMap<String, usize> = BTreeMap::new();
    for pair in path.windows(2) {
        let kind = MovementKind::between(&pair[0], &pair[1]);
        *moves.entry(format!("{:?}", kind)).or_default() += 1;
    }
    println!(
        "Path to {:?}: {} blocks, cost {}, moves {:?}",
        goal.block_position.world_block(),
        path.len(),
        pathfinder.path_cost(&path),
        moves
    );

    Ok(())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
