//! A* search over accessible terrain blocks
//!
//! Nodes are blocks an agent can stand on. From a block the agent may step
//! to any of the 8 lateral columns: level, climbing up to its jump height,
//! or dropping up to `fall_multiplier` times its jump height. Every landing
//! block needs `bound_height - 1` free cells above it.
//!
//! A step costs its lateral base plus `climb_cost_per_block` per block of
//! rise; drops subtract the same amount. Steps never cost less than
//! `min_step_cost`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::PathfinderConfig;
use crate::core::{Error, Result};
use crate::terrain::TerrainMap;
use crate::voxel::region::{Region, RegionLookup};
use crate::voxel::BlockPosition;

use super::agent::Agent;

/// How an agent moves between two consecutive path blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementKind {
    JumpUp,
    JumpDown,
    Go,
}

impl MovementKind {
    pub fn from_dy(dy: i32) -> Self {
        match dy.cmp(&0) {
            Ordering::Greater => MovementKind::JumpUp,
            Ordering::Less => MovementKind::JumpDown,
            Ordering::Equal => MovementKind::Go,
        }
    }

    /// Movement needed to get from `from` to `to`
    pub fn between(from: &BlockPosition, to: &BlockPosition) -> Self {
        Self::from_dy(to.y - from.y)
    }
}

/// One passable move out of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub position: BlockPosition,
    pub movement: MovementKind,
    pub cost: i32,
}

/// Search node; `previous` indexes the node arena of the running search
#[derive(Clone, Debug)]
struct PathNode {
    position: BlockPosition,
    previous: Option<usize>,
    g: i32,
    f: i32,
}

/// Open set entry: lowest `f` first, then insertion order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: i32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walkable path search. Holds only configuration; every call is independent.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    config: PathfinderConfig,
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Path from the block under `agent` to `destination`, both ends included.
    ///
    /// An empty path means the search ran and found nothing. Errors mean the
    /// search could not run (endpoint missing or not accessible) or the
    /// expansion budget ran out.
    pub fn try_find_path<A: Agent + ?Sized>(
        &self,
        map: &TerrainMap,
        agent: &A,
        destination: BlockPosition,
    ) -> Result<Vec<BlockPosition>> {
        let start = Self::standing_block(map, agent)?;
        let goal = Self::accessible(map, destination)?;
        self.search(map, agent, start, goal)
    }

    /// Like [`Pathfinder::try_find_path`], with every failure reported as an empty path
    pub fn find_path<A: Agent + ?Sized>(
        &self,
        map: &TerrainMap,
        agent: &A,
        destination: BlockPosition,
    ) -> Vec<BlockPosition> {
        match self.try_find_path(map, agent, destination) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No path to {:?}: {}", destination, e);
                Vec::new()
            }
        }
    }

    /// Passable moves out of the block the agent stands on
    pub fn neighbors_for_agent<A: Agent + ?Sized>(&self, map: &TerrainMap, agent: &A) -> Result<Vec<PathStep>> {
        let start = Self::standing_block(map, agent)?;
        Ok(self.passable_neighbors(map, &start, agent))
    }

    /// Pick one passable neighbor for idle wandering; `roll` is any caller-supplied random number
    pub fn wander_step<A: Agent + ?Sized>(&self, map: &TerrainMap, agent: &A, roll: usize) -> Option<PathStep> {
        let steps = self.neighbors_for_agent(map, agent).ok()?;
        if steps.is_empty() {
            return None;
        }
        steps.get(roll % steps.len()).copied()
    }

    /// Accumulated step cost along a path
    pub fn path_cost(&self, path: &[BlockPosition]) -> i32 {
        path.windows(2)
            .map(|pair| {
                let delta = pair[1].world_block() - pair[0].world_block();
                self.step_cost(delta.x, delta.y, delta.z)
            })
            .sum()
    }

    /// Cost of one move by a lateral offset and a vertical offset in blocks
    pub fn step_cost(&self, dx: i32, dy: i32, dz: i32) -> i32 {
        let base = if dx.abs() + dz.abs() > 1 {
            self.config.diagonal_cost
        } else {
            self.config.straight_cost
        };
        (base + dy * self.config.climb_cost_per_block).max(self.config.min_step_cost)
    }

    /// Manhattan distance between world positions, scaled
    fn heuristic(&self, from: &BlockPosition, to: &BlockPosition) -> i32 {
        let d = (to.world_position() - from.world_position()).abs();
        (d.x + d.y + d.z) as i32 * self.config.heuristic_scale
    }

    fn standing_block<A: Agent + ?Sized>(map: &TerrainMap, agent: &A) -> Result<BlockPosition> {
        let block = map.get_block_position_for_world_coordinates(agent.world_position())?;
        Self::accessible(map, block)
    }

    fn accessible(map: &TerrainMap, position: BlockPosition) -> Result<BlockPosition> {
        let coord = position.region_coord();
        let region = map.region(coord).ok_or(Error::RegionMissing(coord))?;
        region
            .accessible_block(position.x, position.y, position.z)
            .copied()
            .ok_or(Error::NotAccessible(position))
    }

    fn search<A: Agent + ?Sized>(
        &self,
        map: &TerrainMap,
        agent: &A,
        start: BlockPosition,
        goal: BlockPosition,
    ) -> Result<Vec<BlockPosition>> {
        let mut nodes = vec![PathNode {
            position: start,
            previous: None,
            g: 0,
            f: self.heuristic(&start, &goal),
        }];
        let mut node_ids: HashMap<BlockPosition, usize> = HashMap::from([(start, 0)]);
        let mut closed: HashSet<BlockPosition> = HashSet::new();
        let mut open = BinaryHeap::from([OpenEntry { f: nodes[0].f, seq: 0, node: 0 }]);
        let mut seq = 1u64;
        let mut expanded = 0usize;

        while let Some(entry) = open.pop() {
            let current = nodes[entry.node].clone();
            // Superseded by a cheaper route
            if entry.f != current.f || closed.contains(&current.position) {
                continue;
            }
            closed.insert(current.position);

            if current.position == goal {
                let path = Self::retrace(&nodes, entry.node);
                log::debug!(
                    "Path {:?} -> {:?}: {} blocks, cost {}, {} nodes expanded",
                    start,
                    goal,
                    path.len(),
                    current.g,
                    expanded
                );
                return Ok(path);
            }

            if self.config.max_expansions.is_some_and(|max| expanded >= max) {
                log::debug!("Path {:?} -> {:?}: gave up after {} nodes", start, goal, expanded);
                return Err(Error::SearchBudgetExhausted { expanded });
            }
            expanded += 1;
            log::trace!("Expanding {:?} g={} f={}", current.position, current.g, current.f);

            for step in self.passable_neighbors(map, &current.position, agent) {
                if closed.contains(&step.position) {
                    continue;
                }
                let g = current.g + step.cost;

                let id = match node_ids.get(&step.position).copied() {
                    Some(id) if g < nodes[id].g => {
                        let node = &mut nodes[id];
                        node.previous = Some(entry.node);
                        node.g = g;
                        node.f = g + self.heuristic(&step.position, &goal);
                        id
                    }
                    Some(_) => continue,
                    None => {
                        let id = nodes.len();
                        nodes.push(PathNode {
                            position: step.position,
                            previous: Some(entry.node),
                            g,
                            f: g + self.heuristic(&step.position, &goal),
                        });
                        node_ids.insert(step.position, id);
                        id
                    }
                };

                open.push(OpenEntry { f: nodes[id].f, seq, node: id });
                seq += 1;
            }
        }

        log::debug!("Path {:?} -> {:?}: unreachable, {} nodes expanded", start, goal, expanded);
        Ok(Vec::new())
    }

    fn retrace(nodes: &[PathNode], goal: usize) -> Vec<BlockPosition> {
        let mut path = Vec::new();
        let mut cursor = Some(goal);
        while let Some(id) = cursor {
            path.push(nodes[id].position);
            cursor = nodes[id].previous;
        }
        path.reverse();
        path
    }

    /// Moves into the 8 lateral columns around `from`, in x-major offset order
    pub fn passable_neighbors<A: Agent + ?Sized>(
        &self,
        map: &TerrainMap,
        from: &BlockPosition,
        agent: &A,
    ) -> Vec<PathStep> {
        let mut steps = Vec::with_capacity(8);

        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let lateral = from.offset(dx, 0, dz);
                let Some(region) = map.region(lateral.region_coord()) else {
                    continue;
                };
                if let Some(step) = self.step_into(map, region, &lateral, dx, dz, agent) {
                    steps.push(step);
                }
            }
        }

        steps
    }

    /// Landing block in one lateral column, if the agent can get there
    fn step_into<A: Agent + ?Sized>(
        &self,
        map: &TerrainMap,
        region: &Region,
        lateral: &BlockPosition,
        dx: i32,
        dz: i32,
        agent: &A,
    ) -> Option<PathStep> {
        let (x, y, z) = (lateral.x, lateral.y, lateral.z);
        let jump = agent.jump_height();
        let cell = |y: i32| region.material_at(map, x, y, z);
        let fits = |y: i32| (1..agent.bound_height()).all(|i| cell(y + i).is_empty());

        let dy = if cell(y).is_solid() {
            // First level with air above it, closest first
            (0..=jump).find(|&rise| cell(y + rise + 1).is_empty())?
        } else {
            // The agent has to fit through the gap before dropping
            if !fits(y) {
                return None;
            }
            let max_fall = self.config.fall_multiplier.saturating_mul(jump);
            let drop = (1..=max_fall)
                .take_while(|d| y - d >= 0)
                .find(|&d| cell(y - d).is_solid())?;
            -drop
        };

        let landing = y + dy;
        if !fits(landing) {
            return None;
        }
        let position = *region.accessible_block(x, landing, z)?;

        Some(PathStep {
            position,
            movement: MovementKind::from_dy(dy),
            cost: self.step_cost(dx, dy, dz),
        })
    }
}
