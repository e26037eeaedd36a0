use glam::Vec2;
use serde::Serialize;
use thiserror::Error;

use crate::config::CreatureParams;
use crate::creature::{Creature, CreatureId, CreatureSnapshot, IntentionKind};
use crate::pathfinding::{Grid, Node, NodeCoord};
use crate::rng::SeedSource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world size must be greater than zero")]
    ZeroSize,
    #[error("grid resolution {resolution} must divide world size {size} without remainder")]
    InvalidConfiguration { size: u32, resolution: u32 },
}

/// The square play field: bounds queries plus the optional cell grid.
#[derive(Debug, Clone)]
pub struct Arena {
    size: u32,
    resolution: Option<u32>,
    grid: Option<Grid>,
}

impl Arena {
    /// Grid-backed arena with `size / resolution` cells per axis plus an
    /// unwalkable border ring.
    pub fn new(size: u32, resolution: u32) -> Result<Self, WorldError> {
        if size == 0 {
            return Err(WorldError::ZeroSize);
        }
        if resolution == 0 || size % resolution != 0 {
            return Err(WorldError::InvalidConfiguration { size, resolution });
        }

        let nodes_per_axis = size / resolution + 2;
        let mut grid = Grid::new(nodes_per_axis, nodes_per_axis);
        grid.set_border_walkable(false);

        Ok(Self {
            size,
            resolution: Some(resolution),
            grid: Some(grid),
        })
    }

    /// Arena without a backing grid; only bounds queries are available.
    pub fn open(size: u32) -> Result<Self, WorldError> {
        if size == 0 {
            return Err(WorldError::ZeroSize);
        }
        Ok(Self {
            size,
            resolution: None,
            grid: None,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn resolution(&self) -> Option<u32> {
        self.resolution
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        self.grid.as_mut()
    }

    /// True iff every point lies in `[offset, size]` on both axes.
    ///
    /// Only the lower edge is inset by `offset`; a point exactly on `size`
    /// is inside.
    pub fn is_in_bounds(&self, offset: f32, points: &[Vec2]) -> bool {
        let size = self.size as f32;
        points
            .iter()
            .all(|p| p.x >= offset && p.x <= size && p.y >= offset && p.y <= size)
    }

    /// Grid cell containing a world position. The border ring shifts every
    /// interior cell by one.
    pub fn node_for_position(&self, position: Vec2) -> Option<NodeCoord> {
        let resolution = self.resolution? as f32;
        let size = self.size as f32;
        if !(0.0..=size).contains(&position.x) || !(0.0..=size).contains(&position.y) {
            return None;
        }
        let last_cell = (self.size / self.resolution?) as f32 - 1.0;
        let cell = |value: f32| (value / resolution).floor().min(last_cell) as i32 + 1;
        Some(NodeCoord::new(cell(position.x), cell(position.y)))
    }

    /// World position of a cell's centre.
    pub fn node_center(&self, coord: NodeCoord) -> Option<Vec2> {
        let resolution = self.resolution? as f32;
        Some(Vec2::new(
            (coord.x as f32 - 0.5) * resolution,
            (coord.y as f32 - 0.5) * resolution,
        ))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntentionCounts {
    pub none: usize,
    pub wander: usize,
    pub wait: usize,
    pub turn: usize,
}

impl IntentionCounts {
    pub fn record(&mut self, kind: IntentionKind) {
        match kind {
            IntentionKind::None => self.none += 1,
            IntentionKind::Wander => self.wander += 1,
            IntentionKind::Wait => self.wait += 1,
            IntentionKind::Turn => self.turn += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.none + self.wander + self.wait + self.turn
    }
}

#[derive(Debug, Default, Clone)]
pub struct BookkeepingState {
    pub intention_counts: IntentionCounts,
    pub anomalous: Vec<CreatureId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub size: u32,
    pub intention_counts: IntentionCounts,
    pub anomalous: Vec<CreatureId>,
    pub creatures: Vec<CreatureSnapshot>,
}

/// Arena plus the creatures living in it. The world is the sole owner of
/// its creatures; they only borrow the arena while updating.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    creatures: Vec<Creature>,
    creature_params: CreatureParams,
    seeds: SeedSource,
    next_creature: u64,
    tick: u64,
    pub(crate) bookkeeping: BookkeepingState,
}

impl World {
    pub fn new(size: u32, resolution: u32) -> Result<Self, WorldError> {
        Ok(Self::from_arena(Arena::new(size, resolution)?))
    }

    pub fn from_arena(arena: Arena) -> Self {
        Self {
            arena,
            creatures: Vec::new(),
            creature_params: CreatureParams::default(),
            seeds: SeedSource::default(),
            next_creature: 0,
            tick: 0,
            bookkeeping: BookkeepingState::default(),
        }
    }

    pub fn with_seed(mut self, master_seed: u64) -> Self {
        self.seeds = SeedSource::new(master_seed);
        self
    }

    pub fn with_creature_params(mut self, params: CreatureParams) -> Self {
        self.creature_params = params;
        self
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn size(&self) -> u32 {
        self.arena.size()
    }

    pub fn is_in_bounds(&self, offset: f32, points: &[Vec2]) -> bool {
        self.arena.is_in_bounds(offset, points)
    }

    pub fn creature_params(&self) -> &CreatureParams {
        &self.creature_params
    }

    /// Spawns a creature whose seed is derived from the world seed.
    pub fn spawn_creature(&mut self) -> CreatureId {
        let seed = self.seeds.creature_seed(self.next_creature);
        self.spawn_creature_with_seed(Some(seed))
    }

    /// Spawns a creature with an explicit seed, or an entropy seed for `None`.
    pub fn spawn_creature_with_seed(&mut self, seed: Option<u64>) -> CreatureId {
        let id = self.allocate();
        let creature = Creature::new(id, &self.arena, self.creature_params, seed);
        self.creatures.push(creature);
        id
    }

    pub fn remove_creature(&mut self, id: CreatureId) -> Option<Creature> {
        let index = self.creatures.iter().position(|c| c.id() == id)?;
        self.bookkeeping.anomalous.retain(|other| *other != id);
        Some(self.creatures.remove(index))
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id() == id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id() == id)
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Advances every creature one tick, in spawn order.
    pub fn update_creatures(&mut self) {
        let arena = &self.arena;
        for creature in &mut self.creatures {
            creature.update(arena);
        }
    }

    /// Path between the cells containing two world positions. Empty when the
    /// arena has no grid or either position is off the field.
    pub fn find_path(&self, from: Vec2, to: Vec2, allow_diagonal: bool) -> Vec<Node> {
        let (Some(grid), Some(start), Some(end)) = (
            self.arena.grid(),
            self.arena.node_for_position(from),
            self.arena.node_for_position(to),
        ) else {
            return Vec::new();
        };
        grid.find_path(start, end, allow_diagonal)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
    }

    pub fn intention_counts(&self) -> IntentionCounts {
        self.bookkeeping.intention_counts
    }

    pub fn anomalous_creatures(&self) -> &[CreatureId] {
        &self.bookkeeping.anomalous
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            size: self.arena.size(),
            intention_counts: self.bookkeeping.intention_counts,
            anomalous: self.bookkeeping.anomalous.clone(),
            creatures: self.creatures.iter().map(Creature::snapshot).collect(),
        }
    }

    fn allocate(&mut self) -> CreatureId {
        let id = CreatureId::new(self.next_creature);
        self.next_creature += 1;
        id
    }
}
