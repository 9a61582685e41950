//! Change-set of one pipeline run

use indexmap::map::Iter;
use indexmap::IndexMap;
use terrain_paint_core::{TerrainId, Tile, TilePos};

/// Terrain a position holds after its last write in the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainAssignment {
    pub base: Option<TerrainId>,
    pub overlay: Option<TerrainId>,
}

impl TerrainAssignment {
    pub fn of(tile: &Tile) -> Self {
        Self {
            base: tile.base_terrain,
            overlay: tile.overlay_terrain,
        }
    }

    pub fn top(&self) -> Option<TerrainId> {
        self.overlay.or(self.base)
    }
}

/// Positions changed during one run, in discovery order.
///
/// Membership is O(1). Recording a position twice keeps its original place in
/// the order and replaces the assignment: last write wins.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    entries: IndexMap<TilePos, TerrainAssignment>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        self.entries.contains_key(&pos)
    }

    /// Record the current terrain of `pos`. Returns `true` if the position is new.
    pub fn record(&mut self, pos: TilePos, tile: &Tile) -> bool {
        self.entries
            .insert(pos, TerrainAssignment::of(tile))
            .is_none()
    }

    pub fn get(&self, pos: TilePos) -> Option<&TerrainAssignment> {
        self.entries.get(&pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> Iter<'_, TilePos, TerrainAssignment> {
        self.entries.iter()
    }

    pub fn into_inner(self) -> IndexMap<TilePos, TerrainAssignment> {
        self.entries
    }
}
