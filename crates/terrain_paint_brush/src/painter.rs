//! Shared state of one paint operation
//!
//! The pipeline stages live in their own modules as further `impl` blocks on
//! [`TerrainPainter`]: [`fill`](crate::fill), [`stabilize`](crate::stabilize)
//! and [`redraw`](crate::redraw).

use crate::changes::ChangeSet;
use indexmap::IndexMap;
use terrain_paint_core::{
    MapLayer, TerrainId, TerrainLevel, TerrainRegistry, Tile, TilePos, Unit, UnitOccupancy,
};

/// Mutable view of the map for the duration of one paint operation
pub struct TerrainPainter<'a, U: UnitOccupancy> {
    pub(crate) layer: &'a mut MapLayer,
    pub(crate) registry: &'a TerrainRegistry,
    units: &'a mut U,
    preserve_overlay: bool,
    /// State of every touched tile before its first modification
    snapshots: IndexMap<TilePos, Tile>,
    evicted: Vec<Unit>,
}

impl<'a, U: UnitOccupancy> TerrainPainter<'a, U> {
    pub fn new(
        layer: &'a mut MapLayer,
        registry: &'a TerrainRegistry,
        units: &'a mut U,
        preserve_overlay: bool,
    ) -> Self {
        Self {
            layer,
            registry,
            units,
            preserve_overlay,
            snapshots: IndexMap::new(),
            evicted: Vec::new(),
        }
    }

    pub fn layer(&self) -> &MapLayer {
        &*self.layer
    }

    /// Consume the painter, returning undo snapshots and evicted units
    pub fn finish(self) -> (IndexMap<TilePos, Tile>, Vec<Unit>) {
        (self.snapshots, self.evicted)
    }

    /// State of `pos` before this operation first touched it
    pub(crate) fn snapshot(&self, pos: TilePos) -> Option<&Tile> {
        self.snapshots.get(&pos)
    }

    /// Remember the state of `pos` before it is first modified
    pub(crate) fn touch(&mut self, pos: TilePos) {
        if self.snapshots.contains_key(&pos) {
            return;
        }
        if let Some(tile) = self.layer.tile(pos) {
            self.snapshots.insert(pos, tile.clone());
        }
    }

    /// Write `terrain` into `pos` at `level` and record the position.
    ///
    /// Harvestable terrain resets the tile value. Base terrain strips the
    /// overlay unless overlays are preserved. Units that can no longer stand on
    /// the tile are evicted.
    pub(crate) fn assign(
        &mut self,
        changes: &mut ChangeSet,
        pos: TilePos,
        level: TerrainLevel,
        terrain: TerrainId,
    ) {
        if !self.layer.in_bounds(pos) {
            return;
        }
        self.touch(pos);

        self.layer.set_terrain(pos, level, terrain);
        if level == TerrainLevel::Base && !self.preserve_overlay {
            self.strip_overlay_value(pos);
        }
        if let Some(amount) = self.registry.harvest_amount(terrain) {
            if let Some(tile) = self.layer.tile_mut(pos) {
                tile.value = amount;
            }
        }

        self.settle(changes, pos);
    }

    /// Remove the overlay of `pos` and record the position
    pub(crate) fn remove_overlay(&mut self, changes: &mut ChangeSet, pos: TilePos) {
        if !self.layer.in_bounds(pos) {
            return;
        }
        self.touch(pos);
        self.strip_overlay_value(pos);
        self.settle(changes, pos);
    }

    /// Reselect transitions of `pos` at `level`, keeping an undo snapshot
    pub(crate) fn recompute_transitions(&mut self, pos: TilePos, level: TerrainLevel) -> Vec<u32> {
        self.touch(pos);
        self.layer.recompute_transitions(pos, level, self.registry)
    }

    pub(crate) fn is_solid(&self, pos: TilePos, level: TerrainLevel) -> bool {
        self.layer.is_solid(pos, level, self.registry)
    }

    fn strip_overlay_value(&mut self, pos: TilePos) {
        let Some(removed) = self.layer.remove_overlay(pos) else {
            return;
        };
        if self.registry.harvest_amount(removed).is_some() {
            if let Some(tile) = self.layer.tile_mut(pos) {
                tile.value = 0;
            }
        }
    }

    fn settle(&mut self, changes: &mut ChangeSet, pos: TilePos) {
        if let Some(tile) = self.layer.tile(pos) {
            self.evicted
                .extend(self.units.evict_illegal(pos, tile, self.registry));
            changes.record(pos, tile);
        }
    }
}
