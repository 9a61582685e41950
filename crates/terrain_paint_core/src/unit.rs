//! Unit occupancy: which units may keep standing on a repainted tile

use crate::layer::{Tile, TilePos};
use crate::registry::TerrainRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// How a unit moves, and therefore which terrain it may stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementClass {
    #[default]
    Land,
    Naval,
    Air,
}

impl MovementClass {
    /// Whether a unit of this class may legally occupy `tile`
    pub fn can_occupy(&self, tile: &Tile, registry: &TerrainRegistry) -> bool {
        let passability = |level_terrain| {
            registry
                .get(level_terrain)
                .map(|t| t.passability)
                .unwrap_or_default()
        };

        match self {
            MovementClass::Air => true,
            MovementClass::Land => {
                let Some(base) = tile.base_terrain else {
                    return false;
                };
                passability(base).land
                    && tile
                        .overlay_terrain
                        .map_or(true, |overlay| passability(overlay).land)
            }
            MovementClass::Naval => tile
                .base_terrain
                .is_some_and(|base| passability(base).water),
        }
    }
}

/// A placed unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub kind: String,
    pub movement: MovementClass,
}

impl Unit {
    pub fn new(kind: impl Into<String>, movement: MovementClass) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            movement,
        }
    }
}

/// Unit collaborator consulted whenever a tile's terrain changes
pub trait UnitOccupancy {
    /// Remove and return every unit at `pos` that can no longer stand on `tile`
    fn evict_illegal(&mut self, pos: TilePos, tile: &Tile, registry: &TerrainRegistry)
        -> Vec<Unit>;
}

/// Layers without units
impl UnitOccupancy for () {
    fn evict_illegal(&mut self, _: TilePos, _: &Tile, _: &TerrainRegistry) -> Vec<Unit> {
        Vec::new()
    }
}

/// Units indexed by the tile they stand on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRoster {
    units: HashMap<TilePos, Vec<Unit>>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a unit; legality is the caller's concern
    pub fn place(&mut self, pos: TilePos, unit: Unit) -> Uuid {
        let id = unit.id;
        self.units.entry(pos).or_default().push(unit);
        id
    }

    pub fn units_at(&self, pos: TilePos) -> &[Unit] {
        self.units.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove a unit by ID
    pub fn remove(&mut self, id: Uuid) -> Option<Unit> {
        let (pos, index) = self.units.iter().find_map(|(pos, units)| {
            units.iter().position(|u| u.id == id).map(|index| (*pos, index))
        })?;
        let units = self.units.get_mut(&pos)?;
        let unit = units.remove(index);
        if units.is_empty() {
            self.units.remove(&pos);
        }
        Some(unit)
    }

    pub fn len(&self) -> usize {
        self.units.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl UnitOccupancy for UnitRoster {
    fn evict_illegal(
        &mut self,
        pos: TilePos,
        tile: &Tile,
        registry: &TerrainRegistry,
    ) -> Vec<Unit> {
        let Some(units) = self.units.get_mut(&pos) else {
            return Vec::new();
        };

        let (keep, evicted): (Vec<Unit>, Vec<Unit>) = units
            .drain(..)
            .partition(|unit| unit.movement.can_occupy(tile, registry));
        *units = keep;
        if units.is_empty() {
            self.units.remove(&pos);
        }

        for unit in &evicted {
            log::debug!("evicted {} {} from ({}, {})", unit.kind, unit.id, pos.x, pos.y);
        }
        evicted
    }
}
