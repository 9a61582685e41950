//! Map layer: bounded tile storage with transition and solid-tile selection

use crate::neighbors::{calculate_foreign_mask, optimize_foreign_mask, OFFSETS};
use crate::registry::TerrainRegistry;
use crate::terrain::{TerrainId, TerrainLevel};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Position of a tile within a layer. Signed so neighbor offsets can step off the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Step by `(dx, dy)`, saturating at the `i32` range
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A single map cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub base_terrain: Option<TerrainId>,
    pub overlay_terrain: Option<TerrainId>,
    /// Remaining resource amount on harvestable terrain
    pub value: u32,
    pub base_tile: Option<u32>,
    pub overlay_tile: Option<u32>,
    pub base_transitions: Vec<u32>,
    pub overlay_transitions: Vec<u32>,
    /// Set while a paint operation is running on tiles whose overlay it stripped
    #[serde(skip)]
    pub overlay_destroyed: bool,
}

impl Tile {
    pub fn terrain(&self, level: TerrainLevel) -> Option<TerrainId> {
        match level {
            TerrainLevel::Base => self.base_terrain,
            TerrainLevel::Overlay => self.overlay_terrain,
        }
    }

    /// Overlay if present, otherwise base
    pub fn top_level(&self) -> TerrainLevel {
        if self.overlay_terrain.is_some() {
            TerrainLevel::Overlay
        } else {
            TerrainLevel::Base
        }
    }

    pub fn top_terrain(&self) -> Option<TerrainId> {
        self.overlay_terrain.or(self.base_terrain)
    }

    pub fn transitions(&self, level: TerrainLevel) -> &[u32] {
        match level {
            TerrainLevel::Base => &self.base_transitions,
            TerrainLevel::Overlay => &self.overlay_transitions,
        }
    }

    fn transitions_mut(&mut self, level: TerrainLevel) -> &mut Vec<u32> {
        match level {
            TerrainLevel::Base => &mut self.base_transitions,
            TerrainLevel::Overlay => &mut self.overlay_transitions,
        }
    }

    fn solid_tile_mut(&mut self, level: TerrainLevel) -> &mut Option<u32> {
        match level {
            TerrainLevel::Base => &mut self.base_tile,
            TerrainLevel::Overlay => &mut self.overlay_tile,
        }
    }
}

/// A bounded 2D grid of tiles, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayer {
    pub name: String,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl MapLayer {
    /// Create a layer with every tile set to `base`
    pub fn new(name: impl Into<String>, width: u32, height: u32, base: Option<TerrainId>) -> Self {
        let tile = Tile {
            base_terrain: base,
            ..Tile::default()
        };
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![tile; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.tiles.get(idx))
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.index(pos).and_then(|idx| self.tiles.get_mut(idx))
    }

    /// All positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| TilePos::new(x, y)))
    }

    /// In-bounds 8-neighbors of `pos`, clockwise from north
    pub fn neighbors(&self, pos: TilePos) -> Vec<TilePos> {
        OFFSETS
            .iter()
            .map(|&(dx, dy, _)| pos.offset(dx, dy))
            .filter(|&n| self.in_bounds(n))
            .collect()
    }

    pub fn terrain(&self, pos: TilePos, level: TerrainLevel) -> Option<TerrainId> {
        self.tile(pos).and_then(|t| t.terrain(level))
    }

    pub fn set_terrain(&mut self, pos: TilePos, level: TerrainLevel, terrain: TerrainId) {
        if let Some(tile) = self.tile_mut(pos) {
            match level {
                TerrainLevel::Base => tile.base_terrain = Some(terrain),
                TerrainLevel::Overlay => {
                    tile.overlay_terrain = Some(terrain);
                    tile.overlay_destroyed = false;
                }
            }
        }
    }

    /// Strip the overlay of a tile, marking it destroyed. Returns the removed terrain.
    pub fn remove_overlay(&mut self, pos: TilePos) -> Option<TerrainId> {
        let tile = self.tile_mut(pos)?;
        let removed = tile.overlay_terrain.take()?;
        tile.overlay_tile = None;
        tile.overlay_transitions.clear();
        tile.overlay_destroyed = true;
        Some(removed)
    }

    /// Mask of neighbors whose terrain at `level` does not fit next to this tile.
    ///
    /// A neighbor fits when it holds the same terrain, when its overlay was
    /// destroyed during the running operation (overlay level only), or when its
    /// terrain is an outer border of this tile's terrain. Off-map neighbors fit.
    pub fn foreign_mask(&self, pos: TilePos, level: TerrainLevel, registry: &TerrainRegistry) -> u8 {
        let Some(terrain) = self.terrain(pos, level) else {
            return 0;
        };

        calculate_foreign_mask(pos.x, pos.y, |x, y| {
            let Some(neighbor) = self.tile(TilePos::new(x, y)) else {
                return false;
            };
            match neighbor.terrain(level) {
                Some(other) if other == terrain => false,
                Some(other) => !registry.is_border_terrain(terrain, other),
                None => !(level == TerrainLevel::Overlay && neighbor.overlay_destroyed),
            }
        })
    }

    /// Whether the tile can be drawn without transition art at `level`
    pub fn is_solid(&self, pos: TilePos, level: TerrainLevel, registry: &TerrainRegistry) -> bool {
        match self.terrain(pos, level) {
            None => true,
            Some(terrain) if registry.allows_single(terrain) => true,
            Some(_) => self.foreign_mask(pos, level, registry) == 0,
        }
    }

    /// Reselect the transition tiles of `pos` at `level` and return them
    pub fn recompute_transitions(
        &mut self,
        pos: TilePos,
        level: TerrainLevel,
        registry: &TerrainRegistry,
    ) -> Vec<u32> {
        let selected = match self.terrain(pos, level).and_then(|id| registry.get(id)) {
            Some(terrain) => {
                let mask = optimize_foreign_mask(self.foreign_mask(pos, level, registry));
                if mask == 0 {
                    Vec::new()
                } else {
                    terrain.transition_tiles(mask).to_vec()
                }
            }
            None => Vec::new(),
        };

        if let Some(tile) = self.tile_mut(pos) {
            tile.transitions_mut(level).clone_from(&selected);
        }
        selected
    }

    /// Reselect the solid tile variant of `pos` at `level`.
    ///
    /// The variant is drawn from a generator seeded by position and terrain, so
    /// repainting the same terrain picks the same graphic.
    pub fn recompute_solid_tile(
        &mut self,
        pos: TilePos,
        level: TerrainLevel,
        registry: &TerrainRegistry,
    ) {
        let variant = self
            .terrain(pos, level)
            .and_then(|id| registry.get(id))
            .and_then(|terrain| {
                if terrain.solid_tiles.is_empty() {
                    return None;
                }
                let seed = ((pos.x as u32 as u64) << 32)
                    ^ (pos.y as u32 as u64)
                    ^ ((terrain.id.0 as u64) << 48);
                let mut rng = SmallRng::seed_from_u64(seed);
                Some(terrain.solid_tiles[rng.gen_range(0..terrain.solid_tiles.len())])
            });

        if let Some(tile) = self.tile_mut(pos) {
            *tile.solid_tile_mut(level) = variant;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::{E, N, S, W};
    use crate::terrain::TerrainDef;

    fn registry() -> TerrainRegistry {
        TerrainRegistry::from_defs(vec![
            TerrainDef::base("grass").allow_single().solid([1, 2, 3]),
            TerrainDef::base("rock").transition(N, [20]).transition(N | E | S | W, [29]),
            TerrainDef::base("sand").border(["grass"]),
            TerrainDef::overlay("forest"),
        ])
        .unwrap()
    }

    fn id(registry: &TerrainRegistry, ident: &str) -> TerrainId {
        registry.id_of(ident).unwrap()
    }

    #[test]
    fn test_new_layer() {
        let layer = MapLayer::new("Ground", 10, 8, Some(TerrainId(0)));
        assert_eq!(layer.width(), 10);
        assert_eq!(layer.height(), 8);
        assert_eq!(layer.positions().count(), 80);
        assert!(layer
            .positions()
            .all(|p| layer.terrain(p, TerrainLevel::Base) == Some(TerrainId(0))));
    }

    #[test]
    fn test_bounds() {
        let layer = MapLayer::new("Ground", 4, 4, None);
        assert!(layer.in_bounds(TilePos::new(0, 0)));
        assert!(layer.in_bounds(TilePos::new(3, 3)));
        assert!(!layer.in_bounds(TilePos::new(4, 0)));
        assert!(!layer.in_bounds(TilePos::new(-1, 2)));
        assert!(layer.tile(TilePos::new(0, 4)).is_none());
        assert_eq!(layer.neighbors(TilePos::new(0, 0)).len(), 3);
        assert_eq!(layer.neighbors(TilePos::new(1, 1)).len(), 8);
    }

    #[test]
    fn test_empty_layer() {
        let layer = MapLayer::new("Empty", 0, 5, None);
        assert!(layer.is_empty());
        assert_eq!(layer.positions().count(), 0);
    }

    #[test]
    fn test_lone_tile_is_not_solid() {
        let registry = registry();
        let mut layer = MapLayer::new("Ground", 5, 5, Some(id(&registry, "grass")));
        let center = TilePos::new(2, 2);
        layer.set_terrain(center, TerrainLevel::Base, id(&registry, "rock"));

        assert!(!layer.is_solid(center, TerrainLevel::Base, &registry));
        // grass allows single placement
        assert!(layer.is_solid(TilePos::new(1, 1), TerrainLevel::Base, &registry));
        assert_eq!(
            layer.recompute_transitions(center, TerrainLevel::Base, &registry),
            vec![29]
        );
        assert_eq!(layer.tile(center).unwrap().base_transitions, vec![29]);
    }

    #[test]
    fn test_outer_border_counts_as_solid() {
        let registry = registry();
        let mut layer = MapLayer::new("Ground", 5, 5, Some(id(&registry, "grass")));
        let center = TilePos::new(2, 2);
        layer.set_terrain(center, TerrainLevel::Base, id(&registry, "sand"));

        assert_eq!(layer.foreign_mask(center, TerrainLevel::Base, &registry), 0);
        assert!(layer.is_solid(center, TerrainLevel::Base, &registry));
    }

    #[test]
    fn test_destroyed_overlay_counts_as_absent() {
        let registry = registry();
        let forest = id(&registry, "forest");
        let mut layer = MapLayer::new("Ground", 3, 3, Some(id(&registry, "grass")));
        for pos in layer.positions().collect::<Vec<_>>() {
            layer.set_terrain(pos, TerrainLevel::Overlay, forest);
        }
        let center = TilePos::new(1, 1);
        assert!(layer.is_solid(center, TerrainLevel::Overlay, &registry));

        assert_eq!(layer.remove_overlay(TilePos::new(1, 0)), Some(forest));
        assert!(layer.is_solid(center, TerrainLevel::Overlay, &registry));

        layer.tile_mut(TilePos::new(1, 0)).unwrap().overlay_destroyed = false;
        assert!(!layer.is_solid(center, TerrainLevel::Overlay, &registry));
    }

    #[test]
    fn test_edge_transition_lookup() {
        let registry = registry();
        let rock = id(&registry, "rock");
        let mut layer = MapLayer::new("Ground", 5, 5, Some(rock));
        for x in 0..5 {
            layer.set_terrain(TilePos::new(x, 0), TerrainLevel::Base, id(&registry, "grass"));
        }

        let pos = TilePos::new(2, 1);
        assert_eq!(layer.recompute_transitions(pos, TerrainLevel::Base, &registry), vec![20]);
        // Solid tiles have no transitions
        assert!(layer
            .recompute_transitions(TilePos::new(2, 3), TerrainLevel::Base, &registry)
            .is_empty());
    }

    #[test]
    fn test_solid_tile_variant_is_stable() {
        let registry = registry();
        let mut layer = MapLayer::new("Ground", 5, 5, Some(id(&registry, "grass")));
        let pos = TilePos::new(3, 1);

        layer.recompute_solid_tile(pos, TerrainLevel::Base, &registry);
        let first = layer.tile(pos).unwrap().base_tile;
        layer.recompute_solid_tile(pos, TerrainLevel::Base, &registry);

        assert!(matches!(first, Some(1..=3)));
        assert_eq!(layer.tile(pos).unwrap().base_tile, first);

        layer.recompute_solid_tile(pos, TerrainLevel::Overlay, &registry);
        assert_eq!(layer.tile(pos).unwrap().overlay_tile, None);
    }
}
