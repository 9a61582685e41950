//! Shared fixtures for the `#[cfg(test)]` modules of this crate.
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use crate::testing::*;
//! }
//! ```
#![allow(dead_code)]

use terrain_paint_core::neighbors::{E, N, S, W};
use terrain_paint_core::{
    MapLayer, Passability, TerrainDef, TerrainId, TerrainLevel, TerrainRegistry, TilePos,
};

/// Transition tiles authored for rock: every edge and corner of a rectangular patch
pub const ROCK_EDGE_ART: [(u8, u32); 8] = [
    (N, 100),
    (E, 101),
    (S, 102),
    (W, 103),
    (N | E, 104),
    (N | W, 105),
    (S | E, 106),
    (S | W, 107),
];

/// Registry used across the pipeline tests.
///
/// - `grass`, `desert`, `scrubland`, `water`: may stand alone
/// - `scrubland` borders both grass and desert, and is their intermediate
/// - `rock`: cannot stand alone, has art for patch edges but not for a lone tile
/// - `lava`: cannot stand alone and has no art at all
/// - `forest`: harvestable overlay that may stand alone and blocks land units
/// - `rocks`: overlay that cannot stand alone and has no art
pub fn test_registry() -> TerrainRegistry {
    let rock = ROCK_EDGE_ART
        .iter()
        .fold(TerrainDef::base("rock").solid([10]), |def, &(mask, tile)| {
            def.transition(mask, [tile])
        });

    TerrainRegistry::from_defs(vec![
        TerrainDef::base("grass").allow_single().solid([0, 1, 2, 3]),
        rock,
        TerrainDef::base("desert")
            .allow_single()
            .intermediate("grass", "scrubland")
            .solid([20]),
        TerrainDef::base("scrubland")
            .allow_single()
            .border(["grass", "desert"])
            .solid([30]),
        TerrainDef::base("water")
            .allow_single()
            .passable(Passability::WATER)
            .solid([50]),
        TerrainDef::base("lava").solid([60]),
        TerrainDef::overlay("forest")
            .allow_single()
            .harvest(100)
            .passable(Passability::BLOCKED)
            .solid([40]),
        TerrainDef::overlay("rocks").passable(Passability::BLOCKED),
    ])
    .unwrap()
}

pub fn terrain(registry: &TerrainRegistry, ident: &str) -> TerrainId {
    registry.id_of(ident).unwrap()
}

pub fn grass_layer(registry: &TerrainRegistry, width: u32, height: u32) -> MapLayer {
    MapLayer::new("Ground", width, height, Some(terrain(registry, "grass")))
}

/// Paint a column range `[x0, x1)` of every row with base `ident`, without running the brush
pub fn fill_columns(layer: &mut MapLayer, registry: &TerrainRegistry, x0: i32, x1: i32, ident: &str) {
    let id = terrain(registry, ident);
    for y in 0..layer.height() as i32 {
        for x in x0..x1 {
            layer.set_terrain(TilePos::new(x, y), TerrainLevel::Base, id);
        }
    }
}

pub fn base_at(layer: &MapLayer, x: i32, y: i32) -> Option<TerrainId> {
    layer.terrain(TilePos::new(x, y), TerrainLevel::Base)
}

pub fn overlay_at(layer: &MapLayer, x: i32, y: i32) -> Option<TerrainId> {
    layer.terrain(TilePos::new(x, y), TerrainLevel::Overlay)
}
