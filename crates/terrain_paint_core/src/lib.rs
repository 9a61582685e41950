//! Core data structures for terrain_paint
//!
//! This crate provides the plain-data collaborators of the terrain brush:
//! - `TerrainRegistry` - Terrain types and their adjacency rules, loaded from JSON
//! - `MapLayer` - A bounded grid of base/overlay tiles with transition selection
//! - `UnitRoster` - Units standing on the map, evicted when terrain turns illegal
//!
//! This crate has no Bevy dependency.

mod layer;
pub mod neighbors;
mod registry;
mod terrain;
mod unit;

pub use layer::{MapLayer, Tile, TilePos};
pub use registry::{
    load_registry, load_registry_from_bytes, parse_registry, RegistryError, RegistryFile,
    TerrainRegistry,
};
pub use terrain::{Passability, TerrainDef, TerrainId, TerrainLevel, TerrainType, TransitionArt};
pub use unit::{MovementClass, Unit, UnitOccupancy, UnitRoster};
