//! Terrain brush for tile-based RTS map editors
//!
//! Painting terrain does more than set the tiles under the brush. Transition
//! art around the stroke may no longer fit, lone tiles of a terrain that cannot
//! stand alone need absorbing, and incompatible borders need a buffer terrain.
//! [`paint`] runs the whole pipeline for one request:
//!
//! 1. resolve the brush (and its mirror copies) into clamped rectangles,
//! 2. fill each rectangle with the requested terrain,
//! 3. stabilize the neighborhood until no more repairs are needed,
//! 4. recompute the final artwork and emit [`RedrawEvent`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use terrain_paint_brush::{paint, PaintRequest};
//! use terrain_paint_core::{parse_registry, MapLayer, TilePos};
//!
//! let registry = parse_registry(&std::fs::read_to_string("terrain.json")?)?;
//! let grass = registry.id_of("grass").unwrap();
//! let mut layer = MapLayer::new("Ground", 64, 64, Some(grass));
//!
//! let request = PaintRequest::new(TilePos::new(5, 5), registry.id_of("rock").unwrap())
//!     .with_brush_size(2);
//! let outcome = paint(&mut layer, &registry, &mut (), &request)?;
//! for event in &outcome.events {
//!     // hand to the minimap / renderer
//! }
//! ```

mod changes;
mod fill;
mod paint;
mod painter;
mod redraw;
mod region;
mod request;
mod settings;
mod stabilize;
mod stroke;

#[cfg(test)]
mod testing;

pub use changes::{ChangeSet, TerrainAssignment};
pub use paint::{paint, paint_with_settings, PaintOutcome};
pub use painter::TerrainPainter;
pub use redraw::RedrawEvent;
pub use region::{resolve_regions, TileRect};
pub use request::{MirrorMode, PaintRequest};
pub use settings::{
    load_settings, parse_settings, save_settings, BrushSettings, SettingsError, SETTINGS_VERSION,
};
pub use stroke::{line_cells, PaintStroke};

pub use terrain_paint_core;

use terrain_paint_core::TerrainId;
use thiserror::Error;

/// Reasons a paint request is rejected before the pipeline starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaintError {
    #[error("Cannot paint on a layer with no tiles")]
    EmptyLayer,
    #[error("Brush size must be at least 1")]
    InvalidBrushSize,
    #[error("Brush size {size} exceeds the maximum of {max}")]
    BrushTooLarge { size: u32, max: u32 },
    #[error("Unknown terrain {0:?}")]
    UnknownTerrain(TerrainId),
}
