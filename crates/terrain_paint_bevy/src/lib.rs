//! Bevy integration for the terrain brush
//!
//! Editors send [`PaintTerrain`] messages; the plugin runs the brush against
//! the [`TerrainMap`] resource once per frame and answers with one
//! [`TileRedrawn`] message per artwork update.
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use terrain_paint_bevy::{TerrainMap, TerrainPaintPlugin, TerrainRules};
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(TerrainPaintPlugin)
//!     .insert_resource(TerrainRules::new(registry))
//!     .insert_resource(TerrainMap::new(layer))
//!     .run();
//! ```

use bevy::log::{info, warn};
use bevy::prelude::*;
use terrain_paint_brush::{paint_with_settings, BrushSettings, PaintRequest, RedrawEvent};
use terrain_paint_core::{MapLayer, TerrainRegistry, TilePos, UnitRoster};

pub use terrain_paint_brush;
pub use terrain_paint_core;

/// The layer being edited and the units standing on it
#[derive(Resource, Debug, Clone)]
pub struct TerrainMap {
    pub layer: MapLayer,
    pub units: UnitRoster,
}

impl TerrainMap {
    pub fn new(layer: MapLayer) -> Self {
        Self {
            layer,
            units: UnitRoster::new(),
        }
    }

    pub fn with_units(mut self, units: UnitRoster) -> Self {
        self.units = units;
        self
    }
}

/// Terrain definitions and brush limits used for painting
#[derive(Resource, Debug, Clone)]
pub struct TerrainRules {
    pub registry: TerrainRegistry,
    pub settings: BrushSettings,
}

impl TerrainRules {
    pub fn new(registry: TerrainRegistry) -> Self {
        Self {
            registry,
            settings: BrushSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: BrushSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Message requesting one brush application
#[derive(Message, Debug, Clone)]
pub struct PaintTerrain(pub PaintRequest);

/// Message sent for every tile whose artwork changed
#[derive(Message, Debug, Clone)]
pub struct TileRedrawn(pub RedrawEvent);

/// Summary of the paint requests handled in the most recent frame that had any
#[derive(Resource, Debug, Clone, Default)]
pub struct LastPaint {
    /// Changed positions, in the order they were changed
    pub changed: Vec<TilePos>,
    /// Number of requests rejected as invalid
    pub rejected: usize,
    /// Number of units removed from repainted tiles
    pub evicted: usize,
}

/// Plugin running the terrain brush on [`PaintTerrain`] messages
pub struct TerrainPaintPlugin;

impl Plugin for TerrainPaintPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastPaint>()
            .add_message::<PaintTerrain>()
            .add_message::<TileRedrawn>()
            .add_systems(
                Update,
                apply_paint_requests
                    .run_if(resource_exists::<TerrainMap>.and(resource_exists::<TerrainRules>)),
            );
    }
}

/// System painting every queued request in order
fn apply_paint_requests(
    mut requests: MessageReader<PaintTerrain>,
    mut redrawn: MessageWriter<TileRedrawn>,
    mut map: ResMut<TerrainMap>,
    rules: Res<TerrainRules>,
    mut last: ResMut<LastPaint>,
) {
    if requests.is_empty() {
        return;
    }
    *last = LastPaint::default();

    let TerrainMap { layer, units } = &mut *map;
    for PaintTerrain(request) in requests.read() {
        match paint_with_settings(layer, &rules.registry, units, request, &rules.settings) {
            Ok(outcome) => {
                last.changed.extend(outcome.changed_positions());
                last.evicted += outcome.evicted.len();
                redrawn.write_batch(outcome.events.into_iter().map(TileRedrawn));
            }
            Err(e) => {
                warn!("Paint request at {:?} rejected: {}", request.origin, e);
                last.rejected += 1;
            }
        }
    }

    if !last.changed.is_empty() {
        info!(
            "Painted {} tiles ({} units evicted)",
            last.changed.len(),
            last.evicted
        );
    }
}
