//! Paint entry point: resolves the brush and drives the pipeline per rectangle

use crate::changes::TerrainAssignment;
use crate::painter::TerrainPainter;
use crate::redraw::RedrawEvent;
use crate::region::resolve_regions;
use crate::request::PaintRequest;
use crate::settings::BrushSettings;
use crate::PaintError;
use indexmap::IndexMap;
use terrain_paint_core::{MapLayer, TerrainRegistry, Tile, TilePos, Unit, UnitOccupancy};

/// Everything one paint operation did to the map
#[derive(Debug, Clone, Default)]
pub struct PaintOutcome {
    /// Changed positions with the terrain they ended up holding
    pub changed: IndexMap<TilePos, TerrainAssignment>,
    /// Redraw events in emission order
    pub events: Vec<RedrawEvent>,
    /// Units removed because the new terrain is illegal for them
    pub evicted: Vec<Unit>,
    /// State of every touched tile before the operation
    pub snapshots: IndexMap<TilePos, Tile>,
}

impl PaintOutcome {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn changed_positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.changed.keys().copied()
    }

    /// Fold a later operation into this one. Snapshots keep the earliest state.
    pub fn merge(&mut self, later: PaintOutcome) {
        self.changed.extend(later.changed);
        self.events.extend(later.events);
        self.evicted.extend(later.evicted);
        for (pos, tile) in later.snapshots {
            self.snapshots.entry(pos).or_insert(tile);
        }
    }

    /// Restore every touched tile to its state before the operation.
    ///
    /// Evicted units are not placed back; they are returned in `evicted`.
    pub fn undo(&self, layer: &mut MapLayer) {
        for (&pos, snapshot) in &self.snapshots {
            if let Some(tile) = layer.tile_mut(pos) {
                *tile = snapshot.clone();
            }
        }
        log::debug!("restored {} tiles", self.snapshots.len());
    }
}

/// Paint `request` onto `layer` with the default brush settings
pub fn paint<U: UnitOccupancy>(
    layer: &mut MapLayer,
    registry: &TerrainRegistry,
    units: &mut U,
    request: &PaintRequest,
) -> Result<PaintOutcome, PaintError> {
    paint_with_settings(layer, registry, units, request, &BrushSettings::default())
}

/// Paint `request` onto `layer`.
///
/// The brush and each of its mirror copies run the fill, stabilize and redraw
/// stages in turn with a change-set of their own.
pub fn paint_with_settings<U: UnitOccupancy>(
    layer: &mut MapLayer,
    registry: &TerrainRegistry,
    units: &mut U,
    request: &PaintRequest,
    settings: &BrushSettings,
) -> Result<PaintOutcome, PaintError> {
    if let Err(e) = request.validate(layer, registry, settings) {
        log::warn!("Rejected paint request at {:?}: {}", request.origin, e);
        return Err(e);
    }

    let regions = resolve_regions(request, layer.width(), layer.height());
    let mut outcome = PaintOutcome::default();
    let mut painter = TerrainPainter::new(layer, registry, units, request.preserve_overlay);

    for rect in regions {
        let mut changes = painter.fill_region(rect, request.terrain);
        if changes.is_empty() {
            continue;
        }
        painter.stabilize(&mut changes);
        outcome.events.extend(painter.notify_redraw(&changes));
        outcome.changed.extend(changes.into_inner());
    }

    let (snapshots, evicted) = painter.finish();
    outcome.snapshots = snapshots;
    outcome.evicted = evicted;

    log::debug!(
        "painted {:?} at ({}, {}): {} tiles changed, {} events",
        request.terrain,
        request.origin.x,
        request.origin.y,
        outcome.changed.len(),
        outcome.events.len()
    );
    Ok(outcome)
}
