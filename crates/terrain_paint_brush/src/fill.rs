//! Region filler: writes the requested terrain under the brush

use crate::changes::ChangeSet;
use crate::painter::TerrainPainter;
use crate::region::TileRect;
use terrain_paint_core::{TerrainId, TerrainLevel, UnitOccupancy};

impl<U: UnitOccupancy> TerrainPainter<'_, U> {
    /// Paint every tile of `rect` with `terrain`, returning the initial change-set.
    ///
    /// Tiles already holding `terrain` at its level are skipped. Neighbors are
    /// not examined here.
    pub fn fill_region(&mut self, rect: TileRect, terrain: TerrainId) -> ChangeSet {
        let level = if self.registry.is_overlay(terrain) {
            TerrainLevel::Overlay
        } else {
            TerrainLevel::Base
        };

        let mut changes = ChangeSet::new();
        for pos in rect.positions() {
            if !self.layer.in_bounds(pos) || self.layer.terrain(pos, level) == Some(terrain) {
                continue;
            }
            self.assign(&mut changes, pos, level, terrain);
        }

        log::trace!(
            "filled {} of {} tiles in {:?}",
            changes.len(),
            rect.area(),
            rect
        );
        changes
    }
}
