//! Paint requests as issued by the editor

use crate::settings::BrushSettings;
use crate::PaintError;
use serde::{Deserialize, Serialize};
use terrain_paint_core::{MapLayer, TerrainId, TerrainRegistry, TilePos};

/// Symmetric replication of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MirrorMode {
    #[default]
    None,
    /// Mirror across the vertical axis
    TwoWay,
    /// Mirror across both axes
    FourWay,
}

/// One click (or one drag step) of the terrain brush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintRequest {
    /// Top-left corner of the brush square
    pub origin: TilePos,
    pub terrain: TerrainId,
    /// Side length of the brush square
    pub brush_size: u32,
    pub mirror: MirrorMode,
    /// Keep overlays when painting base terrain underneath them
    pub preserve_overlay: bool,
}

impl PaintRequest {
    pub fn new(origin: TilePos, terrain: TerrainId) -> Self {
        Self {
            origin,
            terrain,
            brush_size: 1,
            mirror: MirrorMode::None,
            preserve_overlay: false,
        }
    }

    /// Build a request using the editor's current brush settings
    pub fn from_settings(origin: TilePos, terrain: TerrainId, settings: &BrushSettings) -> Self {
        Self {
            origin,
            terrain,
            brush_size: settings.default_brush_size,
            mirror: settings.mirror_mode,
            preserve_overlay: settings.preserve_overlay,
        }
    }

    pub fn with_brush_size(mut self, brush_size: u32) -> Self {
        self.brush_size = brush_size;
        self
    }

    pub fn with_mirror(mut self, mirror: MirrorMode) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_preserve_overlay(mut self, preserve_overlay: bool) -> Self {
        self.preserve_overlay = preserve_overlay;
        self
    }

    /// Same brush moved to another origin
    pub fn at(&self, origin: TilePos) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }

    /// Reject requests the pipeline cannot run
    pub fn validate(
        &self,
        layer: &MapLayer,
        registry: &TerrainRegistry,
        settings: &BrushSettings,
    ) -> Result<(), PaintError> {
        if layer.is_empty() {
            return Err(PaintError::EmptyLayer);
        }
        if self.brush_size == 0 {
            return Err(PaintError::InvalidBrushSize);
        }
        if self.brush_size > settings.max_brush_size {
            return Err(PaintError::BrushTooLarge {
                size: self.brush_size,
                max: settings.max_brush_size,
            });
        }
        if !registry.contains(self.terrain) {
            return Err(PaintError::UnknownTerrain(self.terrain));
        }
        Ok(())
    }
}
