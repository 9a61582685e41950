//! Drag strokes: one paint per tile the cursor enters

use crate::paint::{paint_with_settings, PaintOutcome};
use crate::request::PaintRequest;
use crate::settings::BrushSettings;
use crate::PaintError;
use std::collections::HashSet;
use terrain_paint_core::{MapLayer, TerrainRegistry, TilePos, UnitOccupancy};

/// Cells the cursor crossed between two samples, both ends included.
///
/// Steps once per cell along the longer axis and rounds the other axis to the
/// nearest cell, so consecutive cells always touch.
pub fn line_cells(from: TilePos, to: TilePos) -> Vec<TilePos> {
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return vec![from];
    }

    // Round half away from zero; every result lies between the endpoints
    let along = |start: i32, delta: i64, step: i64| {
        let twice = 2 * delta * step + delta.signum() * steps;
        (i64::from(start) + twice / (2 * steps)) as i32
    };

    (0..=steps)
        .map(|step| TilePos::new(along(from.x, dx, step), along(from.y, dy, step)))
        .collect()
}

/// A mouse drag in progress.
///
/// Cells skipped between two cursor samples are interpolated, and cells
/// already painted during the stroke are not painted again.
#[derive(Debug, Clone)]
pub struct PaintStroke {
    template: PaintRequest,
    painted: HashSet<TilePos>,
    last: Option<TilePos>,
    outcome: PaintOutcome,
}

impl PaintStroke {
    /// Start a stroke; `template` supplies everything but the origin
    pub fn begin(template: PaintRequest) -> Self {
        Self {
            template,
            painted: HashSet::new(),
            last: None,
            outcome: PaintOutcome::default(),
        }
    }

    /// Move the cursor to `pos`, painting every new cell on the way.
    /// Returns how many cells were painted.
    pub fn drag_to<U: UnitOccupancy>(
        &mut self,
        layer: &mut MapLayer,
        registry: &TerrainRegistry,
        units: &mut U,
        settings: &BrushSettings,
        pos: TilePos,
    ) -> Result<usize, PaintError> {
        let cells = match self.last {
            Some(last) => line_cells(last, pos),
            None => vec![pos],
        };
        self.last = Some(pos);

        let mut count = 0;
        for cell in cells {
            if !self.painted.insert(cell) {
                continue;
            }
            let request = self.template.at(cell);
            let outcome = paint_with_settings(layer, registry, units, &request, settings)?;
            self.outcome.merge(outcome);
            count += 1;
        }
        Ok(count)
    }

    pub fn painted_cells(&self) -> usize {
        self.painted.len()
    }

    /// End the stroke, returning everything it did as one operation
    pub fn finish(self) -> PaintOutcome {
        log::debug!(
            "stroke over {} cells changed {} tiles",
            self.painted.len(),
            self.outcome.changed.len()
        );
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn test_line_horizontal() {
        let line = line_cells(TilePos::new(1, 2), TilePos::new(4, 2));
        assert_eq!(
            line,
            vec![
                TilePos::new(1, 2),
                TilePos::new(2, 2),
                TilePos::new(3, 2),
                TilePos::new(4, 2)
            ]
        );
    }

    #[test]
    fn test_line_diagonal_and_reverse() {
        let line = line_cells(TilePos::new(3, 3), TilePos::new(0, 0));
        assert_eq!(line.len(), 4);
        assert_eq!(line.first(), Some(&TilePos::new(3, 3)));
        assert_eq!(line.last(), Some(&TilePos::new(0, 0)));
        assert!(line.iter().all(|p| p.x == p.y));
    }

    #[test]
    fn test_line_shallow_steps_every_column() {
        let line = line_cells(TilePos::new(0, 0), TilePos::new(4, 2));
        assert_eq!(line.len(), 5);
        for pair in line.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, 1);
            assert!((0..=1).contains(&(pair[1].y - pair[0].y)));
        }
        assert_eq!(line.last(), Some(&TilePos::new(4, 2)));
    }

    #[test]
    fn test_line_single_point() {
        let pos = TilePos::new(7, -2);
        assert_eq!(line_cells(pos, pos), vec![pos]);
    }

    #[test]
    fn test_drag_interpolates_and_skips_painted() {
        let registry = test_registry();
        let desert = terrain(&registry, "desert");
        let mut layer = grass_layer(&registry, 12, 12);
        let settings = BrushSettings::default();

        let mut stroke = PaintStroke::begin(PaintRequest::new(TilePos::new(0, 0), desert));
        let first = stroke
            .drag_to(&mut layer, &registry, &mut (), &settings, TilePos::new(2, 5))
            .unwrap();
        let second = stroke
            .drag_to(&mut layer, &registry, &mut (), &settings, TilePos::new(6, 5))
            .unwrap();
        let back = stroke
            .drag_to(&mut layer, &registry, &mut (), &settings, TilePos::new(4, 5))
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 4);
        assert_eq!(back, 0);
        assert_eq!(stroke.painted_cells(), 5);

        let outcome = stroke.finish();
        for x in 2..=6 {
            assert_eq!(base_at(&layer, x, 5), Some(desert));
            assert!(outcome.changed.contains_key(&TilePos::new(x, 5)));
        }
        assert_eq!(base_at(&layer, 1, 5), Some(terrain(&registry, "scrubland")));
    }

    #[test]
    fn test_stroke_undo_restores_everything() {
        let registry = test_registry();
        let rock = terrain(&registry, "rock");
        let mut layer = grass_layer(&registry, 12, 12);
        let before = layer.clone();
        let settings = BrushSettings::default();

        let mut stroke = PaintStroke::begin(PaintRequest::new(TilePos::new(0, 0), rock));
        for pos in [TilePos::new(3, 3), TilePos::new(8, 3), TilePos::new(8, 8)] {
            stroke
                .drag_to(&mut layer, &registry, &mut (), &settings, pos)
                .unwrap();
        }
        let outcome = stroke.finish();
        assert!(!outcome.is_empty());

        outcome.undo(&mut layer);
        assert_eq!(layer, before);
    }

    #[test]
    fn test_stroke_stops_on_rejected_request() {
        let registry = test_registry();
        let mut layer = grass_layer(&registry, 6, 6);
        let settings = BrushSettings {
            max_brush_size: 2,
            ..BrushSettings::default()
        };
        let template =
            PaintRequest::new(TilePos::new(0, 0), terrain(&registry, "desert")).with_brush_size(3);

        let mut stroke = PaintStroke::begin(template);
        let result = stroke.drag_to(&mut layer, &registry, &mut (), &settings, TilePos::new(1, 1));
        assert_eq!(result, Err(PaintError::BrushTooLarge { size: 3, max: 2 }));
    }
}
