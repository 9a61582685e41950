//! Redraw notifier: final artwork pass over a stabilized change-set

use crate::changes::ChangeSet;
use crate::painter::TerrainPainter;
use std::collections::HashSet;
use terrain_paint_core::{TerrainLevel, TilePos, UnitOccupancy};

/// Artwork update the renderer (or minimap) has to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawEvent {
    /// A painted tile: solid graphics and transitions at both levels
    Tile {
        pos: TilePos,
        base_tile: Option<u32>,
        overlay_tile: Option<u32>,
        base_transitions: Vec<u32>,
        overlay_transitions: Vec<u32>,
    },
    /// An untouched neighbor whose transition art changed
    Transitions {
        pos: TilePos,
        base_transitions: Vec<u32>,
        overlay_transitions: Vec<u32>,
    },
}

impl RedrawEvent {
    pub fn pos(&self) -> TilePos {
        match self {
            RedrawEvent::Tile { pos, .. } | RedrawEvent::Transitions { pos, .. } => *pos,
        }
    }
}

impl<U: UnitOccupancy> TerrainPainter<'_, U> {
    /// Recompute the final artwork of every changed tile and of its untouched
    /// neighbors, in change-set order.
    ///
    /// Tiles overwritten after their last recorded assignment emit nothing.
    /// Neighbors emit at most once, and only when their transition count at
    /// either level differs from the count before the operation. Destroyed-overlay flags are cleared at the end.
    pub fn notify_redraw(&mut self, changes: &ChangeSet) -> Vec<RedrawEvent> {
        let mut events = Vec::new();
        let mut seen: HashSet<TilePos> = HashSet::new();

        for (&pos, assignment) in changes.iter() {
            let current = self.layer.tile(pos).and_then(|tile| tile.top_terrain());
            if current == assignment.top() {
                for level in TerrainLevel::ALL {
                    self.layer.recompute_solid_tile(pos, level, self.registry);
                    self.recompute_transitions(pos, level);
                }
                if let Some(tile) = self.layer.tile(pos) {
                    events.push(RedrawEvent::Tile {
                        pos,
                        base_tile: tile.base_tile,
                        overlay_tile: tile.overlay_tile,
                        base_transitions: tile.base_transitions.clone(),
                        overlay_transitions: tile.overlay_transitions.clone(),
                    });
                }
            }

            for neighbor in self.layer.neighbors(pos) {
                if changes.contains(neighbor) || !seen.insert(neighbor) {
                    continue;
                }
                // Border repair may already have rewritten the neighbor's art
                let Some((base_before, overlay_before)) = self
                    .snapshot(neighbor)
                    .or_else(|| self.layer.tile(neighbor))
                    .map(|tile| (tile.base_transitions.len(), tile.overlay_transitions.len()))
                else {
                    continue;
                };

                let base_transitions = self.recompute_transitions(neighbor, TerrainLevel::Base);
                let overlay_transitions =
                    self.recompute_transitions(neighbor, TerrainLevel::Overlay);
                if base_transitions.len() != base_before
                    || overlay_transitions.len() != overlay_before
                {
                    events.push(RedrawEvent::Transitions {
                        pos: neighbor,
                        base_transitions,
                        overlay_transitions,
                    });
                }
            }
        }

        for pos in changes.positions() {
            if let Some(tile) = self.layer.tile_mut(pos) {
                tile.overlay_destroyed = false;
            }
        }

        log::debug!(
            "redraw of {} changes produced {} events",
            changes.len(),
            events.len()
        );
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::TileRect;
    use crate::testing::*;
    use terrain_paint_core::UnitRoster;

    #[test]
    fn test_painted_tiles_emit_tile_events() {
        let registry = test_registry();
        let mut layer = grass_layer(&registry, 6, 6);
        let desert = terrain(&registry, "desert");

        let mut units = UnitRoster::new();
        let mut painter = TerrainPainter::new(&mut layer, &registry, &mut units, false);
        let changes = painter.fill_region(TileRect::square(TilePos::new(2, 2), 2), desert);
        let events = painter.notify_redraw(&changes);

        assert_eq!(events.len(), 4);
        assert!(events
            .iter()
            .all(|e| matches!(e, RedrawEvent::Tile { base_tile: Some(20), .. })));
        let order: Vec<_> = events.iter().map(RedrawEvent::pos).collect();
        let expected: Vec<_> = changes.positions().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_overwritten_tile_emits_nothing() {
        let registry = test_registry();
        let mut layer = grass_layer(&registry, 6, 6);
        let pos = TilePos::new(3, 3);

        let mut changes = ChangeSet::new();
        let desert_tile = {
            let mut tile = layer.tile(pos).unwrap().clone();
            tile.base_terrain = Some(terrain(&registry, "desert"));
            tile
        };
        // recorded as desert but the layer still holds grass
        changes.record(pos, &desert_tile);

        let mut units = UnitRoster::new();
        let mut painter = TerrainPainter::new(&mut layer, &registry, &mut units, false);
        let events = painter.notify_redraw(&changes);

        assert!(events.is_empty());
    }

    #[test]
    fn test_neighbor_with_changed_art_emits_transitions() {
        let registry = test_registry();
        let rock = terrain(&registry, "rock");
        let mut layer = grass_layer(&registry, 8, 8);
        // a 3x3 rock patch whose top edge sits at y = 2
        for y in 2..5 {
            for x in 2..5 {
                layer.set_terrain(TilePos::new(x, y), TerrainLevel::Base, rock);
            }
        }
        for pos in layer.positions().collect::<Vec<_>>() {
            layer.recompute_transitions(pos, TerrainLevel::Base, &registry);
        }
        assert_eq!(
            layer.tile(TilePos::new(3, 2)).unwrap().base_transitions,
            vec![ROCK_EDGE_ART[0].1]
        );

        // extending the patch upwards turns (3, 2) into an interior tile
        let mut units = UnitRoster::new();
        let mut painter = TerrainPainter::new(&mut layer, &registry, &mut units, false);
        let changes = painter.fill_region(
            TileRect {
                min: TilePos::new(2, 1),
                max: TilePos::new(5, 2),
            },
            rock,
        );
        let events = painter.notify_redraw(&changes);

        let transitions: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, RedrawEvent::Transitions { .. }))
            .map(RedrawEvent::pos)
            .collect();
        assert!(transitions.contains(&TilePos::new(3, 2)));
        assert_eq!(
            transitions.iter().filter(|&&p| p == TilePos::new(3, 2)).count(),
            1
        );
        assert!(layer
            .tile(TilePos::new(3, 2))
            .unwrap()
            .base_transitions
            .is_empty());
        assert_eq!(
            layer.tile(TilePos::new(3, 1)).unwrap().base_transitions,
            vec![ROCK_EDGE_ART[0].1]
        );
    }

    #[test]
    fn test_destroyed_flags_cleared() {
        let registry = test_registry();
        let mut layer = grass_layer(&registry, 4, 4);
        let pos = TilePos::new(1, 1);
        layer.set_terrain(pos, TerrainLevel::Overlay, terrain(&registry, "forest"));

        let mut units = UnitRoster::new();
        let mut painter = TerrainPainter::new(&mut layer, &registry, &mut units, false);
        let changes = painter.fill_region(TileRect::square(pos, 1), terrain(&registry, "desert"));
        assert!(painter.layer().tile(pos).unwrap().overlay_destroyed);
        painter.notify_redraw(&changes);

        assert!(!layer.tile(pos).unwrap().overlay_destroyed);
    }
}
