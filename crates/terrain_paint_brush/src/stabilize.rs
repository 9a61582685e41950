//! Adjacency stabilizer: repairs the neighborhood of freshly painted tiles
//!
//! Two stages run over explicit worklists and fold every tile they repaint
//! back into the same [`ChangeSet`]:
//!
//! - [`collapse_unsolid_isolates`](TerrainPainter::collapse_unsolid_isolates)
//!   absorbs tiles that cannot be drawn (not solid, no transition art) into a
//!   uniform patch by repainting their neighbors.
//! - [`repair_borders`](TerrainPainter::repair_borders) inserts intermediate
//!   terrain between incompatible base terrains and resolves neighbors that
//!   were left without a valid depiction.
//!
//! [`stabilize`](TerrainPainter::stabilize) alternates the two until a round of
//! border repair adds nothing. Positions already in the change-set are never
//! added again, so each round that continues grows the set, which is bounded by
//! the layer size.

use crate::changes::ChangeSet;
use crate::painter::TerrainPainter;
use std::collections::VecDeque;
use terrain_paint_core::{TerrainLevel, TilePos, UnitOccupancy};

impl<U: UnitOccupancy> TerrainPainter<'_, U> {
    /// Run both stages to a fixpoint, starting from every position in `changes`
    pub fn stabilize(&mut self, changes: &mut ChangeSet) {
        let seeded = changes.len();
        let mut pending: Vec<TilePos> = changes.positions().collect();
        let mut rounds = 0;

        while !pending.is_empty() {
            rounds += 1;
            let collapsed = self.collapse_unsolid_isolates(changes, pending.clone());
            pending.extend(collapsed);
            pending = self.repair_borders(changes, pending);
        }

        log::debug!(
            "stabilized {} painted tiles into {} changes in {} rounds",
            seeded,
            changes.len(),
            rounds
        );
    }

    /// Absorb undrawable tiles into a uniform patch.
    ///
    /// For each position (including ones appended along the way): refresh its
    /// transitions at both levels; when its top terrain is neither solid nor
    /// covered by transition art, every neighbor outside the change-set is
    /// repainted to that terrain and queued. Returns the appended positions.
    pub fn collapse_unsolid_isolates(
        &mut self,
        changes: &mut ChangeSet,
        work: Vec<TilePos>,
    ) -> Vec<TilePos> {
        let mut queue: VecDeque<TilePos> = work.into();
        let mut added = Vec::new();

        while let Some(pos) = queue.pop_front() {
            for level in TerrainLevel::ALL {
                self.recompute_transitions(pos, level);
            }

            let Some(tile) = self.layer.tile(pos) else {
                continue;
            };
            let level = tile.top_level();
            let Some(top) = tile.terrain(level) else {
                continue;
            };
            if !tile.transitions(level).is_empty() || self.is_solid(pos, level) {
                continue;
            }

            for neighbor in self.layer.neighbors(pos) {
                if changes.contains(neighbor) {
                    continue;
                }
                log::trace!(
                    "collapsing ({}, {}) into lone tile at ({}, {})",
                    neighbor.x,
                    neighbor.y,
                    pos.x,
                    pos.y
                );
                self.assign(changes, neighbor, level, top);
                queue.push_back(neighbor);
                added.push(neighbor);
            }
        }

        added
    }

    /// Repair the borders between changed tiles and their untouched neighbors.
    ///
    /// For each position (including ones appended along the way), overlay level
    /// first, then base: every neighbor outside the change-set holding a
    /// different terrain at that level gets its transitions refreshed. At the
    /// base level, incompatible terrains get the registry's intermediate
    /// terrain. Otherwise a neighbor that is neither solid nor covered by art
    /// loses its overlay, or takes this tile's base terrain. Repaired neighbors
    /// are queued. Returns the appended positions.
    pub fn repair_borders(&mut self, changes: &mut ChangeSet, work: Vec<TilePos>) -> Vec<TilePos> {
        let mut queue: VecDeque<TilePos> = work.into();
        let mut added = Vec::new();

        while let Some(pos) = queue.pop_front() {
            for level in [TerrainLevel::Overlay, TerrainLevel::Base] {
                for neighbor in self.layer.neighbors(pos) {
                    // Earlier repairs of this tile may have changed its terrain
                    let Some(terrain) = self.layer.terrain(pos, level) else {
                        break;
                    };
                    if changes.contains(neighbor) {
                        continue;
                    }
                    let Some(neighbor_terrain) = self.layer.terrain(neighbor, level) else {
                        continue;
                    };
                    if neighbor_terrain == terrain {
                        continue;
                    }

                    let has_art = !self.recompute_transitions(neighbor, level).is_empty();
                    let solid = self.is_solid(neighbor, level);

                    if level == TerrainLevel::Base
                        && !self.registry.are_border_compatible(terrain, neighbor_terrain)
                    {
                        let intermediate = self
                            .registry
                            .intermediate_terrain(terrain, neighbor_terrain)
                            .filter(|&via| via != neighbor_terrain);
                        if let Some(via) = intermediate {
                            log::trace!(
                                "inserting intermediate {:?} at ({}, {})",
                                via,
                                neighbor.x,
                                neighbor.y
                            );
                            self.assign(changes, neighbor, TerrainLevel::Base, via);
                            queue.push_back(neighbor);
                            added.push(neighbor);
                            continue;
                        }
                    }

                    if solid || has_art {
                        continue;
                    }

                    match level {
                        TerrainLevel::Overlay => self.remove_overlay(changes, neighbor),
                        TerrainLevel::Base => {
                            self.assign(changes, neighbor, TerrainLevel::Base, terrain)
                        }
                    }
                    queue.push_back(neighbor);
                    added.push(neighbor);
                }
            }
        }

        added
    }
}
