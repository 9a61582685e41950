//! Terrain registry: the rule book consulted by the terrain brush

use crate::neighbors::optimize_foreign_mask;
use crate::terrain::{TerrainDef, TerrainId, TerrainType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a terrain registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Duplicate terrain '{0}'")]
    DuplicateTerrain(String),
    #[error("Terrain '{terrain}' references unknown terrain '{reference}'")]
    UnknownTerrain { terrain: String, reference: String },
    #[error("Intermediate terrain '{0}' must be a base terrain")]
    OverlayIntermediate(String),
    #[error("Too many terrains: {0}")]
    TooManyTerrains(usize),
}

/// On-disk registry format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    pub terrains: Vec<TerrainDef>,
}

/// All terrain types known to a map, indexed by [`TerrainId`]
#[derive(Debug, Clone, Default)]
pub struct TerrainRegistry {
    terrains: Vec<TerrainType>,
    by_ident: HashMap<String, TerrainId>,
}

impl TerrainRegistry {
    /// Build a registry from authored definitions, resolving all ident references
    pub fn from_defs(defs: Vec<TerrainDef>) -> Result<Self, RegistryError> {
        if defs.len() > u16::MAX as usize {
            return Err(RegistryError::TooManyTerrains(defs.len()));
        }

        let mut by_ident = HashMap::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            if by_ident
                .insert(def.ident.clone(), TerrainId(index as u16))
                .is_some()
            {
                return Err(RegistryError::DuplicateTerrain(def.ident.clone()));
            }
        }

        let resolve = |terrain: &str, reference: &str| {
            by_ident
                .get(reference)
                .copied()
                .ok_or_else(|| RegistryError::UnknownTerrain {
                    terrain: terrain.to_string(),
                    reference: reference.to_string(),
                })
        };

        let mut terrains = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let outer_border_terrains = def
                .outer_border
                .iter()
                .map(|other| resolve(&def.ident, other))
                .collect::<Result<Vec<_>, _>>()?;

            let mut intermediates = HashMap::with_capacity(def.intermediates.len());
            for (toward, via) in &def.intermediates {
                let toward = resolve(&def.ident, toward)?;
                let via_id = resolve(&def.ident, via)?;
                if defs[via_id.index()].overlay {
                    return Err(RegistryError::OverlayIntermediate(via.clone()));
                }
                intermediates.insert(toward, via_id);
            }

            let mut transitions: HashMap<u8, Vec<u32>> = HashMap::new();
            for art in &def.transitions {
                transitions
                    .entry(optimize_foreign_mask(art.mask))
                    .or_default()
                    .extend(art.tiles.iter().copied());
            }

            terrains.push(TerrainType {
                id: TerrainId(index as u16),
                ident: def.ident.clone(),
                name: if def.name.is_empty() {
                    def.ident.clone()
                } else {
                    def.name.clone()
                },
                is_overlay: def.overlay,
                allows_single: def.allows_single,
                outer_border_terrains,
                intermediates,
                harvest_amount: def.harvest_amount,
                solid_tiles: def.solid_tiles.clone(),
                transitions,
                passability: def.passability,
            });
        }

        log::debug!("terrain registry built with {} terrains", terrains.len());

        Ok(Self {
            terrains,
            by_ident,
        })
    }

    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    pub fn get(&self, id: TerrainId) -> Option<&TerrainType> {
        self.terrains.get(id.index())
    }

    pub fn contains(&self, id: TerrainId) -> bool {
        id.index() < self.terrains.len()
    }

    /// Look up a terrain id by ident
    pub fn id_of(&self, ident: &str) -> Option<TerrainId> {
        self.by_ident.get(ident).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerrainType> {
        self.terrains.iter()
    }

    pub fn is_overlay(&self, id: TerrainId) -> bool {
        self.get(id).is_some_and(|t| t.is_overlay)
    }

    pub fn allows_single(&self, id: TerrainId) -> bool {
        self.get(id).is_some_and(|t| t.allows_single)
    }

    pub fn outer_border_terrains(&self, id: TerrainId) -> &[TerrainId] {
        self.get(id)
            .map(|t| t.outer_border_terrains.as_slice())
            .unwrap_or_default()
    }

    /// Whether `other` is listed as an outer border of `id`
    pub fn is_border_terrain(&self, id: TerrainId, other: TerrainId) -> bool {
        self.get(id).is_some_and(|t| t.is_border_terrain(other))
    }

    /// Whether two terrains may touch without an intermediate terrain.
    ///
    /// Either side listing the other as an outer border is enough.
    pub fn are_border_compatible(&self, a: TerrainId, b: TerrainId) -> bool {
        a == b || self.is_border_terrain(a, b) || self.is_border_terrain(b, a)
    }

    /// Buffer terrain to insert between `from` and `toward`.
    ///
    /// Falls back to the reverse lookup so authors only need to list a pair once.
    pub fn intermediate_terrain(&self, from: TerrainId, toward: TerrainId) -> Option<TerrainId> {
        self.get(from)
            .and_then(|t| t.intermediate_terrain(toward))
            .or_else(|| self.get(toward).and_then(|t| t.intermediate_terrain(from)))
    }

    pub fn harvest_amount(&self, id: TerrainId) -> Option<u32> {
        self.get(id).and_then(|t| t.harvest_amount)
    }
}

/// Load a terrain registry from a JSON file
pub fn load_registry(path: &Path) -> Result<TerrainRegistry, RegistryError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| RegistryError::IoError(e.to_string()))?;

    parse_registry(&content)
}

/// Parse a terrain registry from a JSON string
pub fn parse_registry(json: &str) -> Result<TerrainRegistry, RegistryError> {
    let file: RegistryFile =
        serde_json::from_str(json).map_err(|e| RegistryError::ParseError(e.to_string()))?;

    TerrainRegistry::from_defs(file.terrains)
}

/// Load a terrain registry from bytes
pub fn load_registry_from_bytes(bytes: &[u8]) -> Result<TerrainRegistry, RegistryError> {
    let file: RegistryFile =
        serde_json::from_slice(bytes).map_err(|e| RegistryError::ParseError(e.to_string()))?;

    TerrainRegistry::from_defs(file.terrains)
}
