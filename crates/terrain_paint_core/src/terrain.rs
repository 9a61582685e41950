//! Terrain types and their authored definitions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Index of a terrain type inside a [`TerrainRegistry`](crate::TerrainRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerrainId(pub u16);

impl TerrainId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which slot of a tile a terrain occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainLevel {
    /// Primary terrain (grass, water, desert)
    Base,
    /// Drawn atop the base terrain (forest, rocks)
    Overlay,
}

impl TerrainLevel {
    /// Both levels, base first
    pub const ALL: [TerrainLevel; 2] = [TerrainLevel::Base, TerrainLevel::Overlay];

    pub fn index(self) -> usize {
        match self {
            TerrainLevel::Base => 0,
            TerrainLevel::Overlay => 1,
        }
    }
}

/// Movement flags used to decide whether a unit may stand on a terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passability {
    #[serde(default = "default_true")]
    pub land: bool,
    #[serde(default)]
    pub water: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Passability {
    fn default() -> Self {
        Self {
            land: true,
            water: false,
        }
    }
}

impl Passability {
    pub const LAND: Self = Self {
        land: true,
        water: false,
    };
    pub const WATER: Self = Self {
        land: false,
        water: true,
    };
    pub const BLOCKED: Self = Self {
        land: false,
        water: false,
    };
}

/// Transition tiles authored for one foreign-neighbor shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionArt {
    /// Optimized foreign-neighbor mask (see [`crate::neighbors`])
    pub mask: u8,
    pub tiles: Vec<u32>,
}

/// A terrain type as authored in a registry file.
///
/// Other terrains are referenced by ident and resolved when the registry is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainDef {
    pub ident: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overlay: bool,
    #[serde(default)]
    pub allows_single: bool,
    /// Terrains that may touch this one without a transition
    #[serde(default)]
    pub outer_border: Vec<String>,
    /// Buffer terrain to insert between this terrain and the keyed one
    #[serde(default)]
    pub intermediates: BTreeMap<String, String>,
    /// Present for harvestable terrains: the resource amount of a fresh tile
    #[serde(default)]
    pub harvest_amount: Option<u32>,
    #[serde(default)]
    pub solid_tiles: Vec<u32>,
    #[serde(default)]
    pub transitions: Vec<TransitionArt>,
    #[serde(default)]
    pub passability: Passability,
}

impl TerrainDef {
    /// Create a base terrain definition
    pub fn base(ident: impl Into<String>) -> Self {
        let ident = ident.into();
        Self {
            name: ident.clone(),
            ident,
            overlay: false,
            allows_single: false,
            outer_border: Vec::new(),
            intermediates: BTreeMap::new(),
            harvest_amount: None,
            solid_tiles: Vec::new(),
            transitions: Vec::new(),
            passability: Passability::default(),
        }
    }

    /// Create an overlay terrain definition
    pub fn overlay(ident: impl Into<String>) -> Self {
        Self {
            overlay: true,
            ..Self::base(ident)
        }
    }

    pub fn allow_single(mut self) -> Self {
        self.allows_single = true;
        self
    }

    pub fn border<I, S>(mut self, idents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outer_border.extend(idents.into_iter().map(Into::into));
        self
    }

    pub fn intermediate(mut self, toward: impl Into<String>, via: impl Into<String>) -> Self {
        self.intermediates.insert(toward.into(), via.into());
        self
    }

    pub fn harvest(mut self, amount: u32) -> Self {
        self.harvest_amount = Some(amount);
        self
    }

    pub fn solid(mut self, tiles: impl Into<Vec<u32>>) -> Self {
        self.solid_tiles = tiles.into();
        self
    }

    pub fn transition(mut self, mask: u8, tiles: impl Into<Vec<u32>>) -> Self {
        self.transitions.push(TransitionArt {
            mask,
            tiles: tiles.into(),
        });
        self
    }

    pub fn passable(mut self, passability: Passability) -> Self {
        self.passability = passability;
        self
    }
}

/// A resolved terrain type, owned by the registry
#[derive(Debug, Clone)]
pub struct TerrainType {
    pub id: TerrainId,
    pub ident: String,
    pub name: String,
    pub is_overlay: bool,
    pub allows_single: bool,
    pub outer_border_terrains: Vec<TerrainId>,
    pub intermediates: HashMap<TerrainId, TerrainId>,
    pub harvest_amount: Option<u32>,
    pub solid_tiles: Vec<u32>,
    /// Optimized foreign mask -> transition tiles
    pub transitions: HashMap<u8, Vec<u32>>,
    pub passability: Passability,
}

impl TerrainType {
    pub fn level(&self) -> TerrainLevel {
        if self.is_overlay {
            TerrainLevel::Overlay
        } else {
            TerrainLevel::Base
        }
    }

    /// Whether `other` may touch this terrain without a transition
    pub fn is_border_terrain(&self, other: TerrainId) -> bool {
        self.outer_border_terrains.contains(&other)
    }

    /// Terrain usable as a buffer between this terrain and `other`
    pub fn intermediate_terrain(&self, other: TerrainId) -> Option<TerrainId> {
        self.intermediates.get(&other).copied()
    }

    pub fn is_harvestable(&self) -> bool {
        self.harvest_amount.is_some()
    }

    /// Transition tiles authored for an optimized foreign mask
    pub fn transition_tiles(&self, mask: u8) -> &[u32] {
        self.transitions
            .get(&mask)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
