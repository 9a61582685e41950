//! Brush settings that persist across editor sessions

use crate::request::MirrorMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest brush the editor allows unless configured otherwise
pub const DEFAULT_MAX_BRUSH_SIZE: u32 = 32;

/// Settings format written by [`save_settings`]
pub const SETTINGS_VERSION: u32 = 1;

/// Errors that can occur when loading or saving brush settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Unsupported settings version {version} (expected at most {expected})")]
    UnsupportedVersion { version: u32, expected: u32 },
}

/// Terrain brush settings, stored as TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Format version; older files are upgraded on load, newer ones rejected
    pub version: u32,
    pub max_brush_size: u32,
    pub default_brush_size: u32,
    pub mirror_mode: MirrorMode,
    pub preserve_overlay: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            max_brush_size: DEFAULT_MAX_BRUSH_SIZE,
            default_brush_size: 1,
            mirror_mode: MirrorMode::None,
            preserve_overlay: false,
        }
    }
}

/// Load brush settings from a TOML file
pub fn load_settings(path: &Path) -> Result<BrushSettings, SettingsError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SettingsError::IoError(e.to_string()))?;

    parse_settings(&content)
}

/// Parse brush settings from a TOML string. Missing keys take their defaults.
pub fn parse_settings(content: &str) -> Result<BrushSettings, SettingsError> {
    let mut settings: BrushSettings =
        toml::from_str(content).map_err(|e| SettingsError::ParseError(e.to_string()))?;

    if settings.version > SETTINGS_VERSION {
        return Err(SettingsError::UnsupportedVersion {
            version: settings.version,
            expected: SETTINGS_VERSION,
        });
    }
    if settings.version < SETTINGS_VERSION {
        // Version 0 predates the field; its keys are unchanged
        log::info!(
            "Upgrading brush settings from version {} to {}",
            settings.version,
            SETTINGS_VERSION
        );
        settings.version = SETTINGS_VERSION;
    }

    Ok(settings)
}

/// Save brush settings to a TOML file
pub fn save_settings(settings: &BrushSettings, path: &Path) -> Result<(), SettingsError> {
    let content = toml::to_string_pretty(settings)
        .map_err(|e| SettingsError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SettingsError::IoError(e.to_string()))?;

    Ok(())
}
