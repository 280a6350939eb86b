//! Game settings and preferences
//!
//! Persisted as JSON next to the save file. Missing or unreadable settings
//! fall back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DISPLAY_ZOOM_FACTOR;
use crate::persistence::StorageError;
use crate::renderer::Color;

/// Window scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayMode {
    #[default]
    Default,
    Zoomed,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Default => "Default",
            DisplayMode::Zoomed => "Zoomed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "normal" => Some(DisplayMode::Default),
            "zoomed" | "zoom" => Some(DisplayMode::Zoomed),
            _ => None,
        }
    }

    /// Scale applied to everything drawn
    pub fn zoom(&self) -> f32 {
        match self {
            DisplayMode::Default => 1.0,
            DisplayMode::Zoomed => DISPLAY_ZOOM_FACTOR,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Default => DisplayMode::Zoomed,
            DisplayMode::Zoomed => DisplayMode::Default,
        }
    }
}

/// Colors handed to the draw pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Intro curtain color
    pub scene_color: Color,
    /// Tint applied to the T-Rex sprites
    pub trex_tint: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scene_color: Color::WHITE,
            trex_tint: Color::WHITE,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window scale
    pub display_mode: DisplayMode,

    // === Colors ===
    /// Intro curtain color
    pub scene_color: Color,
    /// T-Rex tint (e.g. hot pink for a change)
    pub trex_tint: Color,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Default,

            scene_color: Color::WHITE,
            trex_tint: Color::WHITE,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            scene_color: self.scene_color,
            trex_tint: self.trex_tint,
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StorageError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| StorageError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
