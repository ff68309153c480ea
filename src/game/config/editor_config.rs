//! Editor Configuration
//!
//! Startup settings for the block designer: which asset file to compile, the
//! initial brush and the number-key palette. Stored as JSON; any field left
//! out of the file takes its `Default` value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::world::StoneColor;

/// Type codes bound to number keys 0-9, in key order.
pub const DEFAULT_PALETTE_HOTKEYS: [i32; 10] = [1032, 131, 231, 331, 232, 431, 332, 632, 432, 832];

/// Errors from reading or writing an editor config file.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Block designer startup configuration.
///
/// `Default` returns the built-in palette and brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Stone DSL file compiled into the mesh catalog
    pub stone_asset: PathBuf,
    /// Brush type code at startup
    pub default_stone_type: i32,
    /// Brush color at startup
    pub default_color: StoneColor,
    /// Type codes selected by number keys 0-9
    pub palette_hotkeys: [i32; 10],
    /// Stones stacked per placement
    pub stack_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stone_asset: PathBuf::from("assets/stones.txt"),
            default_stone_type: 432,
            default_color: StoneColor::White,
            palette_hotkeys: DEFAULT_PALETTE_HOTKEYS,
            stack_height: 1,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Type code bound to number key `key`, if any.
    pub fn hotkey(&self, key: u8) -> Option<i32> {
        self.palette_hotkeys.get(usize::from(key)).copied()
    }
}
