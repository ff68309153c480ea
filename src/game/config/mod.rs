//! Config Module
//!
//! Centralized editor configuration.

pub mod editor_config;

pub use editor_config::{ConfigError, DEFAULT_PALETTE_HOTKEYS, EditorConfig};
