//! Game Module
//!
//! Designer-level systems that build on top of the engine.

pub mod builder;
pub mod config;

pub use builder::{Brush, EditorSession, EditorState, plan_drag, plan_stack};
pub use config::{ConfigError, EditorConfig};
