//! Render Module
//!
//! Backend-neutral stone rendering. The graphics backend implements
//! [`StoneRenderer`]; this module resolves meshes, builds their triangle
//! batches on first use and issues one draw per stone.

pub mod cache;
pub mod stone_pass;

pub use cache::GeometryCache;
pub use stone_pass::{StoneRenderer, StoneTransform, render_model, render_preview};
