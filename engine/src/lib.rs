//! Block Designer Engine Library
//!
//! Core of a stone block designer: a small DSL compiled into a catalog of
//! stone meshes, a grid-snapped model of placed stones with collision,
//! picking and selection groups, and a planner that lays walls in running
//! bond.
//!
//! # Modules
//!
//! - [`mesh`] - Stone DSL lexer/compiler, mesh catalog and triangle batches
//! - [`physics`] - Axis-aligned boxes and ray tests
//! - [`world`] - Placed-stone model, grid constants and save files
//! - [`render`] - Backend-neutral draw pass over the model
//! - [`game`] - Placement planner, editor session and configuration
//!
//! # Example
//!
//! ```ignore
//! use block_designer_engine::mesh::compile_file;
//! use block_designer_engine::game::{EditorConfig, EditorSession};
//! use glam::DVec3;
//!
//! let config = EditorConfig::default();
//! let catalog = compile_file(&config.stone_asset)?;
//! let mut session = EditorSession::new(catalog, &config);
//!
//! // Drag a wall from the cursor's first cell to a second one
//! session.pointer_moved(DVec3::new(0.2, 20.0, 0.2), DVec3::NEG_Y);
//! session.pointer_pressed();
//! session.pointer_moved(DVec3::new(9.2, 20.0, 0.2), DVec3::NEG_Y);
//! session.pointer_released();
//! ```

pub mod mesh;
pub mod physics;
pub mod render;
pub mod world;

// Designer-level modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the types most callers need
pub use mesh::{MeshCatalog, MeshDefinition, ParseError, compile, compile_file, compile_lenient};
pub use physics::{Aabb, Ray};
pub use world::{InsertOutcome, Model, PersistError, Stone, StoneColor, StonePlacement};
