//! World Module
//!
//! The spatial model of placed stones: grid conventions, the stone store
//! with its collision, placement and pick queries, stone colors, and the
//! binary save format.

pub mod color;
pub mod grid;
pub mod model;
pub mod persistence;

pub use color::{SELECTION_HIGHLIGHT, StoneColor};
pub use grid::{COLLISION_EPSILON, LEVEL_HEIGHT, PICK_HEIGHT_BIAS, grid_to_world, level_to_world, snap_to_grid};
pub use model::{InsertOutcome, Model, SelectionGroup, Stone, StonePlacement, normalize_rotation};
pub use persistence::{
    LoadedDocument, MODEL_MAGIC, MODEL_VERSION, PersistError, load_document, load_from_file, save_document,
    save_to_file,
};
