//! Physics module for the block designer
//!
//! Pure geometric queries used by the spatial model: box overlap for
//! collision rejection, ray-box intersection for picking, and ray-plane
//! intersection for placement.
//!
//! # Unit System
//!
//! **1 unit = 1 grid cell horizontally**. Vertically a grid level is
//! [`crate::world::grid::LEVEL_HEIGHT`] units, so a stone's world Y is
//! `level * LEVEL_HEIGHT`.
//!
//! All geometry is double precision (`glam::DVec3`), matching the precision
//! of the mesh definitions compiled from the asset DSL.
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`aabb`] - Axis-aligned boxes: overlap, slab ray test, Y-rotation fold
//! - [`ray`] - Rays and horizontal-plane intersection

pub mod aabb;
pub mod ray;
pub mod types;

pub use aabb::Aabb;
pub use ray::{PlaneHit, Ray};
pub use types::{DVec2, DVec3, IVec3};
