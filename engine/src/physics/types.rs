//! Math type re-exports from glam
//!
//! Geometry is double precision; grid positions are integer vectors.

pub use glam::{DVec2, DVec3, IVec3};
