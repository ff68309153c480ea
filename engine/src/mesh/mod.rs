//! Stone Mesh Module
//!
//! Compiles the stone DSL into a [`MeshCatalog`] and expands catalog entries
//! into GPU-ready triangle batches.
//!
//! # Architecture
//!
//! ```text
//! asset text ──► lexer ──► parser ──► MeshCatalog ──► geometry::build ──► TriangleBatch
//!                                         │
//!                                         └──► compute_aabb / footprint (spatial model)
//! ```

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod lexer;
pub mod parser;

pub use catalog::{Face, MeshCatalog, MeshDefinition, TexCoordSet, footprint};
pub use error::{AssetError, GeometryError, ParseError};
pub use geometry::{MeshVertex, TriangleBatch, build};
pub use lexer::{Token, tokenize};
pub use parser::{compile, compile_file, compile_lenient};
