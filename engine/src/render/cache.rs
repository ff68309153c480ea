//! Lazily built triangle batches
//!
//! Catalog definitions stay immutable; their expanded triangle lists live
//! here, keyed by mesh id, and are built the first time a stone of that type
//! is drawn. A definition that fails to build is remembered as failed so the
//! warning is logged once rather than every frame.

use std::collections::HashMap;

use tracing::warn;

use crate::mesh::{MeshCatalog, TriangleBatch, build};

#[derive(Debug, Default)]
pub struct GeometryCache {
    batches: HashMap<i32, Option<TriangleBatch>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch for `mesh_id`, building it on first request. `None` when the
    /// catalog has no such mesh or its definition does not build.
    pub fn batch(&mut self, catalog: &MeshCatalog, mesh_id: i32) -> Option<&TriangleBatch> {
        if !self.batches.contains_key(&mesh_id) {
            let definition = catalog.by_id(mesh_id)?;
            let built = match build(definition) {
                Ok(batch) => Some(batch),
                Err(e) => {
                    warn!(mesh = %definition.name, id = mesh_id, "mesh does not build: {e}");
                    None
                }
            };
            self.batches.insert(mesh_id, built);
        }
        self.batches.get(&mesh_id).and_then(Option::as_ref)
    }

    /// Number of meshes built (or attempted) so far.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Forget every batch. Call after the catalog is reloaded.
    pub fn invalidate(&mut self) {
        self.batches.clear();
    }
}
