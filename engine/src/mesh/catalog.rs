//! Mesh Catalog
//!
//! The compiled form of a stone asset file: an ordered list of named mesh
//! definitions plus an id index. The spatial model looks stones up by id
//! (the stone's type code), the palette UI lists definitions by index.
//!
//! The catalog is built once by the compiler and only read afterwards.

use std::collections::HashMap;
use std::f64::consts::PI;

use glam::{DVec3, IVec2, IVec3};

use crate::physics::Aabb;

// ============================================================================
// MESH DEFINITION
// ============================================================================

/// Texture coordinates for one or more faces, in pixels of the mesh texture.
#[derive(Debug, Clone, PartialEq)]
pub enum TexCoordSet {
    /// Two opposite corners, expanded per triangle of a quad face.
    Rect([IVec2; 2]),
    /// One coordinate per face vertex, sampled like the vertex fan.
    Polygon(Vec<IVec2>),
}

impl TexCoordSet {
    pub fn points(&self) -> &[IVec2] {
        match self {
            TexCoordSet::Rect(corners) => corners,
            TexCoordSet::Polygon(points) => points,
        }
    }
}

/// A polygon of at least three vertex indices, fan-triangulated from the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: Vec<usize>,
    /// Index into the owning definition's texture-coordinate sets
    pub tex_coord_set: usize,
}

/// A named stone shape compiled from one `OBJ` block.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDefinition {
    /// External lookup key; for stones this is the type code
    pub id: i32,
    /// Unique within a catalog
    pub name: String,
    /// Palette label
    pub caption: String,
    pub scale: DVec3,
    pub translation: DVec3,
    /// Edge length of the (square) texture in pixels
    pub texture_size: u32,
    pub texture_filename: String,
    pub vertices: Vec<DVec3>,
    pub tex_coord_sets: Vec<TexCoordSet>,
    pub faces: Vec<Face>,
}

impl MeshDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            caption: String::new(),
            scale: DVec3::ONE,
            translation: DVec3::ZERO,
            texture_size: 512,
            texture_filename: String::new(),
            vertices: Vec::new(),
            tex_coord_sets: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Full value copy under a new name (CLONEOF).
    pub fn clone_as(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Vertex `i` after scale and translation.
    pub fn transformed_vertex(&self, i: usize) -> Option<DVec3> {
        self.vertices
            .get(i)
            .map(|v| *v * self.scale + self.translation)
    }

    /// Bounding box of the scaled, translated vertices as seen from a frame
    /// rotated by `rotation_degrees` about +Y.
    ///
    /// Each vertex is rotated by the negated angle, which undoes a positive
    /// world-space rotation of the rendered mesh. An empty mesh yields the
    /// zero box.
    pub fn rotated_aabb(&self, rotation_degrees: f64) -> Aabb {
        let ry = -(rotation_degrees / 360.0 * 2.0 * PI);
        let (sin, cos) = ry.sin_cos();
        let points = self.vertices.iter().map(|v| {
            let p = *v * self.scale + self.translation;
            DVec3::new(p.x * cos - p.z * sin, p.y, p.x * sin + p.z * cos)
        });
        Aabb::from_points(points).unwrap_or_default()
    }
}

// ============================================================================
// FOOTPRINT
// ============================================================================

/// Decode a stone type code `sizeX*100 + sizeY*10 + sizeZ` into its
/// integer footprint. `sizeY` counts grid levels, not world units.
pub fn footprint(type_code: i32) -> IVec3 {
    IVec3::new(type_code / 100, (type_code / 10) % 10, type_code % 10)
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered collection of mesh definitions with an id index.
#[derive(Debug, Clone, Default)]
pub struct MeshCatalog {
    definitions: Vec<MeshDefinition>,
    by_id: HashMap<i32, usize>,
}

impl MeshCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition. A later definition with a duplicate id shadows
    /// the earlier one for id lookups.
    pub fn push(&mut self, definition: MeshDefinition) {
        self.by_id.insert(definition.id, self.definitions.len());
        self.definitions.push(definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&MeshDefinition> {
        self.definitions.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&MeshDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    pub fn index_of_id(&self, id: i32) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn by_id(&self, id: i32) -> Option<&MeshDefinition> {
        self.index_of_id(id).and_then(|i| self.definitions.get(i))
    }

    pub fn caption(&self, index: usize) -> Option<&str> {
        self.definitions.get(index).map(|d| d.caption.as_str())
    }

    pub fn id_at(&self, index: usize) -> Option<i32> {
        self.definitions.get(index).map(|d| d.id)
    }

    /// Mesh-local bounding box of mesh `mesh_id` rotated about Y.
    ///
    /// Only Y rotation is supported; boxes for X/Z rotations are not
    /// computed anywhere.
    pub fn compute_aabb(&self, mesh_id: i32, rotation_degrees: f64) -> Option<Aabb> {
        self.by_id(mesh_id).map(|d| d.rotated_aabb(rotation_degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn slab() -> MeshDefinition {
        let mut def = MeshDefinition::new("slab");
        def.id = 421;
        def.scale = DVec3::new(4.0, 0.8, 1.0);
        def.vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ];
        def
    }

    #[test]
    fn test_footprint_decodes_digits() {
        assert_eq!(footprint(432), IVec3::new(4, 3, 2));
        assert_eq!(footprint(131), IVec3::new(1, 3, 1));
        assert_eq!(footprint(1032), IVec3::new(10, 3, 2));
    }

    #[test]
    fn test_unrotated_aabb_applies_scale_and_translation() {
        let mut def = slab();
        def.translation = DVec3::new(-0.5, 0.0, 0.25);
        let aabb = def.rotated_aabb(0.0);
        assert_eq!(aabb.min, DVec3::new(-0.5, 0.0, 0.25));
        assert_eq!(aabb.max, DVec3::new(3.5, 0.8, 1.25));
    }

    #[test]
    fn test_quarter_turn_swaps_extents() {
        let aabb = slab().rotated_aabb(90.0);
        // x' = z, z' = -x for a quarter turn
        assert_abs_diff_eq!(aabb.min.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.min.z, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max.z, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_aabb_is_bit_identical_across_calls() {
        let mut catalog = MeshCatalog::new();
        catalog.push(slab());
        for degrees in [0.0, 90.0, 180.0, 270.0] {
            let a = catalog.compute_aabb(421, degrees).unwrap();
            let b = catalog.compute_aabb(421, degrees).unwrap();
            assert_eq!(a.min.to_array().map(f64::to_bits), b.min.to_array().map(f64::to_bits));
            assert_eq!(a.max.to_array().map(f64::to_bits), b.max.to_array().map(f64::to_bits));
        }
        assert!(catalog.compute_aabb(999, 0.0).is_none());
    }

    #[test]
    fn test_duplicate_id_last_definition_wins() {
        let mut catalog = MeshCatalog::new();
        catalog.push(slab());
        let mut other = slab().clone_as("slab2");
        other.caption = "second".to_string();
        catalog.push(other);
        assert_eq!(catalog.index_of_id(421), Some(1));
        assert_eq!(catalog.by_id(421).map(|d| d.caption.as_str()), Some("second"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_empty_mesh_has_zero_box() {
        let def = MeshDefinition::new("empty");
        assert_eq!(def.rotated_aabb(90.0), Aabb::default());
    }
}
