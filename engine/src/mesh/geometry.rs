//! Triangle batch builder
//!
//! Expands a [`MeshDefinition`] into a flat, non-indexed triangle list ready
//! for upload. Faces are fan-triangulated from their first vertex and every
//! triangle gets a flat normal; there is no smoothing across faces.

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, DVec3, IVec2};

use super::catalog::{MeshDefinition, TexCoordSet};
use super::error::GeometryError;

/// GPU vertex for stone meshes.
///
/// - position: vec3<f32> at @location(0)
/// - normal: vec3<f32> at @location(1)
/// - uv: vec2<f32> at @location(2)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

impl MeshVertex {
    pub fn new(position: DVec3, normal: DVec3, uv: DVec2) -> Self {
        Self {
            position: position.as_vec3().to_array(),
            normal: normal.as_vec3().to_array(),
            uv: uv.as_vec2().to_array(),
        }
    }
}

/// Triangle list for one mesh definition, three vertices per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBatch {
    pub vertices: Vec<MeshVertex>,
}

impl TriangleBatch {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Raw vertex bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Pixel coordinate to texture space: sample the pixel center, flip v.
fn normalize_uv(p: IVec2, texture_size: u32) -> DVec2 {
    let size = f64::from(texture_size);
    DVec2::new(
        (f64::from(p.x) + 0.5) / size,
        1.0 - (f64::from(p.y) + 0.5) / size,
    )
}

/// Texture coordinates of fan triangle `(0, i, i + 1)`.
fn triangle_tex_coords(
    set: &TexCoordSet,
    face: usize,
    i: usize,
) -> Result<[IVec2; 3], GeometryError> {
    match set {
        TexCoordSet::Rect([p0, p1]) => match i {
            1 => Ok([*p0, IVec2::new(p0.x, p1.y), *p1]),
            2 => Ok([*p0, *p1, IVec2::new(p1.x, p0.y)]),
            _ => Err(GeometryError::RectTooManyTriangles { face }),
        },
        TexCoordSet::Polygon(points) => match (points.first(), points.get(i), points.get(i + 1)) {
            (Some(a), Some(b), Some(c)) => Ok([*a, *b, *c]),
            _ => Err(GeometryError::TexCoordListTooShort {
                face,
                needed: i + 2,
                got: points.len(),
            }),
        },
    }
}

/// Build the triangle batch for `def`.
///
/// Positions are scaled and translated. Normals come from the unscaled
/// vertices.
pub fn build(def: &MeshDefinition) -> Result<TriangleBatch, GeometryError> {
    let mut vertices = Vec::new();

    for (face_index, face) in def.faces.iter().enumerate() {
        let set = def
            .tex_coord_sets
            .get(face.tex_coord_set)
            .ok_or(GeometryError::TexCoordSetOutOfRange {
                face: face_index,
                index: face.tex_coord_set,
            })?;

        let vertex = |index: usize| {
            def.vertices
                .get(index)
                .copied()
                .ok_or(GeometryError::VertexIndexOutOfRange {
                    face: face_index,
                    index,
                })
        };

        for i in 1..face.indices.len().saturating_sub(1) {
            let v0 = vertex(face.indices[0])?;
            let v1 = vertex(face.indices[i])?;
            let v2 = vertex(face.indices[i + 1])?;
            let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            let tex = triangle_tex_coords(set, face_index, i)?;

            for (v, t) in [v0, v1, v2].into_iter().zip(tex) {
                vertices.push(MeshVertex::new(
                    v * def.scale + def.translation,
                    normal,
                    normalize_uv(t, def.texture_size),
                ));
            }
        }
    }

    Ok(TriangleBatch { vertices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::catalog::Face;
    use approx::assert_abs_diff_eq;

    fn quad(tex: TexCoordSet) -> MeshDefinition {
        let mut def = MeshDefinition::new("quad");
        def.texture_size = 16;
        def.vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        def.tex_coord_sets = vec![tex];
        def.faces = vec![Face {
            indices: vec![0, 1, 2, 3],
            tex_coord_set: 0,
        }];
        def
    }

    fn rect() -> TexCoordSet {
        TexCoordSet::Rect([IVec2::new(0, 0), IVec2::new(15, 15)])
    }

    #[test]
    fn test_quad_fans_into_two_triangles() {
        let batch = build(&quad(rect())).unwrap();
        assert_eq!(batch.triangle_count(), 2);
        assert_eq!(batch.as_bytes().len(), 6 * 32);
        for v in &batch.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_rect_corners_map_per_triangle() {
        let batch = build(&quad(rect())).unwrap();
        let lo = 0.5 / 16.0;
        let hi = 15.5 / 16.0;
        let uvs: Vec<[f32; 2]> = batch.vertices.iter().map(|v| v.uv).collect();
        let expected = [
            [lo, 1.0 - lo],
            [lo, 1.0 - hi],
            [hi, 1.0 - hi],
            [lo, 1.0 - lo],
            [hi, 1.0 - hi],
            [hi, 1.0 - lo],
        ];
        for (got, want) in uvs.iter().zip(expected) {
            assert_abs_diff_eq!(got[0] as f64, want[0], epsilon = 1e-6);
            assert_abs_diff_eq!(got[1] as f64, want[1], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_scale_and_translation_apply_to_positions() {
        let mut def = quad(rect());
        def.scale = DVec3::new(4.0, 2.0, 1.0);
        def.translation = DVec3::new(0.0, 0.0, -1.0);
        let batch = build(&def).unwrap();
        assert_eq!(batch.vertices[2].position, [4.0, 2.0, -1.0]);
    }

    #[test]
    fn test_rect_on_pentagon_is_an_error() {
        let mut def = quad(rect());
        def.vertices.push(DVec3::new(-0.5, 0.5, 0.0));
        def.faces[0].indices.push(4);
        assert_eq!(build(&def), Err(GeometryError::RectTooManyTriangles { face: 0 }));
    }

    #[test]
    fn test_polygon_list_samples_like_the_fan() {
        let points = vec![
            IVec2::new(0, 0),
            IVec2::new(7, 0),
            IVec2::new(7, 7),
            IVec2::new(0, 7),
        ];
        let batch = build(&quad(TexCoordSet::Polygon(points))).unwrap();
        let second = batch.vertices[5].uv;
        assert_abs_diff_eq!(second[0] as f64, 0.5 / 16.0, epsilon = 1e-6);
        assert_abs_diff_eq!(second[1] as f64, 1.0 - 7.5 / 16.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bad_indices_are_reported() {
        let mut def = quad(rect());
        def.faces[0].indices[2] = 9;
        assert_eq!(
            build(&def),
            Err(GeometryError::VertexIndexOutOfRange { face: 0, index: 9 })
        );

        let mut def = quad(rect());
        def.faces[0].tex_coord_set = 3;
        assert_eq!(
            build(&def),
            Err(GeometryError::TexCoordSetOutOfRange { face: 0, index: 3 })
        );
    }
}
