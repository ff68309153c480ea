//! Stone draw pass
//!
//! Walks the model (or a preview list) and hands each stone's cached batch
//! to a [`StoneRenderer`] together with its world transform and tint. The
//! renderer owns the graphics API; this module only decides what to draw.

use glam::{DVec3, Mat4};

use super::cache::GeometryCache;
use crate::mesh::{MeshCatalog, TriangleBatch};
use crate::world::{Model, SELECTION_HIGHLIGHT, StonePlacement, grid_to_world};

/// Placement of one mesh instance in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoneTransform {
    pub translation: DVec3,
    /// Rotation about +Y
    pub rotation_y_degrees: f64,
}

impl StoneTransform {
    /// Model matrix: rotate about Y, then translate.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation.as_vec3())
            * Mat4::from_rotation_y((self.rotation_y_degrees as f32).to_radians())
    }

}

/// Draw-call sink implemented by the graphics backend.
pub trait StoneRenderer {
    /// Draw `batch` (the triangles of mesh `mesh_id`) once.
    fn draw_batch(&mut self, mesh_id: i32, batch: &TriangleBatch, transform: StoneTransform, color: [f32; 3]);
}

fn transform_for(origin: DVec3, placement: &StonePlacement) -> StoneTransform {
    StoneTransform {
        translation: origin + grid_to_world(placement.grid_pos),
        rotation_y_degrees: f64::from(placement.rotation) * 90.0,
    }
}

/// Draw every stone of `model`. Selected stones use the highlight tint.
/// Stones whose mesh is missing or broken are skipped. Returns the number of
/// draw calls issued.
pub fn render_model(
    model: &Model,
    catalog: &MeshCatalog,
    cache: &mut GeometryCache,
    renderer: &mut impl StoneRenderer,
) -> usize {
    let mut drawn = 0;
    for stone in model.stones() {
        let Some(batch) = cache.batch(catalog, stone.type_code) else {
            continue;
        };
        let color = if stone.selected {
            SELECTION_HIGHLIGHT
        } else {
            stone.color.rgb()
        };
        let transform = transform_for(model.origin_offset(), &stone.placement());
        renderer.draw_batch(stone.type_code, batch, transform, color);
        drawn += 1;
    }
    drawn
}

/// Draw not-yet-committed stones in a single tint. `origin` is the origin
/// offset of the model they will be committed to.
pub fn render_preview(
    stones: &[StonePlacement],
    origin: DVec3,
    catalog: &MeshCatalog,
    cache: &mut GeometryCache,
    renderer: &mut impl StoneRenderer,
    color: [f32; 3],
) -> usize {
    let mut drawn = 0;
    for placement in stones {
        let Some(batch) = cache.batch(catalog, placement.type_code) else {
            continue;
        };
        renderer.draw_batch(placement.type_code, batch, transform_for(origin, placement), color);
        drawn += 1;
    }
    drawn
}
