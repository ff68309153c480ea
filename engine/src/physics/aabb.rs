//! Axis-aligned bounding boxes
//!
//! Stones are boxed in two frames: the mesh-local frame cached on each stone
//! (see [`crate::mesh::MeshCatalog::compute_aabb`]) and the world frame,
//! which is the local box shifted by the stone's grid position.
//!
//! # Ray-AABB Intersection
//!
//! [`Aabb::ray_intersection`] uses the candidate-plane slab method: classify
//! the ray origin against each axis' min/max, compute the parametric distance
//! to every candidate plane, take the largest one and validate that the hit
//! point lies inside the box on the other two axes.

use glam::DVec3;

/// Axis-aligned bounding box in double precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

/// Position of the ray origin relative to one axis of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    Below,
    Above,
    Middle,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Fold a point cloud into its bounding box. `None` for an empty cloud.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Self::new(first, first);
        for p in points {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Box shifted by `offset`.
    pub fn translated(&self, offset: DVec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Box pulled in by `margin` on every face.
    pub fn shrunk(&self, margin: f64) -> Self {
        Self::new(self.min + DVec3::splat(margin), self.max - DVec3::splat(margin))
    }

    /// Strict overlap test. Boxes that only touch on a face do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x >= other.max.x
            || self.min.y >= other.max.y
            || self.min.z >= other.max.z
            || self.max.x <= other.min.x
            || self.max.y <= other.min.y
            || self.max.z <= other.min.z)
    }

    /// Inclusive containment test on the horizontal (X, Z) plane.
    pub fn contains_xz(&self, point: DVec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Distance along `ray_dir` to the first intersection with this box.
    ///
    /// Returns `Some(0.0)` when the origin lies inside the box and `None`
    /// when the ray misses or the box is behind the origin. The distance is
    /// in units of `ray_dir`, which need not be normalized.
    pub fn ray_intersection(&self, ray_origin: DVec3, ray_dir: DVec3) -> Option<f64> {
        let origin = ray_origin.to_array();
        let dir = ray_dir.to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        let mut quadrant = [Quadrant::Middle; 3];
        let mut candidate_plane = [0.0; 3];
        let mut inside = true;

        for axis in 0..3 {
            if origin[axis] < min[axis] {
                quadrant[axis] = Quadrant::Below;
                candidate_plane[axis] = min[axis];
                inside = false;
            } else if origin[axis] > max[axis] {
                quadrant[axis] = Quadrant::Above;
                candidate_plane[axis] = max[axis];
                inside = false;
            }
        }

        if inside {
            return Some(0.0);
        }

        let mut max_t = [-1.0; 3];
        for axis in 0..3 {
            if quadrant[axis] != Quadrant::Middle && dir[axis] != 0.0 {
                max_t[axis] = (candidate_plane[axis] - origin[axis]) / dir[axis];
            }
        }

        // Largest candidate wins; ties fall back to the X plane.
        let which_plane = if max_t[1] > max_t[0] && max_t[1] > max_t[2] {
            1
        } else if max_t[2] > max_t[0] && max_t[2] > max_t[1] {
            2
        } else {
            0
        };

        let t = max_t[which_plane];
        if t < 0.0 {
            return None;
        }

        for axis in 0..3 {
            if axis == which_plane {
                continue;
            }
            let coord = origin[axis] + t * dir[axis];
            if coord < min[axis] || coord > max[axis] {
                return None;
            }
        }

        Some(t)
    }
}
