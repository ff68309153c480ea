//! Rays and horizontal planes
//!
//! The placement query only ever intersects planes of constant Y: the grid
//! plane at the current build level and the top face of every stone.

use glam::DVec3;

/// A pick/placement ray. The direction does not have to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

/// Intersection of a ray with a horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    /// World-space intersection point
    pub point: DVec3,
    /// Euclidean distance from the ray origin to `point`
    pub distance: f64,
}

impl Ray {
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self { origin, dir }
    }

    /// Intersect with the plane `y = height`.
    ///
    /// The ray is treated as a line: a plane behind the origin still yields a
    /// hit, with a positive distance. Returns `None` only when the ray runs
    /// parallel to the plane.
    pub fn intersect_horizontal(&self, height: f64) -> Option<PlaneHit> {
        if self.dir.y == 0.0 {
            return None;
        }
        let lambda = (height - self.origin.y) / self.dir.y;
        let point = self.origin + self.dir * lambda;
        Some(PlaneHit {
            point,
            distance: self.origin.distance(point),
        })
    }
}
