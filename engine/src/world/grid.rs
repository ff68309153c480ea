//! Grid Module
//!
//! Stones sit on an integer grid. X and Z cells are one world unit wide;
//! a Y level is [`LEVEL_HEIGHT`] units tall, so a stone `sizeY` levels high
//! is modelled with a mesh `0.4 * sizeY` units tall.

use glam::{DVec3, IVec3};

/// World-space height of one grid level
pub const LEVEL_HEIGHT: f64 = 0.4;

/// Every box is pulled in by this margin before collision tests so that
/// stones sharing a face do not collide.
pub const COLLISION_EPSILON: f64 = 0.01;

/// Added to the vertical component of a selection centroid so the move gizmo
/// sits inside the stone rather than on its base.
pub const PICK_HEIGHT_BIAS: f64 = 0.3;

/// World-space height of grid level `level`.
pub fn level_to_world(level: i32) -> f64 {
    f64::from(level) * LEVEL_HEIGHT
}

/// World-space origin of grid cell `pos`, without any model origin offset.
pub fn grid_to_world(pos: IVec3) -> DVec3 {
    DVec3::new(f64::from(pos.x), level_to_world(pos.y), f64::from(pos.z))
}

/// Grid cell containing a world-space point on the XZ plane. The Y
/// component is passed through as the given level.
pub fn snap_to_grid(point: DVec3, level: i32) -> IVec3 {
    IVec3::new(point.x.floor() as i32, level, point.z.floor() as i32)
}
