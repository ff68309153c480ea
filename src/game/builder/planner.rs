//! Placement Planner
//!
//! Turns the brush settings and a drag gesture on the grid into the list of
//! stones to preview. Nothing here touches the model: the session commits
//! the plan stone by stone on release, and the model's collision check
//! drops whatever overlaps.
//!
//! ## Regimes
//! - **Stack** (not dragging): a column of `stack_height` stones at the
//!   anchor.
//! - **Filled slab**: one stone per footprint step over the whole anchor/drag
//!   rectangle, repeated per layer.
//! - **Perimeter**: the rectangle's border in running bond. Even layers start
//!   at the anchor corner; odd layers start one cell diagonally inside it so
//!   vertical joints never line up between layers. With `edge_wall` only the
//!   two sides facing the drag quadrant are laid; without it all four.
//!
//! A drag along a single axis ("straight wall") is laid as one run in the
//! drag direction, with the odd layers shifted by two cells.

use glam::IVec3;

use crate::mesh::footprint;
use crate::world::{StoneColor, StonePlacement};

/// Brush state that shapes a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub type_code: i32,
    pub color: StoneColor,
    /// Quarter turns about +Y
    pub rotation: u8,
    /// Layers per placement
    pub stack_height: u32,
    /// Fill the drag rectangle instead of walling it
    pub rect_filled: bool,
    /// Lay only the two sides facing the drag direction
    pub edge_wall: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            type_code: 432,
            color: StoneColor::White,
            rotation: 0,
            stack_height: 1,
            rect_filled: false,
            edge_wall: false,
        }
    }
}

/// Which sides of the drag rectangle receive stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sides {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl Sides {
    /// Enclosed walls lay the two sides facing the drag quadrant; rooms lay
    /// all four.
    fn for_drag(edge_wall: bool, right: bool, down: bool) -> Self {
        if !edge_wall {
            return Sides {
                top: true,
                right: true,
                bottom: true,
                left: true,
            };
        }
        // Drag into the right/down or left/up quadrant walls top and right,
        // the other two quadrants wall left and bottom.
        let top_right = right == down;
        Sides {
            top: top_right,
            right: top_right,
            bottom: !top_right,
            left: !top_right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

fn step_toward(value: i32, dest: i32, step: i32) -> i32 {
    if value > dest { value - step } else { value + step }
}

// ============================================================================
// PLANNER
// ============================================================================

struct Planner {
    brush: Brush,
    /// Footprint, X/Z swapped for rotated slabs
    size: IVec3,
    stones: Vec<StonePlacement>,
}

impl Planner {
    fn new(brush: Brush) -> Self {
        let mut size = footprint(brush.type_code);
        if brush.rect_filled && brush.rotation % 2 != 0 {
            size = IVec3::new(size.z, size.y, size.x);
        }
        Self {
            brush,
            size,
            stones: Vec::new(),
        }
    }

    fn push(&mut self, pos: IVec3, rotated: bool) {
        let rotation = i32::from(self.brush.rotation) + i32::from(rotated);
        self.stones
            .push(StonePlacement::new(self.brush.type_code, self.brush.color, rotation, pos));
    }

    /// Base heights of the layers above `anchor`.
    fn layers(&self, anchor: IVec3) -> impl Iterator<Item = (u32, i32)> + use<> {
        let step = self.size.y;
        (0..self.brush.stack_height).map(move |row| (row, anchor.y + row as i32 * step))
    }

    /// Lay whole stones from `pos` toward `dest` along `axis`, leaving `pos`
    /// on the last stone. Then move `pos` diagonally onto the start cell of
    /// the next side: by `length - 1` when the leftover gap is at least a
    /// stone width, else by `width - 1`. `next_right` picks the X direction
    /// of that move after a Z run, `next_down` the Z direction after an X
    /// run.
    #[allow(clippy::too_many_arguments)]
    fn line(
        &mut self,
        pos: &mut IVec3,
        dest: i32,
        axis: Axis,
        insert: bool,
        rotated: bool,
        next_right: bool,
        next_down: bool,
    ) {
        let length = self.size.x;
        let width = self.size.z;
        let mut value = match axis {
            Axis::X => pos.x,
            Axis::Z => pos.z,
        };
        let growing = value <= dest;

        let mut gap = (value - dest).abs();
        while gap >= length {
            value = step_toward(value, dest, length);
            match axis {
                Axis::X => pos.x = value,
                Axis::Z => pos.z = value,
            }
            if insert {
                self.push(*pos, rotated);
            }
            gap = (value - dest).abs();
        }

        let offset = if gap >= width { length - 1 } else { width - 1 };
        let along = if growing { offset } else { -offset };
        match axis {
            Axis::Z => {
                pos.z += along;
                pos.x += if next_right { -offset } else { offset };
            }
            Axis::X => {
                pos.x += along;
                pos.z += if next_down { -offset } else { offset };
            }
        }
    }

    fn stack(&mut self, anchor: IVec3) {
        for (_, y) in self.layers(anchor) {
            self.push(IVec3::new(anchor.x, y, anchor.z), false);
        }
    }

    fn slab_layer(&mut self, anchor: IVec3, drag: IVec3) {
        let mut x = anchor.x;
        loop {
            let mut z = anchor.z;
            loop {
                self.push(IVec3::new(x, anchor.y, z), false);
                if (z - drag.z).abs() < self.size.z {
                    break;
                }
                z = step_toward(z, drag.z, self.size.z);
            }
            if (x - drag.x).abs() < self.size.x {
                break;
            }
            x = step_toward(x, drag.x, self.size.x);
        }
    }

    /// Border layer for an unrotated brush: long sides run along X.
    fn perimeter_layer_x(&mut self, row: u32, anchor: IVec3, drag: IVec3) {
        let edge = self.brush.edge_wall;
        let right = drag.x >= anchor.x;
        let down = drag.z >= anchor.z;
        let sides = Sides::for_drag(edge, right, down);
        let straight = drag.z == anchor.z;
        let mut pos = anchor;

        if row % 2 == 0 {
            if straight || sides.top || !edge {
                self.push(pos, false);
            }
            if straight {
                self.line(&mut pos, drag.x, Axis::X, true, false, false, down);
            } else {
                self.line(&mut pos, drag.x, Axis::X, sides.top, false, false, down);
                self.line(&mut pos, drag.z, Axis::Z, sides.right, true, !right, false);
                self.line(&mut pos, anchor.x, Axis::X, sides.bottom, false, false, !down);
                self.line(&mut pos, anchor.z, Axis::Z, sides.left, true, right, false);
            }
        } else if straight {
            let mut pos = anchor + IVec3::new(if right { 2 } else { -2 }, 0, 0);
            self.push(pos, false);
            self.line(&mut pos, drag.x, Axis::X, true, false, false, down);
        } else {
            let mut pos = anchor + IVec3::new(if right { -1 } else { 1 }, 0, if down { 1 } else { -1 });
            if !edge {
                self.push(pos, true);
            }
            self.line(&mut pos, drag.z, Axis::Z, sides.left, true, right, false);
            self.line(&mut pos, drag.x, Axis::X, sides.bottom, false, false, !down);
            self.line(&mut pos, anchor.z, Axis::Z, sides.right, true, !right, false);
            self.line(&mut pos, anchor.x, Axis::X, sides.top, false, false, down);
        }
    }

    /// Border layer for a quarter-turned brush: long sides run along Z.
    fn perimeter_layer_z(&mut self, row: u32, anchor: IVec3, drag: IVec3) {
        let edge = self.brush.edge_wall;
        let right = drag.x >= anchor.x;
        let down = drag.z >= anchor.z;
        let sides = Sides::for_drag(edge, right, down);
        let straight = drag.x == anchor.x;
        let mut pos = anchor;

        if row % 2 == 0 {
            if straight || sides.left || !edge {
                self.push(pos, false);
            }
            if straight {
                self.line(&mut pos, drag.z, Axis::Z, true, false, right, false);
            } else {
                self.line(&mut pos, drag.z, Axis::Z, sides.left, false, right, false);
                self.line(&mut pos, drag.x, Axis::X, sides.bottom, true, false, !down);
                self.line(&mut pos, anchor.z, Axis::Z, sides.right, false, !right, false);
                self.line(&mut pos, anchor.x, Axis::X, sides.top, true, false, down);
            }
        } else if straight {
            let mut pos = anchor + IVec3::new(0, 0, if down { 2 } else { -2 });
            self.push(pos, false);
            self.line(&mut pos, drag.z, Axis::Z, true, false, right, false);
        } else {
            let mut pos = anchor + IVec3::new(if right { 1 } else { -1 }, 0, if down { -1 } else { 1 });
            if !edge {
                self.push(pos, true);
            }
            self.line(&mut pos, drag.x, Axis::X, sides.top, true, false, down);
            self.line(&mut pos, drag.z, Axis::Z, sides.right, false, !right, false);
            self.line(&mut pos, anchor.x, Axis::X, sides.bottom, true, false, !down);
            self.line(&mut pos, anchor.z, Axis::Z, sides.left, false, right, false);
        }
    }

    fn drag(&mut self, anchor: IVec3, drag: IVec3) {
        for (row, y) in self.layers(anchor) {
            let layer_anchor = IVec3::new(anchor.x, y, anchor.z);
            if self.brush.rect_filled {
                self.slab_layer(layer_anchor, drag);
            } else if self.brush.rotation % 2 == 0 {
                self.perimeter_layer_x(row, layer_anchor, drag);
            } else {
                self.perimeter_layer_z(row, layer_anchor, drag);
            }
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Preview while hovering: a column of `stack_height` stones at `anchor`.
/// Empty for a type code without height.
pub fn plan_stack(brush: &Brush, anchor: IVec3) -> Vec<StonePlacement> {
    let mut planner = Planner::new(*brush);
    if planner.size.y <= 0 {
        return Vec::new();
    }
    planner.stack(anchor);
    planner.stones
}

/// Preview while dragging from `anchor` to `drag`. Empty when any
/// footprint component of the brush is not positive.
pub fn plan_drag(brush: &Brush, anchor: IVec3, drag: IVec3) -> Vec<StonePlacement> {
    let mut planner = Planner::new(*brush);
    if planner.size.cmple(IVec3::ZERO).any() {
        return Vec::new();
    }
    planner.drag(anchor, drag);
    planner.stones
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brush(type_code: i32) -> Brush {
        Brush {
            type_code,
            ..Brush::default()
        }
    }

    fn xs(stones: &[StonePlacement]) -> Vec<i32> {
        stones.iter().map(|s| s.grid_pos.x).collect()
    }

    #[test]
    fn test_stack_steps_by_stone_height() {
        let b = Brush {
            stack_height: 3,
            ..brush(432)
        };
        let stones = plan_stack(&b, IVec3::new(1, 2, 3));
        let ys: Vec<i32> = stones.iter().map(|s| s.grid_pos.y).collect();
        assert_eq!(ys, vec![2, 5, 8]);
        assert!(stones.iter().all(|s| s.grid_pos.x == 1 && s.grid_pos.z == 3));
    }

    #[test]
    fn test_zero_height_type_plans_nothing() {
        assert!(plan_stack(&brush(402), IVec3::ZERO).is_empty());
        assert!(plan_drag(&brush(402), IVec3::ZERO, IVec3::new(5, 0, 5)).is_empty());
    }

    #[test]
    fn test_filled_slab_covers_rectangle() {
        let b = Brush {
            rect_filled: true,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(3, 0, 1));
        let cells: Vec<(i32, i32)> = stones.iter().map(|s| (s.grid_pos.x, s.grid_pos.z)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_filled_slab_swaps_footprint_when_rotated() {
        let b = Brush {
            rect_filled: true,
            rotation: 1,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(1, 0, 3));
        let cells: Vec<(i32, i32)> = stones.iter().map(|s| (s.grid_pos.x, s.grid_pos.z)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 2), (1, 0), (1, 2)]);
        assert!(stones.iter().all(|s| s.rotation == 1));
    }

    #[test]
    fn test_filled_slab_toward_negative_drag() {
        let b = Brush {
            rect_filled: true,
            ..brush(111)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(-2, 0, -1));
        assert_eq!(stones.len(), 6);
        assert!(stones.iter().all(|s| s.grid_pos.x <= 0 && s.grid_pos.z <= 0));
    }

    #[test]
    fn test_straight_wall_lays_whole_stones() {
        let b = Brush {
            edge_wall: true,
            ..brush(331)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(10, 0, 0));
        assert_eq!(xs(&stones), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_straight_wall_reversed_is_mirrored() {
        let b = Brush {
            edge_wall: true,
            stack_height: 2,
            ..brush(331)
        };
        let forward = plan_drag(&b, IVec3::ZERO, IVec3::new(10, 0, 0));
        let backward = plan_drag(&b, IVec3::new(10, 0, 0), IVec3::ZERO);
        assert_eq!(forward.len(), backward.len());
        let mut mirrored: Vec<(i32, i32)> = backward.iter().map(|s| (10 - s.grid_pos.x, s.grid_pos.y)).collect();
        let mut expected: Vec<(i32, i32)> = forward.iter().map(|s| (s.grid_pos.x, s.grid_pos.y)).collect();
        mirrored.sort_unstable();
        expected.sort_unstable();
        assert_eq!(mirrored, expected);
    }

    #[test]
    fn test_running_bond_shifts_odd_layers() {
        let b = Brush {
            stack_height: 2,
            ..brush(331)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(10, 0, 0));
        let upper: Vec<i32> = stones.iter().filter(|s| s.grid_pos.y == 3).map(|s| s.grid_pos.x).collect();
        assert_eq!(upper, vec![2, 5, 8]);
    }

    #[test]
    fn test_straight_wall_along_z_for_rotated_brush() {
        let b = Brush {
            rotation: 1,
            ..brush(331)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(0, 0, 7));
        let zs: Vec<i32> = stones.iter().map(|s| s.grid_pos.z).collect();
        assert_eq!(zs, vec![0, 3, 6]);
        assert!(stones.iter().all(|s| s.rotation == 1));
    }

    #[test]
    fn test_room_lays_four_sides_with_rotated_ends() {
        let stones = plan_drag(&brush(211), IVec3::ZERO, IVec3::new(6, 0, 4));
        let cells: Vec<(i32, i32, u8)> = stones
            .iter()
            .map(|s| (s.grid_pos.x, s.grid_pos.z, s.rotation))
            .collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, 0),
                // top, left to right
                (2, 0, 0),
                (4, 0, 0),
                (6, 0, 0),
                // right side, rotated
                (6, 2, 1),
                (6, 4, 1),
                // bottom, right to left
                (4, 4, 0),
                (2, 4, 0),
                (0, 4, 0),
                // left side back up, rotated
                (0, 2, 1),
                (0, 0, 1),
            ]
        );
    }

    fn course(stones: &[StonePlacement], y: i32) -> Vec<(i32, i32, u8)> {
        stones
            .iter()
            .filter(|s| s.grid_pos.y == y)
            .map(|s| (s.grid_pos.x, s.grid_pos.z, s.rotation))
            .collect()
    }

    #[test]
    fn test_room_second_course_starts_inside_corner() {
        let b = Brush {
            stack_height: 2,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(6, 0, 4));
        assert_eq!(course(&stones, 0).len(), 11);
        assert_eq!(
            course(&stones, 1),
            vec![
                // shifted corner, then the left side down
                (-1, 1, 1),
                (-1, 3, 1),
                // bottom, left to right
                (0, 4, 0),
                (2, 4, 0),
                (4, 4, 0),
                (6, 4, 0),
                // right side back up
                (6, 2, 1),
                (6, 0, 1),
                // top, right to left
                (4, 0, 0),
                (2, 0, 0),
                (0, 0, 0),
            ]
        );
    }

    #[test]
    fn test_enclosed_wall_second_course() {
        let b = Brush {
            stack_height: 2,
            edge_wall: true,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(6, 0, 4));
        assert_eq!(
            course(&stones, 0),
            vec![(0, 0, 0), (2, 0, 0), (4, 0, 0), (6, 0, 0), (6, 2, 1), (6, 4, 1)]
        );
        assert_eq!(
            course(&stones, 1),
            vec![(6, 2, 1), (6, 0, 1), (4, 0, 0), (2, 0, 0), (0, 0, 0)]
        );
    }

    #[test]
    fn test_rotated_room_runs_long_sides_along_z() {
        let b = Brush {
            rotation: 1,
            stack_height: 2,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(4, 0, 6));
        assert_eq!(
            course(&stones, 0),
            vec![
                (0, 0, 1),
                (0, 2, 1),
                (0, 4, 1),
                (0, 6, 1),
                (2, 6, 2),
                (4, 6, 2),
                (4, 4, 1),
                (4, 2, 1),
                (4, 0, 1),
                (2, 0, 2),
                (0, 0, 2),
            ]
        );
        assert_eq!(
            course(&stones, 1),
            vec![
                (1, -1, 2),
                (3, -1, 2),
                (4, 0, 1),
                (4, 2, 1),
                (4, 4, 1),
                (4, 6, 1),
                (2, 6, 2),
                (0, 6, 2),
                (0, 4, 1),
                (0, 2, 1),
                (0, 0, 1),
            ]
        );
    }

    #[test]
    fn test_rotated_enclosed_wall_both_courses() {
        let b = Brush {
            rotation: 1,
            stack_height: 2,
            edge_wall: true,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(4, 0, 6));
        assert_eq!(
            course(&stones, 0),
            vec![(4, 4, 1), (4, 2, 1), (4, 0, 1), (2, 0, 2), (0, 0, 2)]
        );
        assert_eq!(
            course(&stones, 1),
            vec![(3, -1, 2), (4, 0, 1), (4, 2, 1), (4, 4, 1), (4, 6, 1)]
        );
    }

    #[test]
    fn test_enclosed_wall_lays_only_facing_sides() {
        let b = Brush {
            edge_wall: true,
            ..brush(211)
        };
        let stones = plan_drag(&b, IVec3::ZERO, IVec3::new(6, 0, 4));
        // Top and right only
        assert!(stones.iter().all(|s| s.grid_pos.z == 0 || s.grid_pos.x == 6));
        assert_eq!(stones.len(), 6);
    }

    #[test]
    fn test_corner_offset_after_partial_run() {
        let mut planner = Planner::new(brush(321));
        let mut pos = IVec3::ZERO;
        // 3-long stones over a gap of 7 leave 1; 1 >= width so shift by length - 1
        planner.line(&mut pos, 7, Axis::X, true, false, false, true);
        assert_eq!(xs(&planner.stones), vec![3, 6]);
        assert_eq!(pos, IVec3::new(8, 0, -2));
    }

    #[test]
    fn test_sides_for_each_drag_quadrant() {
        let tr = Sides::for_drag(true, true, true);
        assert!(tr.top && tr.right && !tr.bottom && !tr.left);
        let bl = Sides::for_drag(true, false, true);
        assert!(!bl.top && !bl.right && bl.bottom && bl.left);
        assert_eq!(Sides::for_drag(true, false, false), tr);
        assert_eq!(Sides::for_drag(true, true, false), bl);
    }
}
