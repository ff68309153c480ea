//! Spatial Model
//!
//! Owns the placed stones and the named selection groups. Every stone enters
//! through [`Model::insert_stone`], which refuses any stone whose box would
//! overlap an existing one, so the stone set is overlap-free at all times.
//!
//! ## Coordinates
//! Stones live on an integer grid (see [`super::grid`]). A stone's mesh-local
//! bounding box is computed once at insertion from the catalog and cached;
//! its world box is that cached box shifted by the grid position (Y scaled by
//! [`LEVEL_HEIGHT`]) and by the model's origin offset.
//!
//! ## Selection groups
//! Groups store stone ids, never stones. Deleting a stone leaves its id in
//! the group; lookups simply skip ids that no longer resolve.

use glam::{DVec3, IVec3};
use tracing::debug;

use super::color::StoneColor;
use super::grid::{
    COLLISION_EPSILON, LEVEL_HEIGHT, PICK_HEIGHT_BIAS, grid_to_world, level_to_world, snap_to_grid,
};
use crate::mesh::{MeshCatalog, footprint};
use crate::physics::{Aabb, Ray};

// ============================================================================
// TYPES
// ============================================================================

/// A stone to be placed: everything but its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StonePlacement {
    /// `sizeX*100 + sizeY*10 + sizeZ`, also the mesh id in the catalog
    pub type_code: i32,
    pub color: StoneColor,
    /// Quarter turns about +Y, always in 0..4
    pub rotation: u8,
    pub grid_pos: IVec3,
}

impl StonePlacement {
    /// Any rotation is folded into 0..4.
    pub fn new(type_code: i32, color: StoneColor, rotation: i32, grid_pos: IVec3) -> Self {
        Self {
            type_code,
            color,
            rotation: normalize_rotation(rotation),
            grid_pos,
        }
    }
}

/// Fold an arbitrary quarter-turn count into 0..4.
pub fn normalize_rotation(rotation: i32) -> u8 {
    rotation.rem_euclid(4) as u8
}

/// A placed stone.
#[derive(Debug, Clone, PartialEq)]
pub struct Stone {
    pub id: i32,
    /// Shared by stones placed or fused together; drives linked selection
    pub insert_id: i32,
    pub color: StoneColor,
    pub type_code: i32,
    /// Quarter turns about +Y, in 0..4
    pub rotation: u8,
    pub grid_pos: IVec3,
    pub selected: bool,
    /// Mesh-local box for `(type_code, rotation)`, fixed at insertion
    pub local_aabb: Aabb,
}

impl Stone {
    pub fn footprint(&self) -> IVec3 {
        footprint(self.type_code)
    }

    pub fn rotation_degrees(&self) -> f64 {
        f64::from(self.rotation) * 90.0
    }

    pub fn placement(&self) -> StonePlacement {
        StonePlacement {
            type_code: self.type_code,
            color: self.color,
            rotation: self.rotation,
            grid_pos: self.grid_pos,
        }
    }
}

/// A named set of stone ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    pub id: i32,
    pub name: String,
    /// Stone ids; may name stones that have since been deleted
    pub members: Vec<i32>,
}

/// Result of [`Model::insert_stone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored under this stone id
    Inserted(i32),
    /// Overlaps an existing stone; nothing stored
    RejectedByCollision,
    /// The catalog has no mesh for the type code; nothing stored
    UnknownMesh,
    /// An explicit id already belongs to a stored stone; nothing stored
    DuplicateId(i32),
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Model {
    origin_offset: DVec3,
    stones: Vec<Stone>,
    next_stone_id: i32,
    groups: Vec<SelectionGroup>,
    next_group_id: i32,
    /// Level of the last placement query, reused in hold-height mode
    last_height: i32,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn origin_offset(&self) -> DVec3 {
        self.origin_offset
    }

    pub fn set_origin_offset(&mut self, offset: DVec3) {
        self.origin_offset = offset;
    }

    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn stone(&self, id: i32) -> Option<&Stone> {
        self.stones.iter().find(|s| s.id == id)
    }

    pub fn selected_stones(&self) -> impl Iterator<Item = &Stone> {
        self.stones.iter().filter(|s| s.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_stones().count()
    }

    pub fn groups(&self) -> &[SelectionGroup] {
        &self.groups
    }

    pub fn group(&self, id: i32) -> Option<&SelectionGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Members of group `id` that still exist, in group order.
    pub fn group_members(&self, id: i32) -> impl Iterator<Item = &Stone> {
        self.group(id)
            .into_iter()
            .flat_map(|g| g.members.iter())
            .filter_map(|member| self.stone(*member))
    }

    pub fn next_stone_id(&self) -> i32 {
        self.next_stone_id
    }

    pub fn next_group_id(&self) -> i32 {
        self.next_group_id
    }

    /// World-space box of a stone.
    pub fn world_aabb(&self, stone: &Stone) -> Aabb {
        stone
            .local_aabb
            .translated(grid_to_world(stone.grid_pos) + self.origin_offset)
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Collision-checked insertion.
    ///
    /// `id` of `None` takes the next automatic stone id. Both the candidate
    /// and every existing box are shrunk by [`COLLISION_EPSILON`] before the
    /// overlap test, so stones sharing a face are accepted.
    pub fn insert_stone(
        &mut self,
        catalog: &MeshCatalog,
        id: Option<i32>,
        insert_id: i32,
        placement: StonePlacement,
    ) -> InsertOutcome {
        let rotation = normalize_rotation(i32::from(placement.rotation));
        let Some(local_aabb) = catalog.compute_aabb(placement.type_code, f64::from(rotation) * 90.0) else {
            debug!(type_code = placement.type_code, "insert skipped: no mesh for type");
            return InsertOutcome::UnknownMesh;
        };

        let candidate = Stone {
            id: 0,
            insert_id,
            color: placement.color,
            type_code: placement.type_code,
            rotation,
            grid_pos: placement.grid_pos,
            selected: false,
            local_aabb,
        };

        let candidate_box = self.world_aabb(&candidate).shrunk(COLLISION_EPSILON);
        let blocked = self
            .stones
            .iter()
            .any(|s| self.world_aabb(s).shrunk(COLLISION_EPSILON).overlaps(&candidate_box));
        if blocked {
            debug!(pos = ?placement.grid_pos, type_code = placement.type_code, "insert rejected by collision");
            return InsertOutcome::RejectedByCollision;
        }

        let id = match id {
            Some(id) => {
                if self.stone(id).is_some() {
                    debug!(id, "insert rejected: stone id already in use");
                    return InsertOutcome::DuplicateId(id);
                }
                self.next_stone_id = self.next_stone_id.max(id.wrapping_add(1));
                id
            }
            None => {
                let id = self.next_stone_id;
                self.next_stone_id = self.next_stone_id.wrapping_add(1);
                id
            }
        };
        self.stones.push(Stone { id, ..candidate });
        InsertOutcome::Inserted(id)
    }

    // ------------------------------------------------------------------------
    // Ray queries
    // ------------------------------------------------------------------------

    /// Grid cell a new stone should go to for a cursor ray.
    ///
    /// The ray is tested against the grid plane at `grid_level` and the top
    /// face of every stone; the nearest hit whose XZ lies on that stone's
    /// footprint wins and the returned level sits on top of it. With
    /// `hold_height`, only the plane at the previously returned level is
    /// tested. `None` when the ray is parallel to the planes.
    pub fn placement_position(&mut self, ray: &Ray, grid_level: i32, hold_height: bool) -> Option<IVec3> {
        let origin = self.origin_offset;

        if hold_height {
            let hit = ray.intersect_horizontal(origin.y + level_to_world(self.last_height))?;
            return Some(snap_to_grid(hit.point - origin, self.last_height));
        }

        let grid_hit = ray.intersect_horizontal(origin.y + level_to_world(grid_level))?;
        let mut best_distance = grid_hit.distance;
        let mut cell = snap_to_grid(grid_hit.point - origin, grid_level);

        for stone in &self.stones {
            let world = self.world_aabb(stone);
            let Some(hit) = ray.intersect_horizontal(world.max.y) else {
                continue;
            };
            if hit.distance < best_distance && world.contains_xz(hit.point) {
                best_distance = hit.distance;
                let levels = ((stone.local_aabb.max.y + COLLISION_EPSILON) / LEVEL_HEIGHT) as i32;
                cell = snap_to_grid(hit.point - origin, stone.grid_pos.y + levels);
            }
        }

        self.last_height = cell.y;
        Some(cell)
    }

    /// Select the stone under a ray.
    ///
    /// Without `additive` the previous selection is cleared first. With
    /// `select_linked`, every stone sharing the hit stone's insert id is
    /// selected too. Returns the mean grid position of the whole selection
    /// (Y in world units plus [`PICK_HEIGHT_BIAS`]) or `None` when nothing
    /// ends up selected.
    pub fn pick(&mut self, additive: bool, select_linked: bool, ray: &Ray) -> Option<DVec3> {
        if !additive {
            self.deselect_all();
        }

        let mut nearest: Option<(usize, f64)> = None;
        for (i, stone) in self.stones.iter().enumerate() {
            let Some(distance) = self.world_aabb(stone).ray_intersection(ray.origin, ray.dir) else {
                continue;
            };
            if distance > 0.0 && nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((i, distance));
            }
        }

        if let Some((index, _)) = nearest {
            self.stones[index].selected = true;
            if select_linked {
                let insert_id = self.stones[index].insert_id;
                for stone in self.stones.iter_mut().filter(|s| s.insert_id == insert_id) {
                    stone.selected = true;
                }
            }
        }

        self.selection_centroid()
    }

    /// Mean grid position of the selection, Y scaled to world units and
    /// lifted by [`PICK_HEIGHT_BIAS`].
    pub fn selection_centroid(&self) -> Option<DVec3> {
        let (sum, count) = self
            .selected_stones()
            .fold((DVec3::ZERO, 0u32), |(sum, count), s| (sum + s.grid_pos.as_dvec3(), count + 1));
        if count == 0 {
            return None;
        }
        let mean = sum / f64::from(count);
        Some(DVec3::new(mean.x, mean.y * LEVEL_HEIGHT + PICK_HEIGHT_BIAS, mean.z))
    }

    // ------------------------------------------------------------------------
    // Selection edits
    // ------------------------------------------------------------------------

    pub fn deselect_all(&mut self) {
        for stone in &mut self.stones {
            stone.selected = false;
        }
    }

    /// Returns the number of stones removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.stones.len();
        self.stones.retain(|s| !s.selected);
        before - self.stones.len()
    }

    /// Shift the selection by `delta` cells.
    ///
    /// Stones are taken out and reinserted through the collision check, so a
    /// stone whose destination is blocked is lost. Moved stones keep their
    /// ids and come back unselected. Returns the number reinserted.
    pub fn move_selected(&mut self, catalog: &MeshCatalog, delta: IVec3) -> usize {
        let (moving, staying): (Vec<Stone>, Vec<Stone>) =
            std::mem::take(&mut self.stones).into_iter().partition(|s| s.selected);
        self.stones = staying;

        let mut moved = 0;
        for stone in moving {
            let placement = StonePlacement {
                grid_pos: stone.grid_pos + delta,
                ..stone.placement()
            };
            if self
                .insert_stone(catalog, Some(stone.id), stone.insert_id, placement)
                .is_inserted()
            {
                moved += 1;
            }
        }
        moved
    }

    /// Insert copies of the selection shifted by `delta`, tagged `insert_id`.
    /// Originals are untouched. Returns the number of copies inserted.
    pub fn duplicate_selected(&mut self, catalog: &MeshCatalog, delta: IVec3, insert_id: i32) -> usize {
        let copies: Vec<StonePlacement> = self
            .selected_stones()
            .map(|s| StonePlacement {
                grid_pos: s.grid_pos + delta,
                ..s.placement()
            })
            .collect();

        copies
            .into_iter()
            .filter(|p| self.insert_stone(catalog, None, insert_id, *p).is_inserted())
            .count()
    }

    /// Give every selected stone the insert id of the first selected stone.
    pub fn union_selection(&mut self) {
        let Some(insert_id) = self.selected_stones().next().map(|s| s.insert_id) else {
            return;
        };
        for stone in self.stones.iter_mut().filter(|s| s.selected) {
            stone.insert_id = insert_id;
        }
    }

    /// Give every selected stone `new_insert_id`.
    pub fn separate_selection(&mut self, new_insert_id: i32) {
        for stone in self.stones.iter_mut().filter(|s| s.selected) {
            stone.insert_id = new_insert_id;
        }
    }

    // ------------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------------

    /// Snapshot the current selection as a new group. Returns its id.
    pub fn make_group_from_selection(&mut self, name: impl Into<String>) -> i32 {
        let id = self.next_group_id;
        self.next_group_id = self.next_group_id.wrapping_add(1);
        let members = self.selected_stones().map(|s| s.id).collect();
        self.groups.push(SelectionGroup {
            id,
            name: name.into(),
            members,
        });
        id
    }

    /// Returns `false` when no group has this id.
    pub fn delete_group(&mut self, id: i32) -> bool {
        match self.groups.iter().position(|g| g.id == id) {
            Some(index) => {
                self.groups.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the selection with the surviving members of group `id`.
    /// The selection is cleared even if the group does not exist.
    pub fn select_by_group(&mut self, id: i32) -> bool {
        self.deselect_all();
        let Some(group) = self.groups.iter().find(|g| g.id == id) else {
            return false;
        };
        for stone in self.stones.iter_mut().filter(|s| group.members.contains(&s.id)) {
            stone.selected = true;
        }
        true
    }

    // ------------------------------------------------------------------------
    // Restore (used by persistence)
    // ------------------------------------------------------------------------

    /// The stone counter never moves below an id already in use.
    pub(crate) fn restore_counters(&mut self, next_stone_id: i32, next_group_id: i32) {
        self.next_stone_id = self.next_stone_id.max(next_stone_id);
        self.next_group_id = next_group_id;
    }

    pub(crate) fn restore_group(&mut self, group: SelectionGroup) {
        self.groups.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::compile;
    use approx::assert_abs_diff_eq;

    /// Unit cube scaled per type code: 432 is 4 wide, 1.2 tall, 2 deep.
    fn catalog() -> MeshCatalog {
        compile(
            r#"
OBJ base {
    ID = 111;
    VERT { 0,0,0; 1,0,0; 1,1,0; 0,1,0; 0,0,1; 1,0,1; 1,1,1; 0,1,1; }
}
OBJ s432 CLONEOF base { ID = 432; SCALE = 4,1.2,2; }
OBJ s131 CLONEOF base { ID = 131; SCALE = 1,1.2,1; }
"#,
        )
        .unwrap()
    }

    fn place(type_code: i32, x: i32, y: i32, z: i32) -> StonePlacement {
        StonePlacement::new(type_code, StoneColor::White, 0, IVec3::new(x, y, z))
    }

    fn down_at(x: f64, z: f64) -> Ray {
        Ray::new(DVec3::new(x, 20.0, z), DVec3::NEG_Y)
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let catalog = catalog();
        let mut model = Model::new();
        assert_eq!(model.insert_stone(&catalog, None, 0, place(432, 0, 0, 0)), InsertOutcome::Inserted(0));
        assert_eq!(model.insert_stone(&catalog, None, 0, place(432, 4, 0, 0)), InsertOutcome::Inserted(1));
        assert_eq!(model.next_stone_id(), 2);
    }

    #[test]
    fn test_explicit_id_advances_counter_and_is_unique() {
        let catalog = catalog();
        let mut model = Model::new();
        assert_eq!(model.insert_stone(&catalog, Some(0), 0, place(432, 0, 0, 0)), InsertOutcome::Inserted(0));
        assert_eq!(model.insert_stone(&catalog, None, 0, place(432, 5, 0, 0)), InsertOutcome::Inserted(1));
        assert_eq!(
            model.insert_stone(&catalog, Some(1), 0, place(432, 10, 0, 0)),
            InsertOutcome::DuplicateId(1)
        );
        assert_eq!(model.insert_stone(&catalog, Some(7), 0, place(432, 15, 0, 0)), InsertOutcome::Inserted(7));
        assert_eq!(model.next_stone_id(), 8);

        let ids: Vec<i32> = model.stones().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 7]);
    }

    #[test]
    fn test_counters_wrap_at_i32_max() {
        let catalog = catalog();
        let mut model = Model::new();
        model.restore_counters(i32::MAX, i32::MAX);
        assert_eq!(model.insert_stone(&catalog, None, 0, place(131, 0, 0, 0)), InsertOutcome::Inserted(i32::MAX));
        assert_eq!(model.next_stone_id(), i32::MIN);
        assert_eq!(model.make_group_from_selection("edge"), i32::MAX);
        assert_eq!(model.next_group_id(), i32::MIN);
    }

    #[test]
    fn test_face_sharing_neighbours_are_accepted_overlaps_rejected() {
        let catalog = catalog();
        let mut model = Model::new();
        assert!(model.insert_stone(&catalog, None, 0, place(432, 0, 0, 0)).is_inserted());
        // Directly on top: 3 levels up
        assert!(model.insert_stone(&catalog, None, 0, place(432, 0, 3, 0)).is_inserted());
        assert_eq!(
            model.insert_stone(&catalog, None, 0, place(432, 2, 0, 1)),
            InsertOutcome::RejectedByCollision
        );
        assert_eq!(
            model.insert_stone(&catalog, None, 0, place(432, 0, 2, 0)),
            InsertOutcome::RejectedByCollision
        );
        assert_eq!(model.len(), 2);
        assert_eq!(model.next_stone_id(), 2);
    }

    #[test]
    fn test_unknown_type_is_not_stored() {
        let catalog = catalog();
        let mut model = Model::new();
        assert_eq!(model.insert_stone(&catalog, None, 0, place(999, 0, 0, 0)), InsertOutcome::UnknownMesh);
        assert!(model.is_empty());
    }

    #[test]
    fn test_rotation_is_normalized() {
        let catalog = catalog();
        let mut model = Model::new();
        let placement = StonePlacement::new(432, StoneColor::Red, 5, IVec3::ZERO);
        assert_eq!(placement.rotation, 1);
        model.insert_stone(&catalog, None, 0, placement);
        let stone = &model.stones()[0];
        assert_eq!(stone.rotation, 1);
        // A quarter turn maps +X length onto -Z
        assert_abs_diff_eq!(stone.local_aabb.min.z, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stone.local_aabb.max.x, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_placement_on_empty_grid() {
        let mut model = Model::new();
        let cell = model.placement_position(&down_at(2.5, -0.5), 0, false);
        assert_eq!(cell, Some(IVec3::new(2, 0, -1)));
        let cell = model.placement_position(&down_at(2.5, 3.5), 2, false);
        assert_eq!(cell, Some(IVec3::new(2, 2, 3)));
    }

    #[test]
    fn test_placement_stacks_on_top_of_stone() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(432, 0, 0, 0));
        assert_eq!(model.placement_position(&down_at(1.5, 0.5), 0, false), Some(IVec3::new(1, 3, 0)));
        // Off the footprint falls back to the grid
        assert_eq!(model.placement_position(&down_at(5.5, 0.5), 0, false), Some(IVec3::new(5, 0, 0)));
    }

    #[test]
    fn test_hold_height_reuses_last_level() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(432, 0, 0, 0));
        assert_eq!(model.placement_position(&down_at(1.5, 0.5), 0, false).map(|c| c.y), Some(3));
        let held = model.placement_position(&down_at(9.5, 9.5), 0, true);
        assert_eq!(held, Some(IVec3::new(9, 3, 9)));
    }

    #[test]
    fn test_placement_with_parallel_ray_is_none() {
        let mut model = Model::new();
        let ray = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X);
        assert_eq!(model.placement_position(&ray, 0, false), None);
    }

    #[test]
    fn test_pick_on_empty_model() {
        let mut model = Model::new();
        assert_eq!(model.pick(false, false, &down_at(0.5, 0.5)), None);
    }

    #[test]
    fn test_pick_single_stone_returns_its_position() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(432, 3, 1, -2));
        let centroid = model.pick(false, false, &down_at(4.0, -1.0)).unwrap();
        assert_abs_diff_eq!(centroid.x, 3.0);
        assert_abs_diff_eq!(centroid.y, 1.0 * LEVEL_HEIGHT + PICK_HEIGHT_BIAS, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.z, -2.0);
        assert_eq!(model.selected_count(), 1);
    }

    #[test]
    fn test_pick_nearest_and_clear_previous() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(131, 0, 0, 0));
        model.insert_stone(&catalog, None, 1, place(131, 0, 3, 0));
        model.pick(false, false, &down_at(0.5, 0.5));
        let top: Vec<i32> = model.selected_stones().map(|s| s.id).collect();
        assert_eq!(top, vec![1]);

        // Miss clears a non-additive selection
        assert_eq!(model.pick(false, false, &down_at(7.5, 7.5)), None);
        assert_eq!(model.selected_count(), 0);
    }

    #[test]
    fn test_pick_linked_selects_same_insert_id() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 7, place(131, 0, 0, 0));
        model.insert_stone(&catalog, None, 7, place(131, 2, 0, 0));
        model.insert_stone(&catalog, None, 8, place(131, 4, 0, 0));
        let centroid = model.pick(false, true, &down_at(0.5, 0.5)).unwrap();
        assert_eq!(model.selected_count(), 2);
        assert_abs_diff_eq!(centroid.x, 1.0);

        // Additive keeps the two and adds the third
        model.pick(true, false, &down_at(4.5, 0.5));
        assert_eq!(model.selected_count(), 3);
    }

    #[test]
    fn test_move_keeps_ids_and_drops_blocked() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(131, 0, 0, 0));
        model.insert_stone(&catalog, None, 0, place(131, 5, 0, 0));
        model.insert_stone(&catalog, None, 0, place(131, 6, 0, 0));
        model.pick(false, false, &down_at(0.5, 0.5));
        model.pick(true, false, &down_at(5.5, 0.5));

        // Stone 0 lands on free ground, stone 1 lands on stone 2
        assert_eq!(model.move_selected(&catalog, IVec3::new(1, 0, 0)), 1);
        assert_eq!(model.len(), 2);
        let moved = model.stone(0).unwrap();
        assert_eq!(moved.grid_pos, IVec3::new(1, 0, 0));
        assert!(!moved.selected);
        assert!(model.stone(1).is_none());
    }

    #[test]
    fn test_duplicate_uses_new_insert_id() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(131, 0, 0, 0));
        model.pick(false, false, &down_at(0.5, 0.5));
        assert_eq!(model.duplicate_selected(&catalog, IVec3::new(0, 0, 3), 42), 1);
        let copy = model.stone(1).unwrap();
        assert_eq!(copy.insert_id, 42);
        assert_eq!(copy.grid_pos, IVec3::new(0, 0, 3));
        assert!(model.stone(0).unwrap().selected);
    }

    #[test]
    fn test_union_and_separate() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 3, place(131, 0, 0, 0));
        model.insert_stone(&catalog, None, 4, place(131, 2, 0, 0));
        model.pick(false, false, &down_at(0.5, 0.5));
        model.pick(true, false, &down_at(2.5, 0.5));
        model.union_selection();
        assert!(model.stones().iter().all(|s| s.insert_id == 3));
        model.separate_selection(9);
        assert!(model.stones().iter().all(|s| s.insert_id == 9));
    }

    #[test]
    fn test_groups_track_surviving_members() {
        let catalog = catalog();
        let mut model = Model::new();
        model.insert_stone(&catalog, None, 0, place(131, 0, 0, 0));
        model.insert_stone(&catalog, None, 0, place(131, 2, 0, 0));
        model.pick(false, false, &down_at(0.5, 0.5));
        model.pick(true, false, &down_at(2.5, 0.5));
        let group = model.make_group_from_selection("pair");
        assert_eq!(group, 0);
        assert_eq!(model.next_group_id(), 1);

        model.deselect_all();
        model.pick(false, false, &down_at(0.5, 0.5));
        assert_eq!(model.delete_selected(), 1);

        assert!(model.select_by_group(group));
        let selected: Vec<i32> = model.selected_stones().map(|s| s.id).collect();
        assert_eq!(selected, vec![1]);
        assert_eq!(model.group_members(group).count(), 1);
        assert_eq!(model.group(group).map(|g| g.members.len()), Some(2));

        assert!(model.delete_group(group));
        assert!(!model.delete_group(group));
        assert!(!model.select_by_group(group));
        assert_eq!(model.selected_count(), 0);
    }
}
