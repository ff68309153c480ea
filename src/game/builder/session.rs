//! Editor Session
//!
//! State machine behind the designer's input surface. The UI forwards
//! pointer, key and menu signals here; the session keeps the brush, the
//! live preview and the model, and commits previews on release.

use std::io::{Read, Write};

use glam::{DVec3, IVec3};
use tracing::{debug, info, warn};

use super::planner::{Brush, plan_drag, plan_stack};
use crate::game::config::EditorConfig;
use crate::mesh::MeshCatalog;
use crate::physics::Ray;
use crate::world::{Model, PersistError, StoneColor, StonePlacement, load_document, save_document};

/// Input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Clicks pick stones
    Select,
    /// Hovering shows a stack preview at the cursor
    #[default]
    Insert,
    /// Button held: the preview spans anchor to cursor
    InsertDragging,
}

/// One designer document plus the interaction state around it.
pub struct EditorSession {
    catalog: MeshCatalog,
    model: Model,
    state: EditorState,
    brush: Brush,
    palette_hotkeys: [i32; 10],
    next_insert_id: i32,
    grid_level: i32,
    /// Shift held
    modifier: bool,
    anchor: IVec3,
    drag_end: IVec3,
    preview: Vec<StonePlacement>,
}

impl EditorSession {
    pub fn new(catalog: MeshCatalog, config: &EditorConfig) -> Self {
        let brush = Brush {
            type_code: config.default_stone_type,
            color: config.default_color,
            stack_height: config.stack_height,
            ..Brush::default()
        };
        let mut session = Self {
            catalog,
            model: Model::new(),
            state: EditorState::Insert,
            brush,
            palette_hotkeys: config.palette_hotkeys,
            next_insert_id: 0,
            grid_level: 0,
            modifier: false,
            anchor: IVec3::ZERO,
            drag_end: IVec3::ZERO,
            preview: Vec::new(),
        };
        session.update_preview();
        session
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn catalog(&self) -> &MeshCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Stones that would be committed on release. Empty in select mode.
    pub fn preview(&self) -> &[StonePlacement] {
        &self.preview
    }

    pub fn next_insert_id(&self) -> i32 {
        self.next_insert_id
    }

    pub fn grid_level(&self) -> i32 {
        self.grid_level
    }

    pub fn anchor(&self) -> IVec3 {
        self.anchor
    }

    fn update_preview(&mut self) {
        self.preview = match self.state {
            EditorState::Select => Vec::new(),
            EditorState::Insert => plan_stack(&self.brush, self.anchor),
            EditorState::InsertDragging => plan_drag(&self.brush, self.anchor, self.drag_end),
        };
    }

    fn take_insert_id(&mut self) -> i32 {
        let id = self.next_insert_id;
        self.next_insert_id = self.next_insert_id.wrapping_add(1);
        id
    }

    // ------------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------------

    /// Cursor moved; the ray runs from the camera through the cursor.
    pub fn pointer_moved(&mut self, ray_origin: DVec3, ray_dir: DVec3) {
        let dragging = self.state == EditorState::InsertDragging;
        let hold_height = self.modifier && self.state == EditorState::Insert;
        let ray = Ray::new(ray_origin, ray_dir);
        let Some(pos) = self.model.placement_position(&ray, self.grid_level, hold_height || dragging) else {
            return;
        };
        if dragging {
            self.drag_end = pos;
        } else {
            self.anchor = pos;
            self.drag_end = pos;
        }
        self.update_preview();
    }

    pub fn pointer_pressed(&mut self) {
        if self.state == EditorState::Insert {
            self.state = EditorState::InsertDragging;
            self.drag_end = self.anchor;
            self.update_preview();
        }
    }

    /// Commit the preview. Returns the number of stones that went in.
    pub fn pointer_released(&mut self) -> usize {
        if self.state != EditorState::InsertDragging {
            return 0;
        }
        let insert_id = self.take_insert_id();
        let preview = std::mem::take(&mut self.preview);
        let planned = preview.len();
        let inserted = preview
            .into_iter()
            .filter(|p| self.model.insert_stone(&self.catalog, None, insert_id, *p).is_inserted())
            .count();
        debug!(insert_id, planned, inserted, "committed preview");

        self.state = EditorState::Insert;
        self.drag_end = self.anchor;
        self.update_preview();
        inserted
    }

    /// Pick in select mode. Returns the move-tool anchor (selection
    /// centroid) or `None` when nothing is selected afterwards.
    pub fn clicked(&mut self, double_click: bool, ray_origin: DVec3, ray_dir: DVec3) -> Option<DVec3> {
        if self.state != EditorState::Select {
            return None;
        }
        let ray = Ray::new(ray_origin, ray_dir);
        self.model.pick(self.modifier, double_click, &ray)
    }

    // ------------------------------------------------------------------------
    // Brush
    // ------------------------------------------------------------------------

    /// Number key `key` (0-9) picks a palette type in insert mode.
    pub fn number_key(&mut self, key: u8) {
        if self.state == EditorState::Select {
            return;
        }
        let Some(type_code) = self.palette_hotkeys.get(usize::from(key)).copied() else {
            return;
        };
        self.brush.type_code = type_code;
        info!("[Designer] Stone type {type_code}");
        self.update_preview();
    }

    pub fn set_stone_type(&mut self, type_code: i32) {
        self.brush.type_code = type_code;
        self.update_preview();
    }

    pub fn set_color(&mut self, color: StoneColor) {
        self.brush.color = color;
        self.update_preview();
    }

    pub fn set_stack_height(&mut self, stack_height: u32) {
        self.brush.stack_height = stack_height;
        self.update_preview();
    }

    pub fn rotate_brush(&mut self) {
        self.brush.rotation = (self.brush.rotation + 1) % 4;
        self.update_preview();
    }

    pub fn set_rect_filled(&mut self, filled: bool) {
        self.brush.rect_filled = filled;
        self.update_preview();
    }

    pub fn set_edge_wall(&mut self, edge_wall: bool) {
        self.brush.edge_wall = edge_wall;
        self.update_preview();
    }

    pub fn grid_level_up(&mut self) {
        self.grid_level += 1;
    }

    pub fn grid_level_down(&mut self) {
        self.grid_level -= 1;
    }

    /// Shift: hold height in insert mode, additive picking in select mode.
    pub fn set_shift(&mut self, held: bool) {
        self.modifier = held;
    }

    // ------------------------------------------------------------------------
    // Modes
    // ------------------------------------------------------------------------

    pub fn enable_select_mode(&mut self) {
        self.state = EditorState::Select;
        info!("[Designer] Select mode");
        self.update_preview();
    }

    pub fn enable_insert_mode(&mut self) {
        self.state = EditorState::Insert;
        self.model.deselect_all();
        info!("[Designer] Insert mode");
        self.update_preview();
    }

    // ------------------------------------------------------------------------
    // Selection edits
    // ------------------------------------------------------------------------

    pub fn delete_selection(&mut self) -> usize {
        self.model.delete_selected()
    }

    pub fn move_selection(&mut self, delta: IVec3) -> usize {
        self.model.move_selected(&self.catalog, delta)
    }

    pub fn duplicate_selection(&mut self, delta: IVec3) -> usize {
        let insert_id = self.take_insert_id();
        self.model.duplicate_selected(&self.catalog, delta, insert_id)
    }

    pub fn union_selection(&mut self) {
        self.model.union_selection();
    }

    pub fn separate_selection(&mut self) {
        let insert_id = self.take_insert_id();
        self.model.separate_selection(insert_id);
    }

    pub fn make_group(&mut self, name: impl Into<String>) -> i32 {
        self.model.make_group_from_selection(name)
    }

    pub fn delete_group(&mut self, id: i32) -> bool {
        self.model.delete_group(id)
    }

    pub fn select_group(&mut self, id: i32) -> bool {
        self.model.select_by_group(id)
    }

    // ------------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------------

    /// Drop every stone and group and restart all id counters.
    pub fn clear_everything(&mut self) {
        self.model = Model::new();
        self.next_insert_id = 0;
        info!("[Designer] Cleared");
        self.update_preview();
    }

    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), PersistError> {
        save_document(writer, self.next_insert_id, &self.model)?;
        info!("[Designer] Saved {} stones", self.model.len());
        Ok(())
    }

    /// Replace the document with one read from `reader`. On error the
    /// current document is left untouched.
    pub fn load<R: Read>(&mut self, reader: &mut R) -> Result<(), PersistError> {
        let document = match load_document(reader, &self.catalog) {
            Ok(document) => document,
            Err(e) => {
                warn!("[Designer] Load failed: {e}");
                return Err(e);
            }
        };
        self.model = document.model;
        self.next_insert_id = document.next_insert_id;
        info!(
            "[Designer] Loaded {} stones, {} groups",
            self.model.len(),
            self.model.groups().len()
        );
        self.update_preview();
        Ok(())
    }
}
