//! Model Save/Load (.blcs)
//!
//! Big-endian binary layout, written in one pass:
//!
//! ```text
//! i32 magic = 0x424C4353 ("BLCS") | i32 version = 1 | i32 next_insert_id
//! f64 origin x, y, z
//! i32 stone_count, then per stone:
//!     i32 id, insert_id, color, type_code, rotation, grid x, grid y, grid z
//! i32 next_stone_id
//! i32 group_count | i32 next_group_id, then per group:
//!     i32 id | u16 name length + UTF-8 name | i32 member_count | i32 member ids
//! ```
//!
//! Loading rebuilds the model through the collision-checked insertion path
//! (so every stone gets a fresh box from the current catalog) and resolves
//! group members against the loaded stones. A member id without a stone is
//! dropped. Nothing is handed back unless the whole file was read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use glam::{DVec3, IVec3};
use tracing::{debug, info, warn};

use super::color::StoneColor;
use super::model::{InsertOutcome, Model, SelectionGroup, StonePlacement};
use crate::mesh::MeshCatalog;

// ============================================================================
// CONSTANTS
// ============================================================================

/// "BLCS"
pub const MODEL_MAGIC: i32 = 0x424C_4353;

/// Current file format version.
pub const MODEL_VERSION: i32 = 1;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur during model save/load.
#[derive(Debug)]
pub enum PersistError {
    /// Standard I/O error, including a truncated file.
    Io(std::io::Error),
    /// Leading magic is not "BLCS".
    InvalidMagic(i32),
    /// Format version is not supported.
    UnsupportedVersion(i32),
    /// Stone color outside the palette.
    InvalidColor(i32),
    /// Group name is not valid UTF-8.
    InvalidName,
    /// Group name longer than a u16 length prefix can express.
    NameTooLong(usize),
    /// A stone, group or member count is negative.
    NegativeCount(i32),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "IO error: {e}"),
            PersistError::InvalidMagic(m) => write!(f, "invalid magic {m:#010x} (expected BLCS)"),
            PersistError::UnsupportedVersion(v) => write!(f, "unsupported model version: {v}"),
            PersistError::InvalidColor(c) => write!(f, "invalid stone color index: {c}"),
            PersistError::InvalidName => write!(f, "group name is not valid UTF-8"),
            PersistError::NameTooLong(len) => write!(f, "group name too long: {len} bytes"),
            PersistError::NegativeCount(n) => write!(f, "negative element count: {n}"),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// A fully read save file.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Insert id the editor hands out next
    pub next_insert_id: i32,
    pub model: Model,
}

/// Write header and model.
pub fn save_document<W: Write>(writer: &mut W, next_insert_id: i32, model: &Model) -> Result<(), PersistError> {
    writer.write_i32::<BigEndian>(MODEL_MAGIC)?;
    writer.write_i32::<BigEndian>(MODEL_VERSION)?;
    writer.write_i32::<BigEndian>(next_insert_id)?;
    write_model(writer, model)
}

/// Read header and model. The header is checked before anything else is read.
pub fn load_document<R: Read>(reader: &mut R, catalog: &MeshCatalog) -> Result<LoadedDocument, PersistError> {
    let magic = reader.read_i32::<BigEndian>()?;
    if magic != MODEL_MAGIC {
        return Err(PersistError::InvalidMagic(magic));
    }
    let version = reader.read_i32::<BigEndian>()?;
    if version != MODEL_VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }
    let next_insert_id = reader.read_i32::<BigEndian>()?;
    let model = read_model(reader, catalog)?;
    Ok(LoadedDocument {
        next_insert_id,
        model,
    })
}

pub fn save_to_file(path: &Path, next_insert_id: i32, model: &Model) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_document(&mut writer, next_insert_id, model)?;
    writer.flush()?;
    info!(path = %path.display(), stones = model.len(), "saved model");
    Ok(())
}

pub fn load_from_file(path: &Path, catalog: &MeshCatalog) -> Result<LoadedDocument, PersistError> {
    let mut reader = BufReader::new(File::open(path)?);
    let document = load_document(&mut reader, catalog)?;
    info!(path = %path.display(), stones = document.model.len(), "loaded model");
    Ok(document)
}

// ============================================================================
// MODEL SECTION
// ============================================================================

/// Write the model section. Group members whose stone no longer exists are
/// left out.
pub fn write_model<W: Write>(writer: &mut W, model: &Model) -> Result<(), PersistError> {
    let origin = model.origin_offset();
    writer.write_f64::<BigEndian>(origin.x)?;
    writer.write_f64::<BigEndian>(origin.y)?;
    writer.write_f64::<BigEndian>(origin.z)?;

    write_count(writer, model.stones().len())?;
    for stone in model.stones() {
        writer.write_i32::<BigEndian>(stone.id)?;
        writer.write_i32::<BigEndian>(stone.insert_id)?;
        writer.write_i32::<BigEndian>(stone.color.index())?;
        writer.write_i32::<BigEndian>(stone.type_code)?;
        writer.write_i32::<BigEndian>(i32::from(stone.rotation))?;
        writer.write_i32::<BigEndian>(stone.grid_pos.x)?;
        writer.write_i32::<BigEndian>(stone.grid_pos.y)?;
        writer.write_i32::<BigEndian>(stone.grid_pos.z)?;
    }
    writer.write_i32::<BigEndian>(model.next_stone_id())?;

    write_count(writer, model.groups().len())?;
    writer.write_i32::<BigEndian>(model.next_group_id())?;
    for group in model.groups() {
        writer.write_i32::<BigEndian>(group.id)?;
        write_string(writer, &group.name)?;
        let members: Vec<i32> = model.group_members(group.id).map(|s| s.id).collect();
        write_count(writer, members.len())?;
        for id in members {
            writer.write_i32::<BigEndian>(id)?;
        }
    }
    Ok(())
}

/// Read a model section into a fresh model.
pub fn read_model<R: Read>(reader: &mut R, catalog: &MeshCatalog) -> Result<Model, PersistError> {
    let mut model = Model::new();
    model.set_origin_offset(DVec3::new(
        reader.read_f64::<BigEndian>()?,
        reader.read_f64::<BigEndian>()?,
        reader.read_f64::<BigEndian>()?,
    ));

    let stone_count = read_count(reader)?;
    for _ in 0..stone_count {
        let id = reader.read_i32::<BigEndian>()?;
        let insert_id = reader.read_i32::<BigEndian>()?;
        let color_index = reader.read_i32::<BigEndian>()?;
        let color = StoneColor::from_index(color_index).ok_or(PersistError::InvalidColor(color_index))?;
        let type_code = reader.read_i32::<BigEndian>()?;
        let rotation = reader.read_i32::<BigEndian>()?;
        let grid_pos = IVec3::new(
            reader.read_i32::<BigEndian>()?,
            reader.read_i32::<BigEndian>()?,
            reader.read_i32::<BigEndian>()?,
        );

        let placement = StonePlacement::new(type_code, color, rotation, grid_pos);
        match model.insert_stone(catalog, Some(id), insert_id, placement) {
            InsertOutcome::Inserted(_) => {}
            InsertOutcome::UnknownMesh => warn!(id, type_code, "dropping saved stone with unknown type"),
            InsertOutcome::RejectedByCollision => debug!(id, "dropping saved stone that overlaps another"),
            InsertOutcome::DuplicateId(_) => warn!(id, "dropping saved stone with a repeated id"),
        }
    }
    let next_stone_id = reader.read_i32::<BigEndian>()?;

    let group_count = read_count(reader)?;
    let next_group_id = reader.read_i32::<BigEndian>()?;
    model.restore_counters(next_stone_id, next_group_id);

    for _ in 0..group_count {
        let id = reader.read_i32::<BigEndian>()?;
        let name = read_string(reader)?;
        let member_count = read_count(reader)?;
        let mut members = Vec::with_capacity(member_count.min(1024));
        for _ in 0..member_count {
            let member = reader.read_i32::<BigEndian>()?;
            if model.stone(member).is_some() {
                members.push(member);
            }
        }
        model.restore_group(SelectionGroup { id, name, members });
    }

    Ok(model)
}

// ============================================================================
// PRIMITIVES
// ============================================================================

fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<(), PersistError> {
    let count = i32::try_from(count)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "element count exceeds i32"))?;
    writer.write_i32::<BigEndian>(count)?;
    Ok(())
}

fn read_count<R: Read>(reader: &mut R) -> Result<usize, PersistError> {
    let count = reader.read_i32::<BigEndian>()?;
    usize::try_from(count).map_err(|_| PersistError::NegativeCount(count))
}

fn write_string<W: Write>(writer: &mut W, text: &str) -> Result<(), PersistError> {
    let len = u16::try_from(text.len()).map_err(|_| PersistError::NameTooLong(text.len()))?;
    writer.write_u16::<BigEndian>(len)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, PersistError> {
    let len = reader.read_u16::<BigEndian>()?;
    let mut bytes = vec![0u8; usize::from(len)];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| PersistError::InvalidName)
}
