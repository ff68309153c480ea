//! Mesh compiler and geometry errors

use std::fmt;

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A compilation failure, reported at the source line of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based source line
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Errors from loading an asset file from disk.
#[derive(Debug)]
pub enum AssetError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// The DSL failed to compile.
    Parse(Vec<ParseError>),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::IoError(e) => write!(f, "IO error: {e}"),
            AssetError::Parse(errors) => {
                write!(f, "{} parse error(s)", errors.len())?;
                for e in errors {
                    write!(f, "; {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::IoError(e)
    }
}

// ============================================================================
// GEOMETRY ERRORS
// ============================================================================

/// Errors from turning a mesh definition into a triangle batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A face references a vertex that does not exist.
    VertexIndexOutOfRange { face: usize, index: usize },
    /// A face references a texture-coordinate set that does not exist.
    TexCoordSetOutOfRange { face: usize, index: usize },
    /// An explicit texture-coordinate list is shorter than the face.
    TexCoordListTooShort { face: usize, needed: usize, got: usize },
    /// Rectangle shorthand only maps quads (two fan triangles).
    RectTooManyTriangles { face: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::VertexIndexOutOfRange { face, index } => {
                write!(f, "face {face}: vertex index {index} out of range")
            }
            GeometryError::TexCoordSetOutOfRange { face, index } => {
                write!(f, "face {face}: texture coordinate set {index} out of range")
            }
            GeometryError::TexCoordListTooShort { face, needed, got } => {
                write!(f, "face {face}: needs {needed} texture coordinates, got {got}")
            }
            GeometryError::RectTooManyTriangles { face } => {
                write!(f, "face {face}: too many triangles for rectangle texture coordinates")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
