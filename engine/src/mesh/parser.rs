//! Stone DSL compiler
//!
//! Recursive descent over the lexer's token stream. One `OBJ` block becomes
//! one [`MeshDefinition`]; blocks are appended to the catalog as soon as
//! their closing brace is reached.
//!
//! ```text
//! OBJ base {
//!     ID = 111;
//!     CAPTION = "1x1x1";
//!     VERT { 0,0,0; 1,0,0; 1,1,0; 0,1,0; }
//!     TEX_COO { 0,0:511,511; }
//!     FACES { 0,1,2,3; 0; }
//! }
//! OBJ slab CLONEOF base {
//!     ID = 421;
//!     SCALE = 4,0.8,1;
//! }
//! ```
//!
//! The first malformed block stops compilation of the whole source. Blocks
//! completed before it stay in the catalog, the failing one is dropped.

use std::path::Path;

use glam::{DVec3, IVec2};
use tracing::{debug, warn};

use super::catalog::{Face, MeshCatalog, MeshDefinition, TexCoordSet};
use super::error::{AssetError, ParseError};
use super::lexer::{Token, tokenize};

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Compile DSL source into a catalog.
///
/// Fails with the collected errors if any block could not be compiled, even
/// when earlier blocks succeeded. Use [`compile_lenient`] to keep them.
pub fn compile(source: &str) -> Result<MeshCatalog, Vec<ParseError>> {
    let (catalog, errors) = compile_lenient(source);
    if errors.is_empty() {
        Ok(catalog)
    } else {
        Err(errors)
    }
}

/// Compile DSL source, returning whatever was compiled before the first
/// failure together with the errors.
pub fn compile_lenient(source: &str) -> (MeshCatalog, Vec<ParseError>) {
    let mut catalog = MeshCatalog::new();
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("mesh source rejected by lexer: {e}");
            return (catalog, vec![e]);
        }
    };

    let mut parser = Parser::new(&tokens);
    while !parser.at_end() {
        match parser.object(&catalog) {
            Ok(definition) => {
                debug!(name = %definition.name, id = definition.id, "compiled mesh");
                catalog.push(definition);
            }
            Err(e) => {
                warn!(
                    compiled = catalog.len(),
                    "mesh compilation aborted: {e}"
                );
                return (catalog, vec![e]);
            }
        }
    }
    (catalog, Vec::new())
}

/// Read and compile an asset file.
pub fn compile_file(path: impl AsRef<Path>) -> Result<MeshCatalog, AssetError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    compile(&source).map_err(AssetError::Parse)
}

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_is(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.text == text)
    }

    /// Line of the current token, or of the last token at end of input.
    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line())
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(t) => self.error(format!("expected {expected}, found '{}'", t.text)),
            None => self.error(format!("expected {expected}, found end of input")),
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, text: &str) -> Result<(), ParseError> {
        if self.peek_is(text) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{text}'")))
        }
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.peek_is(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------------
    // Terminals
    // ------------------------------------------------------------------------

    fn int(&mut self) -> Result<i32, ParseError> {
        let token = match self.peek() {
            Some(t) if !t.text.is_empty() && t.text.bytes().all(|b| b.is_ascii_digit()) => t,
            _ => return Err(self.unexpected("integer")),
        };
        let value = token
            .text
            .parse::<i32>()
            .map_err(|_| self.error(format!("integer '{}' out of range", token.text)))?;
        self.pos += 1;
        Ok(value)
    }

    fn index_value(&mut self) -> Result<usize, ParseError> {
        // Non-negative by construction of `int`
        Ok(self.int()? as usize)
    }

    fn int2(&mut self) -> Result<IVec2, ParseError> {
        let x = self.int()?;
        self.expect(",")?;
        let y = self.int()?;
        Ok(IVec2::new(x, y))
    }

    /// `['-'] INT ['.' INT]`. The fraction digits `d` contribute
    /// `d / 10^ceil(log10 d)`, so `.5` and `.50` both read as one half but
    /// `.05` reads as one half too.
    fn dec(&mut self) -> Result<f64, ParseError> {
        let negative = self.eat("-");
        let mut value = f64::from(self.int()?);
        if self.eat(".") {
            let fraction = f64::from(self.int()?);
            if fraction != 0.0 {
                value += fraction / 10f64.powf(fraction.log10().ceil());
            }
        }
        Ok(if negative { -value } else { value })
    }

    fn vector3(&mut self) -> Result<DVec3, ParseError> {
        let x = self.dec()?;
        self.expect(",")?;
        let y = self.dec()?;
        self.expect(",")?;
        let z = self.dec()?;
        Ok(DVec3::new(x, y, z))
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(t) if is_identifier(&t.text) => {
                self.pos += 1;
                Ok(t.text.clone())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(t) if t.text.len() >= 2 && t.text.starts_with('"') && t.text.ends_with('"') => {
                self.pos += 1;
                Ok(t.text[1..t.text.len() - 1].to_string())
            }
            _ => Err(self.unexpected("string")),
        }
    }

    /// Optional `[i]` prefix of a list entry, with the line it appeared on.
    fn index(&mut self) -> Result<Option<(usize, usize)>, ParseError> {
        if !self.peek_is("[") {
            return Ok(None);
        }
        let line = self.line();
        self.pos += 1;
        let i = self.index_value()?;
        self.expect("]")?;
        Ok(Some((i, line)))
    }

    // ------------------------------------------------------------------------
    // Productions
    // ------------------------------------------------------------------------

    fn tex_coord_set(&mut self) -> Result<TexCoordSet, ParseError> {
        let first = self.int2()?;
        if self.eat(":") {
            let second = self.int2()?;
            return Ok(TexCoordSet::Rect([first, second]));
        }
        let mut points = vec![first];
        while self.eat(",") {
            points.push(self.int2()?);
        }
        if points.len() < 3 {
            return Err(self.unexpected("':' or at least three coordinate pairs"));
        }
        Ok(TexCoordSet::Polygon(points))
    }

    fn face(&mut self) -> Result<Face, ParseError> {
        let mut indices = vec![self.index_value()?];
        while self.eat(",") {
            indices.push(self.index_value()?);
        }
        if indices.len() < 3 {
            return Err(self.unexpected("at least three vertex indices"));
        }
        self.expect(";")?;
        let tex_coord_set = self.index_value()?;
        Ok(Face {
            indices,
            tex_coord_set,
        })
    }

    /// `'{' {[INDEX] entry ';'} '}'` with indexed overwrite or append.
    fn list_block<T>(
        &mut self,
        list: &mut Vec<T>,
        what: &str,
        mut entry: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<(), ParseError> {
        self.expect("{")?;
        while !self.eat("}") {
            if self.at_end() {
                return Err(self.unexpected("'}'"));
            }
            let index = self.index()?;
            let value = entry(self)?;
            self.expect(";")?;
            match index {
                None => list.push(value),
                Some((i, _)) if i < list.len() => list[i] = value,
                Some((i, line)) => {
                    return Err(ParseError::new(
                        format!("{what} index {i} out of range (list has {} entries)", list.len()),
                        line,
                    ));
                }
            }
        }
        Ok(())
    }

    fn body_item(&mut self, def: &mut MeshDefinition) -> Result<(), ParseError> {
        let keyword = match self.next() {
            Some(t) => t.text.as_str(),
            None => return Err(self.unexpected("statement or '}'")),
        };
        match keyword {
            "ID" => {
                self.expect("=")?;
                def.id = self.int()?;
                self.expect(";")
            }
            "CAPTION" => {
                self.expect("=")?;
                def.caption = self.string()?;
                self.expect(";")
            }
            "SCALE" => {
                self.expect("=")?;
                def.scale = self.vector3()?;
                self.expect(";")
            }
            "TEX_SIZE" => {
                self.expect("=")?;
                def.texture_size = self.index_value()? as u32;
                self.expect(";")
            }
            "TEX_FILE" => {
                self.expect("=")?;
                def.texture_filename = self.string()?;
                self.expect(";")
            }
            "TRANSLATION" => {
                self.expect("=")?;
                def.translation = self.vector3()?;
                self.expect(";")
            }
            "VERT" => self.list_block(&mut def.vertices, "vertex", Self::vector3),
            "TEX_COO" => self.list_block(&mut def.tex_coord_sets, "texture coordinate", Self::tex_coord_set),
            "FACES" => self.list_block(&mut def.faces, "face", Self::face),
            other => {
                self.pos -= 1;
                Err(self.error(format!("unexpected '{other}' in object body")))
            }
        }
    }

    /// `OBJ name [CLONEOF source] { ... }`
    fn object(&mut self, catalog: &MeshCatalog) -> Result<MeshDefinition, ParseError> {
        let obj_line = self.line();
        self.expect("OBJ")?;
        let name = self.identifier()?;
        if catalog.contains_name(&name) {
            return Err(ParseError::new(
                format!("object name '{name}' already exists"),
                obj_line,
            ));
        }

        let mut def = if self.eat("CLONEOF") {
            let source = self.identifier()?;
            match catalog.by_name(&source) {
                Some(src) => src.clone_as(name),
                None => {
                    return Err(ParseError::new(
                        format!("cannot clone '{name}': source object '{source}' not found"),
                        obj_line,
                    ));
                }
            }
        } else {
            MeshDefinition::new(name)
        };

        self.expect("{")?;
        while !self.eat("}") {
            self.body_item(&mut def)?;
        }
        Ok(def)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}
