//! Stone colors
//!
//! The palette is fixed at eight entries. The discriminant is the value
//! written to save files.

use serde::{Deserialize, Serialize};

/// Tint applied to every selected stone.
pub const SELECTION_HIGHLIGHT: [f32; 3] = [1.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoneColor {
    #[default]
    White = 0,
    Yellow = 1,
    Red = 2,
    Blue = 3,
    Black = 4,
    Green = 5,
    Brown = 6,
    Gray = 7,
}

impl StoneColor {
    pub const ALL: [StoneColor; 8] = [
        StoneColor::White,
        StoneColor::Yellow,
        StoneColor::Red,
        StoneColor::Blue,
        StoneColor::Black,
        StoneColor::Green,
        StoneColor::Brown,
        StoneColor::Gray,
    ];

    /// Decode a palette index. `None` outside 0..8.
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn rgb(self) -> [f32; 3] {
        match self {
            StoneColor::White => [1.0, 1.0, 1.0],
            StoneColor::Yellow => [1.0, 1.0, 0.0],
            StoneColor::Red => [0.7, 0.3, 0.3],
            StoneColor::Blue => [0.0, 0.0, 1.0],
            // Dark enough to read as black, light enough to keep shading
            StoneColor::Black => [0.3, 0.3, 0.3],
            StoneColor::Green => [0.1, 0.8, 0.1],
            StoneColor::Brown => [0.5, 0.3, 0.0],
            StoneColor::Gray => [0.6, 0.6, 0.6],
        }
    }
}
