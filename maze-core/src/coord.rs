//! Spreadsheet-style coordinate labels ("A1", "AA12") and the bijective
//! base-26 codec between them and zero-based `(col, row)` pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: u32,
    pub row: u32,
}

impl Coordinate {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Renders this coordinate in spreadsheet form, e.g. `(0, 0) -> "A1"`.
    pub fn label(&self) -> String {
        format!("{}{}", encode_col(self.col), self.row + 1)
    }

    /// Parses a spreadsheet label such as `"A1"` or `"AA12"`.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        let (col, row) = decode_label(label)?;
        Ok(Self { col, row })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Width/height of a grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A maze needs at least one column and two rows (an entrance row and
    /// a distinct exit row) to be geometrically valid.
    pub fn is_valid_geometry(&self) -> bool {
        self.width >= 1 && self.height >= 2
    }

    /// Renders as `"WIDTHxHEIGHT"`, matching the wire format accepted by
    /// [`Dimension::parse`].
    pub fn label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Parses a grid-size string like `"10x8"`.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        let (w, h) = label
            .split_once('x')
            .ok_or_else(|| CoreError::InvalidGridSize(label.to_string()))?;

        let width: u32 = w
            .parse()
            .map_err(|_| CoreError::InvalidGridSize(label.to_string()))?;
        let height: u32 = h
            .parse()
            .map_err(|_| CoreError::InvalidGridSize(label.to_string()))?;

        if width == 0 || height == 0 {
            return Err(CoreError::InvalidGridSize(label.to_string()));
        }

        Ok(Self { width, height })
    }
}

/// Encodes a zero-based column index as a bijective base-26 label:
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`, `702 -> "AAA"`.
pub fn encode_col(col: u32) -> String {
    let mut n = col as u64 + 1; // shift onto a 1-based bijective base-26 scale
    let mut chars = Vec::new();

    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        chars.push(b'A' + rem);
        n = (n - 1) / 26;
    }

    chars.reverse();
    String::from_utf8(chars).expect("only ASCII uppercase letters are pushed")
}

/// Decodes a spreadsheet label into a zero-based `(col, row)` pair.
///
/// Accepts strings matching `^[A-Z]+[1-9][0-9]*$`.
pub fn decode_label(label: &str) -> Result<(u32, u32), CoreError> {
    let bytes = label.as_bytes();
    let split = bytes.iter().position(|b| b.is_ascii_digit());

    let split = match split {
        Some(0) | None => return Err(CoreError::InvalidCoordinate(label.to_string())),
        Some(i) => i,
    };

    let (letters, digits) = label.split_at(split);

    if letters.is_empty()
        || digits.is_empty()
        || !letters.bytes().all(|b| b.is_ascii_uppercase())
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || digits.starts_with('0')
    {
        return Err(CoreError::InvalidCoordinate(label.to_string()));
    }

    let col = letters
        .bytes()
        .fold(0u64, |acc, b| acc * 26 + 1 + (b - b'A') as u64);
    let col = col.checked_sub(1).ok_or_else(|| CoreError::InvalidCoordinate(label.to_string()))?;

    let row: u64 = digits
        .parse()
        .map_err(|_| CoreError::InvalidCoordinate(label.to_string()))?;
    let row = row - 1;

    Ok((col as u32, row as u32))
}
