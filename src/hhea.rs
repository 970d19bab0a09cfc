//! Horizontal header table.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::{FWord, Tag, UfWord};

/// Tag for the `hhea` table.
pub const HHEA: Tag = Tag::new(b"hhea");

/// Horizontal header table.
#[derive(Copy, Clone, Debug)]
pub struct Hhea<'a>(Buffer<'a>);

impl<'a> Hhea<'a> {
    /// Creates a new horizontal header table from a byte slice containing
    /// the table data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 36 {
            return Err(DecodeError::bounds(0, "table shorter than 36 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the typographic ascender.
    pub fn ascender(&self) -> FWord {
        self.0.read_or_default(4)
    }

    /// Returns the typographic descender.
    pub fn descender(&self) -> FWord {
        self.0.read_or_default(6)
    }

    /// Returns the typographic line gap.
    pub fn line_gap(&self) -> FWord {
        self.0.read_or_default(8)
    }

    /// Returns the maximum advance width.
    pub fn max_advance(&self) -> UfWord {
        self.0.read_or_default(10)
    }

    /// Returns the number of "long" entries in the horizontal metrics
    /// table.
    pub fn num_long_metrics(&self) -> u16 {
        self.0.read_or_default(34)
    }
}
