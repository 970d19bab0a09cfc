//! Maximum profile table.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::Tag;

/// Tag for the `maxp` table.
pub const MAXP: Tag = Tag::new(b"maxp");

/// Maximum profile table.
#[derive(Copy, Clone, Debug)]
pub struct Maxp<'a>(Buffer<'a>);

impl<'a> Maxp<'a> {
    /// Creates a new maximum profile table from a byte slice containing the
    /// table data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 6 {
            return Err(DecodeError::bounds(0, "table shorter than 6 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the version of the table in 16.16 fixed point. Version 0.5
    /// carries only the glyph count.
    pub fn version(&self) -> u32 {
        self.0.read_or_default(0)
    }

    /// Returns the number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.0.read_or_default(4)
    }
}
