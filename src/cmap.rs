//! Character to glyph mapping table.
//!
//! Only the header is decoded; the mapping itself is consumed by an
//! external collaborator.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::Tag;

/// Tag for the `cmap` table.
pub const CMAP: Tag = Tag::new(b"cmap");

/// Character to glyph mapping table.
#[derive(Copy, Clone, Debug)]
pub struct Cmap<'a>(Buffer<'a>);

impl<'a> Cmap<'a> {
    /// Creates a new character mapping table from a byte slice containing
    /// the table data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 4 {
            return Err(DecodeError::bounds(0, "table shorter than 4 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the version.
    pub fn version(&self) -> u16 {
        self.0.read_or_default(0)
    }

    /// Returns the number of encoding subtables.
    pub fn num_subtables(&self) -> u16 {
        self.0.read_or_default(2)
    }
}
