//! Font header table.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::Tag;

/// Tag for the `head` table.
pub const HEAD: Tag = Tag::new(b"head");

/// Font header table.
#[derive(Copy, Clone, Debug)]
pub struct Head<'a>(Buffer<'a>);

impl<'a> Head<'a> {
    /// Creates a new font header table from a byte slice containing the
    /// table data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 54 {
            return Err(DecodeError::bounds(0, "table shorter than 54 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the major version.
    pub fn major_version(&self) -> u16 {
        self.0.read_or_default(0)
    }

    /// Returns the minor version.
    pub fn minor_version(&self) -> u16 {
        self.0.read_or_default(2)
    }

    /// Returns the font revision in 16.16 fixed point.
    pub fn font_revision(&self) -> i32 {
        self.0.read_or_default(4)
    }

    /// Returns the header flags.
    pub fn flags(&self) -> u16 {
        self.0.read_or_default(16)
    }

    /// Returns the design units per em.
    pub fn units_per_em(&self) -> u16 {
        self.0.read_or_default(18)
    }

    /// Returns the minimum x extent over all glyphs.
    pub fn x_min(&self) -> i16 {
        self.0.read_or_default(36)
    }

    /// Returns the minimum y extent over all glyphs.
    pub fn y_min(&self) -> i16 {
        self.0.read_or_default(38)
    }

    /// Returns the maximum x extent over all glyphs.
    pub fn x_max(&self) -> i16 {
        self.0.read_or_default(40)
    }

    /// Returns the maximum y extent over all glyphs.
    pub fn y_max(&self) -> i16 {
        self.0.read_or_default(42)
    }

    /// Returns 0 for short `loca` offsets and 1 for long offsets.
    pub fn index_to_loc_format(&self) -> i16 {
        self.0.read_or_default(50)
    }
}
