//! OS/2 and Windows metrics table.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::{FWord, Tag};

/// Tag for the `OS/2` table.
pub const OS2: Tag = Tag::new(b"OS/2");

/// OS/2 and Windows metrics table.
#[derive(Copy, Clone, Debug)]
pub struct Os2<'a>(Buffer<'a>);

impl<'a> Os2<'a> {
    /// Creates a new metrics table from a byte slice containing the table
    /// data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 2 {
            return Err(DecodeError::bounds(0, "table shorter than 2 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the version.
    pub fn version(&self) -> u16 {
        self.0.read_or_default(0)
    }

    /// Returns the average advance width of lowercase letters.
    pub fn average_char_width(&self) -> FWord {
        self.0.read_or_default(2)
    }

    /// Returns the visual weight class (1-1000).
    pub fn weight_class(&self) -> u16 {
        self.0.read_or_default(4)
    }

    /// Returns the relative width class (1-9).
    pub fn width_class(&self) -> u16 {
        self.0.read_or_default(6)
    }

    /// Returns the typographic ascender.
    pub fn typographic_ascender(&self) -> FWord {
        self.0.read_or_default(68)
    }

    /// Returns the typographic descender.
    pub fn typographic_descender(&self) -> FWord {
        self.0.read_or_default(70)
    }
}
