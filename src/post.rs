//! PostScript table.

use super::diag::DecodeError;
use super::parse::Buffer;
use super::types::Tag;

/// Tag for the `post` table.
pub const POST: Tag = Tag::new(b"post");

/// PostScript table.
#[derive(Copy, Clone, Debug)]
pub struct Post<'a>(Buffer<'a>);

impl<'a> Post<'a> {
    /// Creates a new PostScript table from a byte slice containing the
    /// table data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 4 {
            return Err(DecodeError::bounds(0, "table shorter than 4 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the version in 16.16 fixed point.
    pub fn version(&self) -> u32 {
        self.0.read_or_default(0)
    }

    /// Returns the italic angle in 16.16 fixed point.
    pub fn italic_angle(&self) -> i32 {
        self.0.read_or_default(4)
    }

    /// Returns true if the font is monospaced.
    pub fn is_fixed_pitch(&self) -> bool {
        self.0.read_or_default::<u32>(12) != 0
    }
}
