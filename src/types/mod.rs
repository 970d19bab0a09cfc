//! Fundamental data types defined by the font specification.

mod tag;
mod table;

pub use table::{RawDirectoryHeader, RawTableRecord, TableRecord};
pub use tag::Tag;

/// Glyph identifier.
pub type GlyphId = u16;

/// Signed 16-bit value in font units.
pub type FWord = i16;

/// Unsigned 16-bit value in font units.
pub type UfWord = u16;

/// Glyph class identifier.
pub type GlyphClass = u16;

/// Mark attachment class identifier.
pub type MarkAttachClass = u16;
