//! Index to location table.
//!
//! Only the byte length is consumed, for cross-table validation; glyph
//! offsets belong to an external collaborator.

use super::types::Tag;

/// Tag for the `loca` table.
pub const LOCA: Tag = Tag::new(b"loca");

/// Returns the exact byte length of a `loca` table for the specified glyph
/// count and `head` index-to-location format.
pub(crate) fn expected_len(num_glyphs: u16, long_format: bool) -> usize {
    let entries = num_glyphs as usize + 1;
    if long_format {
        4 * entries
    } else {
        2 * entries
    }
}
