//! Horizontal metrics table.

use super::parse::{Buffer, ReadData, Slice};
use super::types::{FWord, GlyphId, Tag, UfWord};

/// Tag for the `hmtx` table.
pub const HMTX: Tag = Tag::new(b"hmtx");

/// Paired advance width and left side bearing values.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HMetric {
    /// Advance width in font units.
    pub advance_width: UfWord,
    /// Left side bearing in font units.
    pub lsb: FWord,
}

impl ReadData for HMetric {
    const SIZE: usize = 4;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            advance_width: u16::read_data(buf, offset)?,
            lsb: i16::read_data(buf, offset + 2)?,
        })
    }
}

/// Horizontal metrics table.
///
/// Glyphs beyond the last long metric reuse its advance width and carry
/// only a left side bearing.
#[derive(Copy, Clone, Debug)]
pub struct Hmtx<'a> {
    data: Buffer<'a>,
    num_glyphs: u16,
    num_long_metrics: u16,
}

impl<'a> Hmtx<'a> {
    /// Creates a new horizontal metrics table from a byte slice containing
    /// the table data, the number of glyphs from `maxp` and the number of
    /// long metrics from `hhea`.
    pub(crate) fn new(data: &'a [u8], num_glyphs: u16, num_long_metrics: u16) -> Self {
        Self {
            data: Buffer::new(data),
            num_glyphs,
            num_long_metrics,
        }
    }

    /// Returns the length of the table data in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the slice of long metrics.
    pub fn metrics(&self) -> Slice<'a, HMetric> {
        self.data
            .read_slice(0, self.num_long_metrics as usize)
            .unwrap_or_default()
    }

    /// Returns the trailing left side bearings.
    pub fn side_bearings(&self) -> Slice<'a, FWord> {
        let offset = self.num_long_metrics as usize * 4;
        let len = (self.num_glyphs as usize).saturating_sub(self.num_long_metrics as usize);
        self.data.read_slice(offset, len).unwrap_or_default()
    }

    /// Returns the advance width for the specified glyph.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<UfWord> {
        if glyph_id >= self.num_glyphs {
            return None;
        }
        let metrics = self.metrics();
        if (glyph_id as usize) < metrics.len() {
            Some(metrics.get(glyph_id as usize)?.advance_width)
        } else {
            Some(metrics.last()?.advance_width)
        }
    }

    /// Returns the left side bearing for the specified glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<FWord> {
        if glyph_id >= self.num_glyphs {
            return None;
        }
        if glyph_id < self.num_long_metrics {
            Some(self.metrics().get(glyph_id as usize)?.lsb)
        } else {
            self.side_bearings()
                .get((glyph_id - self.num_long_metrics) as usize)
        }
    }
}

/// Returns the minimum byte length of an `hmtx` table for the specified
/// glyph and long metric counts.
pub(crate) fn expected_len(num_glyphs: u16, num_long_metrics: u16) -> usize {
    4 * num_long_metrics as usize
        + 2 * (num_glyphs as usize).saturating_sub(num_long_metrics as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_and_short_metrics() {
        let data = &[
            0x00, 0x64, // advance[0]: 100
            0x00, 0x05, // lsb[0]: 5
            0x00, 0xC8, // advance[1]: 200
            0xFF, 0xFB, // lsb[1]: -5
            0x00, 0x07, // trailing lsb[2]: 7
        ];
        let hmtx = Hmtx::new(data, 3, 2);
        assert_eq!(hmtx.advance_width(0), Some(100));
        assert_eq!(hmtx.advance_width(1), Some(200));
        // Glyphs past the long metrics reuse the last advance.
        assert_eq!(hmtx.advance_width(2), Some(200));
        assert_eq!(hmtx.advance_width(3), None);
        assert_eq!(hmtx.side_bearing(1), Some(-5));
        assert_eq!(hmtx.side_bearing(2), Some(7));
    }

    #[test]
    fn expected_len_rule() {
        assert_eq!(expected_len(3, 2), 10);
        assert_eq!(expected_len(2, 2), 8);
        assert_eq!(expected_len(0, 0), 0);
    }
}
