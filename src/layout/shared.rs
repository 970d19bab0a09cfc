//! Coverage and class definition tables.

use crate::diag::DecodeError;
use crate::limits;
use crate::parse::{Buffer, ReadData, Slice};
use crate::types::{GlyphClass, GlyphId};

/// Sorted, indexed set of glyph identifiers.
///
/// Both on-disk formats present the same interface: [`get`](Self::get)
/// returns the coverage index assigned to a member glyph.
#[derive(Clone, Debug)]
pub enum Coverage<'a> {
    /// Format 1: enumerated glyph list.
    Glyphs(Slice<'a, GlyphId>),
    /// Format 2: sorted range records.
    Ranges(Slice<'a, CoverageRangeRecord>),
}

impl<'a> Coverage<'a> {
    /// Decodes a coverage table at the specified offset.
    pub(crate) fn parse(data: Buffer<'a>, offset: u32) -> Result<Self, DecodeError> {
        let base = offset as usize;
        let format = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "coverage table too short"))?;
        let count = read_count(
            data,
            base + 2,
            limits::MAX_COVERAGE_ENTRIES,
            "coverage count",
        )?;
        match format {
            1 => {
                let glyphs = data.read_slice::<GlyphId>(base + 4, count).ok_or_else(|| {
                    DecodeError::bounds(base + 4, "coverage glyph array escapes table")
                })?;
                Ok(Self::Glyphs(glyphs))
            }
            2 => {
                let ranges = data
                    .read_slice::<CoverageRangeRecord>(base + 4, count)
                    .ok_or_else(|| {
                        DecodeError::bounds(base + 4, "coverage range array escapes table")
                    })?;
                Ok(Self::Ranges(ranges))
            }
            _ => Err(DecodeError::format(
                base,
                format!("unknown coverage format {}", format),
            )),
        }
    }

    /// Returns an empty coverage table.
    pub fn empty() -> Self {
        Self::Glyphs(Slice::default())
    }

    /// Returns the coverage index for the specified glyph.
    pub fn get(&self, glyph_id: GlyphId) -> Option<u16> {
        match self {
            Self::Glyphs(glyphs) => glyphs
                .binary_search_by(|g| g.cmp(&glyph_id))
                .map(|(index, _)| index as u16),
            Self::Ranges(ranges) => {
                let (_, range) = ranges.binary_search_by(|range| {
                    use core::cmp::Ordering::*;
                    if glyph_id < range.start {
                        Greater
                    } else if glyph_id > range.end {
                        Less
                    } else {
                        Equal
                    }
                })?;
                Some(range.start_coverage_index + (glyph_id - range.start))
            }
        }
    }

    /// Returns the number of covered glyphs.
    pub fn len(&self) -> u32 {
        match self {
            Self::Glyphs(glyphs) => glyphs.len() as u32,
            Self::Ranges(ranges) => match ranges.last() {
                Some(range) => {
                    range.start_coverage_index as u32
                        + range.end.saturating_sub(range.start) as u32
                        + 1
                }
                None => 0,
            },
        }
    }

    /// Returns true if no glyphs are covered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Glyphs(glyphs) => glyphs.is_empty(),
            Self::Ranges(ranges) => ranges.is_empty(),
        }
    }

    /// Returns an iterator over the (glyph, coverage index) pairs in
    /// coverage order.
    pub fn entries(&self) -> impl Iterator<Item = (GlyphId, u16)> + '_ {
        let glyphs = match self {
            Self::Glyphs(glyphs) => Some(
                glyphs
                    .iter()
                    .enumerate()
                    .map(|(index, glyph)| (glyph, index as u16)),
            ),
            _ => None,
        };
        let ranges = match self {
            Self::Ranges(ranges) => Some(ranges.iter().flat_map(|range| {
                (range.start..=range.end)
                    .enumerate()
                    .map(move |(i, glyph)| (glyph, range.start_coverage_index + i as u16))
            })),
            _ => None,
        };
        glyphs
            .into_iter()
            .flatten()
            .chain(ranges.into_iter().flatten())
    }
}

/// Range record in a format 2 coverage table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CoverageRangeRecord {
    /// First glyph in the range.
    pub start: GlyphId,
    /// Last glyph in the range, inclusive.
    pub end: GlyphId,
    /// Coverage index of the first glyph in the range.
    pub start_coverage_index: u16,
}

impl ReadData for CoverageRangeRecord {
    const SIZE: usize = 6;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            start: u16::read_data(buf, offset)?,
            end: u16::read_data(buf, offset + 2)?,
            start_coverage_index: u16::read_data(buf, offset + 4)?,
        })
    }
}

/// Partial function from glyph identifier to glyph class.
///
/// Unmapped glyphs belong to the implicit class 0.
#[derive(Clone, Debug)]
pub enum ClassDef<'a> {
    /// Format 1: packed class array for a contiguous glyph range.
    Table {
        /// First glyph covered by the class array.
        start: GlyphId,
        /// Class values for `start..start + len`.
        classes: Slice<'a, GlyphClass>,
    },
    /// Format 2: sorted class range records.
    Ranges(Slice<'a, ClassRangeRecord>),
}

impl<'a> ClassDef<'a> {
    /// Decodes a class definition table at the specified offset.
    pub(crate) fn parse(data: Buffer<'a>, offset: u32) -> Result<Self, DecodeError> {
        let base = offset as usize;
        let format = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "class definition too short"))?;
        match format {
            1 => {
                let start = data
                    .read_u16(base + 2)
                    .ok_or_else(|| DecodeError::bounds(base + 2, "class definition too short"))?;
                let count =
                    read_count(data, base + 4, limits::MAX_CLASS_ENTRIES, "class count")?;
                let classes = data
                    .read_slice::<GlyphClass>(base + 6, count)
                    .ok_or_else(|| {
                        DecodeError::bounds(base + 6, "class value array escapes table")
                    })?;
                Ok(Self::Table { start, classes })
            }
            2 => {
                let count =
                    read_count(data, base + 2, limits::MAX_CLASS_ENTRIES, "class range count")?;
                let ranges = data
                    .read_slice::<ClassRangeRecord>(base + 4, count)
                    .ok_or_else(|| {
                        DecodeError::bounds(base + 4, "class range array escapes table")
                    })?;
                Ok(Self::Ranges(ranges))
            }
            _ => Err(DecodeError::format(
                base,
                format!("unknown class definition format {}", format),
            )),
        }
    }

    /// Returns an empty class definition: every glyph maps to class 0.
    pub fn empty() -> Self {
        Self::Ranges(Slice::default())
    }

    /// Returns the class for the specified glyph.
    pub fn get(&self, glyph_id: GlyphId) -> GlyphClass {
        match self {
            Self::Table { start, classes } => {
                if glyph_id >= *start {
                    classes.get((glyph_id - start) as usize).unwrap_or(0)
                } else {
                    0
                }
            }
            Self::Ranges(ranges) => ranges
                .binary_search_by(|range| {
                    use core::cmp::Ordering::*;
                    if glyph_id < range.start {
                        Greater
                    } else if glyph_id > range.end {
                        Less
                    } else {
                        Equal
                    }
                })
                .map(|(_, range)| range.class)
                .unwrap_or(0),
        }
    }
}

/// Range record in a format 2 class definition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClassRangeRecord {
    /// First glyph in the range.
    pub start: GlyphId,
    /// Last glyph in the range, inclusive.
    pub end: GlyphId,
    /// Class assigned to the range.
    pub class: GlyphClass,
}

impl ReadData for ClassRangeRecord {
    const SIZE: usize = 6;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            start: u16::read_data(buf, offset)?,
            end: u16::read_data(buf, offset + 2)?,
            class: u16::read_data(buf, offset + 4)?,
        })
    }
}

/// Reads a 16-bit coverage offset at `at`, resolves it against `base` and
/// decodes the coverage table.
pub(crate) fn read_coverage_at<'a>(
    data: Buffer<'a>,
    base: u32,
    at: usize,
) -> Result<Coverage<'a>, DecodeError> {
    let offset = data
        .read_u16(at)
        .ok_or_else(|| DecodeError::bounds(at, "coverage offset escapes table"))?;
    if offset == 0 {
        return Err(DecodeError::bounds(at, "null coverage offset"));
    }
    Coverage::parse(data, base + offset as u32)
}

/// Decodes an array of coverage tables referenced by 16-bit offsets from
/// `base`.
pub(crate) fn read_coverage_array<'a>(
    data: Buffer<'a>,
    base: u32,
    offsets: Slice<'a, u16>,
) -> Result<Vec<Coverage<'a>>, DecodeError> {
    let mut coverages = Vec::with_capacity(offsets.len());
    for offset in offsets.iter() {
        coverages.push(Coverage::parse(data, base + offset as u32)?);
    }
    Ok(coverages)
}

/// Reads a u16 count and enforces the specified resource ceiling.
pub(crate) fn read_count(
    data: Buffer,
    offset: usize,
    limit: usize,
    what: &str,
) -> Result<usize, DecodeError> {
    let count = data
        .read_u16(offset)
        .ok_or_else(|| DecodeError::bounds(offset, format!("{} escapes table", what)))?
        as usize;
    if count > limit {
        return Err(DecodeError::bounds(
            offset,
            format!("{} {} exceeds limit {}", what, count, limit),
        ));
    }
    Ok(count)
}
