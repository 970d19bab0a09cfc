//! Glyph positioning payloads.

use super::shared::{read_coverage_at, ClassDef, Coverage};
use crate::diag::DecodeError;
use crate::parse::{Buffer, Cursor, OffsetArray16, ReadData, Slice};
use crate::types::{FWord, GlyphId, MarkAttachClass};

/// Bitmask selecting the fields present in a value record.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct ValueFormat(pub u16);

impl ValueFormat {
    /// Horizontal placement delta is present.
    pub const X_PLACEMENT: u16 = 0x0001;
    /// Vertical placement delta is present.
    pub const Y_PLACEMENT: u16 = 0x0002;
    /// Horizontal advance delta is present.
    pub const X_ADVANCE: u16 = 0x0004;
    /// Vertical advance delta is present.
    pub const Y_ADVANCE: u16 = 0x0008;
    /// Horizontal placement device offset is present.
    pub const X_PLACEMENT_DEVICE: u16 = 0x0010;
    /// Vertical placement device offset is present.
    pub const Y_PLACEMENT_DEVICE: u16 = 0x0020;
    /// Horizontal advance device offset is present.
    pub const X_ADVANCE_DEVICE: u16 = 0x0040;
    /// Vertical advance device offset is present.
    pub const Y_ADVANCE_DEVICE: u16 = 0x0080;

    /// Returns the on-disk size of a value record with this format.
    pub fn size(self) -> usize {
        (self.0 & 0x00FF).count_ones() as usize * 2
    }

    fn has(self, bit: u16) -> bool {
        self.0 & bit != 0
    }
}

/// Positioning delta with fields selected by a [`ValueFormat`].
///
/// Device table offsets are stored raw and never dereferenced.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Value {
    /// Format the record was decoded with.
    pub format: ValueFormat,
    /// Horizontal placement delta in design units.
    pub x_placement: FWord,
    /// Vertical placement delta in design units.
    pub y_placement: FWord,
    /// Horizontal advance delta in design units.
    pub x_advance: FWord,
    /// Vertical advance delta in design units.
    pub y_advance: FWord,
    /// Raw offset of the horizontal placement device table.
    pub x_placement_device: u16,
    /// Raw offset of the vertical placement device table.
    pub y_placement_device: u16,
    /// Raw offset of the horizontal advance device table.
    pub x_advance_device: u16,
    /// Raw offset of the vertical advance device table.
    pub y_advance_device: u16,
}

impl Value {
    /// Reads exactly the fields enabled by the format.
    pub(crate) fn read(cursor: &mut Cursor, format: ValueFormat) -> Result<Self, DecodeError> {
        fn field(cursor: &mut Cursor, enabled: bool) -> Result<i16, DecodeError> {
            if enabled {
                cursor.read_i16().ok_or_else(|| {
                    DecodeError::bounds(cursor.offset(), "value record escapes table")
                })
            } else {
                Ok(0)
            }
        }
        let mut value = Value {
            format,
            ..Default::default()
        };
        value.x_placement = field(cursor, format.has(ValueFormat::X_PLACEMENT))?;
        value.y_placement = field(cursor, format.has(ValueFormat::Y_PLACEMENT))?;
        value.x_advance = field(cursor, format.has(ValueFormat::X_ADVANCE))?;
        value.y_advance = field(cursor, format.has(ValueFormat::Y_ADVANCE))?;
        value.x_placement_device =
            field(cursor, format.has(ValueFormat::X_PLACEMENT_DEVICE))? as u16;
        value.y_placement_device =
            field(cursor, format.has(ValueFormat::Y_PLACEMENT_DEVICE))? as u16;
        value.x_advance_device = field(cursor, format.has(ValueFormat::X_ADVANCE_DEVICE))? as u16;
        value.y_advance_device = field(cursor, format.has(ValueFormat::Y_ADVANCE_DEVICE))? as u16;
        Ok(value)
    }
}

/// Attachment point on a glyph.
///
/// Format 2 adds a contour point index; format 3 adds device table offsets
/// which are stored raw.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Anchor {
    /// On-disk format (1, 2 or 3).
    pub format: u16,
    /// Horizontal position in design units.
    pub x: FWord,
    /// Vertical position in design units.
    pub y: FWord,
    /// Contour point index for format 2.
    pub anchor_point: Option<u16>,
    /// Raw offset of the horizontal device table for format 3.
    pub x_device: u16,
    /// Raw offset of the vertical device table for format 3.
    pub y_device: u16,
}

impl Anchor {
    pub(crate) fn parse(data: Buffer, offset: u32) -> Result<Self, DecodeError> {
        let base = offset as usize;
        let format = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "anchor table too short"))?;
        let x = data
            .read_i16(base + 2)
            .ok_or_else(|| DecodeError::bounds(base + 2, "anchor table too short"))?;
        let y = data
            .read_i16(base + 4)
            .ok_or_else(|| DecodeError::bounds(base + 4, "anchor table too short"))?;
        let mut anchor = Anchor {
            format,
            x,
            y,
            ..Default::default()
        };
        match format {
            1 => {}
            2 => {
                anchor.anchor_point = Some(data.read_u16(base + 6).ok_or_else(|| {
                    DecodeError::bounds(base + 6, "anchor table too short")
                })?);
            }
            3 => {
                anchor.x_device = data
                    .read_u16(base + 6)
                    .ok_or_else(|| DecodeError::bounds(base + 6, "anchor table too short"))?;
                anchor.y_device = data
                    .read_u16(base + 8)
                    .ok_or_else(|| DecodeError::bounds(base + 8, "anchor table too short"))?;
            }
            _ => {
                return Err(DecodeError::format(
                    base,
                    format!("unknown anchor format {}", format),
                ))
            }
        }
        Ok(anchor)
    }
}

/// Single position adjustment format 1: one value applied to every covered
/// glyph.
#[derive(Copy, Clone, Debug)]
pub struct SinglePos1 {
    /// The adjustment value.
    pub value: Value,
}

impl SinglePos1 {
    pub(crate) fn parse(data: Buffer, base: u32) -> Result<(Coverage, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let format = ValueFormat(
            data.read_u16(base as usize + 4)
                .ok_or_else(|| DecodeError::bounds(base as usize + 4, "subtable too short"))?,
        );
        let mut cursor = data
            .cursor_at(base as usize + 6)
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "subtable too short"))?;
        let value = Value::read(&mut cursor, format)?;
        Ok((coverage, Self { value }))
    }
}

/// Single position adjustment format 2: one value per coverage index.
#[derive(Clone, Debug)]
pub struct SinglePos2<'a> {
    format: ValueFormat,
    values: Vec<Value>,
    _marker: core::marker::PhantomData<&'a ()>,
}

impl<'a> SinglePos2<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let format = ValueFormat(
            data.read_u16(base as usize + 4)
                .ok_or_else(|| DecodeError::bounds(base as usize + 4, "subtable too short"))?,
        );
        let count = data
            .read_u16(base as usize + 6)
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "subtable too short"))?
            as usize;
        let total = count
            .checked_mul(format.size())
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "value array size overflow"))?;
        if !data.check_range(base as usize + 8, total) {
            return Err(DecodeError::bounds(
                base as usize + 8,
                "value array escapes table",
            ));
        }
        let mut cursor = data
            .cursor_at(base as usize + 8)
            .ok_or_else(|| DecodeError::bounds(base as usize + 8, "subtable too short"))?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(Value::read(&mut cursor, format)?);
        }
        Ok((
            coverage,
            Self {
                format,
                values,
                _marker: core::marker::PhantomData,
            },
        ))
    }

    /// Returns the value format.
    pub fn value_format(&self) -> ValueFormat {
        self.format
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value for the specified coverage index.
    pub fn value(&self, coverage_index: u16) -> Option<Value> {
        self.values.get(coverage_index as usize).copied()
    }
}

/// Pair position adjustment format 1: values for explicit glyph pairs.
#[derive(Clone, Debug)]
pub struct PairPos1<'a> {
    data: Buffer<'a>,
    formats: [ValueFormat; 2],
    sets: OffsetArray16<'a>,
}

impl<'a> PairPos1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let formats = read_value_formats(data, base as usize + 4)?;
        let sets = OffsetArray16::parse(data, base, base + 8, depth).ok_or_else(|| {
            DecodeError::bounds(base as usize + 8, "pair set offsets escape table")
        })?;
        let payload = Self {
            data,
            formats,
            sets,
        };
        for index in 0..payload.sets.len() {
            let _ = payload.pair_set_checked(index)?;
        }
        Ok((coverage, payload))
    }

    /// Returns the value formats for the first and second glyph.
    pub fn value_formats(&self) -> [ValueFormat; 2] {
        self.formats
    }

    /// Returns the number of pair sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no pair sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns the pair set for the specified coverage index.
    pub fn pair_set(&self, coverage_index: u16) -> Option<PairSet<'a>> {
        self.pair_set_checked(coverage_index as usize).ok().flatten()
    }

    fn pair_set_checked(&self, index: usize) -> Result<Option<PairSet<'a>>, DecodeError> {
        if index >= self.sets.len() {
            return Ok(None);
        }
        let target = match self.sets.target(index) {
            Some(target) => target,
            None => return Ok(None),
        };
        let count = self
            .data
            .read_u16(target as usize)
            .ok_or_else(|| DecodeError::bounds(target as usize, "pair set escapes table"))?;
        let step = 2 + self.formats[0].size() + self.formats[1].size();
        let total = (count as usize)
            .checked_mul(step)
            .ok_or_else(|| DecodeError::bounds(target as usize, "pair set size overflow"))?;
        if !self.data.check_range(target as usize + 2, total) {
            return Err(DecodeError::bounds(
                target as usize + 2,
                "pair records escape table",
            ));
        }
        Ok(Some(PairSet {
            data: self.data,
            base: target,
            formats: self.formats,
            count,
        }))
    }
}

/// Set of pair value records beginning with one covered glyph, sorted by
/// the second glyph.
#[derive(Clone, Debug)]
pub struct PairSet<'a> {
    data: Buffer<'a>,
    base: u32,
    formats: [ValueFormat; 2],
    count: u16,
}

impl<'a> PairSet<'a> {
    /// Returns the number of pair value records.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the pair value record at the specified index.
    pub fn get(&self, index: usize) -> Option<PairValue> {
        if index >= self.count as usize {
            return None;
        }
        let step = 2 + self.formats[0].size() + self.formats[1].size();
        let record = self.base as usize + 2 + index * step;
        let second = self.data.read_u16(record)?;
        let mut cursor = self.data.cursor_at(record + 2)?;
        let value1 = Value::read(&mut cursor, self.formats[0]).ok()?;
        let value2 = Value::read(&mut cursor, self.formats[1]).ok()?;
        Some(PairValue {
            second,
            value1,
            value2,
        })
    }

    /// Returns the pair value record for the specified second glyph, using
    /// binary search.
    pub fn find(&self, second: GlyphId) -> Option<PairValue> {
        let step = 2 + self.formats[0].size() + self.formats[1].size();
        let mut lo = 0usize;
        let mut hi = self.count as usize;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let glyph = self.data.read_u16(self.base as usize + 2 + mid * step)?;
            use core::cmp::Ordering::*;
            match second.cmp(&glyph) {
                Less => hi = mid,
                Greater => lo = mid + 1,
                Equal => return self.get(mid),
            }
        }
        None
    }

    /// Returns an iterator over the pair value records.
    pub fn iter(&self) -> impl Iterator<Item = PairValue> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

/// Adjustment for a specific glyph pair.
#[derive(Copy, Clone, Debug)]
pub struct PairValue {
    /// The second glyph of the pair.
    pub second: GlyphId,
    /// Adjustment for the first glyph.
    pub value1: Value,
    /// Adjustment for the second glyph.
    pub value2: Value,
}

/// Pair position adjustment format 2: a class-by-class grid of values.
#[derive(Clone, Debug)]
pub struct PairPos2<'a> {
    data: Buffer<'a>,
    base: u32,
    formats: [ValueFormat; 2],
    class_defs: [ClassDef<'a>; 2],
    counts: [u16; 2],
}

impl<'a> PairPos2<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let formats = read_value_formats(data, base as usize + 4)?;
        let class_defs = [
            read_class_def(data, base, base as usize + 8)?,
            read_class_def(data, base, base as usize + 10)?,
        ];
        let count1 = data
            .read_u16(base as usize + 12)
            .ok_or_else(|| DecodeError::bounds(base as usize + 12, "subtable too short"))?;
        let count2 = data
            .read_u16(base as usize + 14)
            .ok_or_else(|| DecodeError::bounds(base as usize + 14, "subtable too short"))?;
        let step = formats[0].size() + formats[1].size();
        let total = (count1 as usize)
            .checked_mul(count2 as usize)
            .and_then(|cells| cells.checked_mul(step))
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 12, "class record grid size overflow")
            })?;
        if !data.check_range(base as usize + 16, total) {
            return Err(DecodeError::bounds(
                base as usize + 16,
                "class record grid escapes table",
            ));
        }
        Ok((
            coverage,
            Self {
                data,
                base,
                formats,
                class_defs,
                counts: [count1, count2],
            },
        ))
    }

    /// Returns the value formats for the first and second glyph.
    pub fn value_formats(&self) -> [ValueFormat; 2] {
        self.formats
    }

    /// Returns the number of classes for the first and second glyph.
    pub fn class_counts(&self) -> [u16; 2] {
        self.counts
    }

    /// Returns the class definitions for the first and second glyph.
    pub fn class_defs(&self) -> [&ClassDef<'a>; 2] {
        [&self.class_defs[0], &self.class_defs[1]]
    }

    /// Returns the adjustments for the specified class pair.
    pub fn get(&self, class1: u16, class2: u16) -> Option<(Value, Value)> {
        if class1 >= self.counts[0] || class2 >= self.counts[1] {
            return None;
        }
        let step = self.formats[0].size() + self.formats[1].size();
        let index = class1 as usize * self.counts[1] as usize + class2 as usize;
        let record = self.base as usize + 16 + index * step;
        let mut cursor = self.data.cursor_at(record)?;
        let value1 = Value::read(&mut cursor, self.formats[0]).ok()?;
        let value2 = Value::read(&mut cursor, self.formats[1]).ok()?;
        Some((value1, value2))
    }

    /// Returns the adjustments for the specified glyph pair.
    pub fn get_by_glyphs(&self, first: GlyphId, second: GlyphId) -> Option<(Value, Value)> {
        let class1 = self.class_defs[0].get(first);
        let class2 = self.class_defs[1].get(second);
        self.get(class1, class2)
    }
}

/// Cursive attachment format 1: entry and exit anchors per covered glyph.
#[derive(Clone, Debug)]
pub struct CursivePos1<'a> {
    data: Buffer<'a>,
    base: u32,
    records: Slice<'a, EntryExitRecord>,
}

/// Raw entry and exit anchor offsets for one covered glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EntryExitRecord {
    /// Offset of the entry anchor from the subtable, or zero.
    pub entry_offset: u16,
    /// Offset of the exit anchor from the subtable, or zero.
    pub exit_offset: u16,
}

impl ReadData for EntryExitRecord {
    const SIZE: usize = 4;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            entry_offset: u16::read_data(buf, offset)?,
            exit_offset: u16::read_data(buf, offset + 2)?,
        })
    }
}

impl<'a> CursivePos1<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let records = data
            .read_slice16::<EntryExitRecord>(base as usize + 4)
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 4, "entry exit records escape table")
            })?;
        Ok((
            coverage,
            Self {
                data,
                base,
                records,
            },
        ))
    }

    /// Returns the number of entry/exit records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the raw record for the specified coverage index.
    pub fn record(&self, coverage_index: u16) -> Option<EntryExitRecord> {
        self.records.get(coverage_index as usize)
    }

    /// Resolves the entry and exit anchors for the specified coverage
    /// index. Either anchor may be absent.
    pub fn entry_exit(&self, coverage_index: u16) -> Option<(Option<Anchor>, Option<Anchor>)> {
        let record = self.record(coverage_index)?;
        Some((
            self.resolve(record.entry_offset),
            self.resolve(record.exit_offset),
        ))
    }

    fn resolve(&self, offset: u16) -> Option<Anchor> {
        if offset == 0 {
            return None;
        }
        Anchor::parse(self.data, self.base + offset as u32).ok()
    }
}

/// Array of (class, anchor offset) records for mark glyphs.
#[derive(Clone, Debug)]
pub struct MarkArray<'a> {
    data: Buffer<'a>,
    base: u32,
    records: Slice<'a, MarkRecord>,
}

/// Record for one mark glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MarkRecord {
    /// Mark class of the glyph.
    pub class: MarkAttachClass,
    /// Offset of the mark anchor from the mark array.
    pub anchor_offset: u16,
}

impl ReadData for MarkRecord {
    const SIZE: usize = 4;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            class: u16::read_data(buf, offset)?,
            anchor_offset: u16::read_data(buf, offset + 2)?,
        })
    }
}

impl<'a> MarkArray<'a> {
    fn parse(data: Buffer<'a>, base: u32, class_count: u16) -> Result<Self, DecodeError> {
        let records = data
            .read_slice16::<MarkRecord>(base as usize)
            .ok_or_else(|| DecodeError::bounds(base as usize, "mark records escape table"))?;
        for (index, record) in records.iter().enumerate() {
            if record.class >= class_count {
                return Err(DecodeError::format(
                    base as usize + 2 + index * MarkRecord::SIZE,
                    format!(
                        "mark class {} out of range for {} classes",
                        record.class, class_count
                    ),
                ));
            }
        }
        Ok(Self {
            data,
            base,
            records,
        })
    }

    /// Returns the number of mark records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no mark records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the raw record at the specified index.
    pub fn record(&self, index: u16) -> Option<MarkRecord> {
        self.records.get(index as usize)
    }

    /// Resolves the class and anchor for the specified index.
    pub fn anchor(&self, index: u16) -> Option<(MarkAttachClass, Anchor)> {
        let record = self.record(index)?;
        if record.anchor_offset == 0 {
            return None;
        }
        let anchor = Anchor::parse(self.data, self.base + record.anchor_offset as u32).ok()?;
        Some((record.class, anchor))
    }
}

/// Row-major matrix of anchor offsets keyed by (row, mark class).
#[derive(Clone, Debug)]
pub struct AnchorMatrix<'a> {
    data: Buffer<'a>,
    base: u32,
    rows: u16,
    cols: u16,
    offsets: Slice<'a, u16>,
}

impl<'a> AnchorMatrix<'a> {
    fn parse(data: Buffer<'a>, base: u32, cols: u16) -> Result<Self, DecodeError> {
        let rows = data
            .read_u16(base as usize)
            .ok_or_else(|| DecodeError::bounds(base as usize, "anchor matrix escapes table"))?;
        let cells = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| DecodeError::bounds(base as usize, "anchor matrix size overflow"))?;
        let offsets = data
            .read_slice::<u16>(base as usize + 2, cells)
            .ok_or_else(|| DecodeError::bounds(base as usize + 2, "anchor matrix escapes table"))?;
        Ok(Self {
            data,
            base,
            rows,
            cols,
            offsets,
        })
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Returns the number of columns (mark classes).
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Returns the raw anchor offset for the specified cell, or `None` for
    /// a null cell.
    pub fn offset(&self, row: u16, col: u16) -> Option<u16> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let offset = self
            .offsets
            .get(row as usize * self.cols as usize + col as usize)?;
        if offset != 0 {
            Some(offset)
        } else {
            None
        }
    }

    /// Resolves the anchor for the specified cell.
    pub fn anchor(&self, row: u16, col: u16) -> Option<Anchor> {
        let offset = self.offset(row, col)?;
        Anchor::parse(self.data, self.base + offset as u32).ok()
    }
}

/// Mark to base attachment format 1.
#[derive(Clone, Debug)]
pub struct MarkBasePos1<'a> {
    /// Coverage for base glyphs. The mark coverage is the node coverage.
    pub base_coverage: Coverage<'a>,
    mark_class_count: u16,
    marks: MarkArray<'a>,
    bases: AnchorMatrix<'a>,
}

impl<'a> MarkBasePos1<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let mark_coverage = read_coverage_at(data, base, base as usize + 2)?;
        let base_coverage = read_coverage_at(data, base, base as usize + 4)?;
        let mark_class_count = data
            .read_u16(base as usize + 6)
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "subtable too short"))?;
        let marks_base = data
            .read_offset16(base as usize + 8, base)
            .ok_or_else(|| DecodeError::bounds(base as usize + 8, "null mark array offset"))?;
        let bases_base = data
            .read_offset16(base as usize + 10, base)
            .ok_or_else(|| DecodeError::bounds(base as usize + 10, "null base array offset"))?;
        let marks = MarkArray::parse(data, marks_base, mark_class_count)?;
        let bases = AnchorMatrix::parse(data, bases_base, mark_class_count)?;
        Ok((
            mark_coverage,
            Self {
                base_coverage,
                mark_class_count,
                marks,
                bases,
            },
        ))
    }

    /// Returns the number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// Returns the mark array.
    pub fn marks(&self) -> &MarkArray<'a> {
        &self.marks
    }

    /// Returns the base anchor matrix.
    pub fn bases(&self) -> &AnchorMatrix<'a> {
        &self.bases
    }

    /// Resolves the class and anchor for the specified mark coverage index.
    pub fn mark_anchor(&self, mark_index: u16) -> Option<(MarkAttachClass, Anchor)> {
        self.marks.anchor(mark_index)
    }

    /// Resolves the base anchor for the specified base coverage index and
    /// mark class.
    pub fn base_anchor(&self, base_index: u16, mark_class: MarkAttachClass) -> Option<Anchor> {
        self.bases.anchor(base_index, mark_class)
    }

    /// Resolves the (base, mark) anchor pair for an attachment.
    pub fn anchor_pair(&self, base_index: u16, mark_index: u16) -> Option<(Anchor, Anchor)> {
        let (class, mark_anchor) = self.mark_anchor(mark_index)?;
        let base_anchor = self.base_anchor(base_index, class)?;
        Some((base_anchor, mark_anchor))
    }
}

/// Mark to ligature attachment format 1.
#[derive(Clone, Debug)]
pub struct MarkLigaturePos1<'a> {
    /// Coverage for ligature glyphs. The mark coverage is the node
    /// coverage.
    pub ligature_coverage: Coverage<'a>,
    data: Buffer<'a>,
    mark_class_count: u16,
    marks: MarkArray<'a>,
    ligatures: OffsetArray16<'a>,
}

impl<'a> MarkLigaturePos1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let mark_coverage = read_coverage_at(data, base, base as usize + 2)?;
        let ligature_coverage = read_coverage_at(data, base, base as usize + 4)?;
        let mark_class_count = data
            .read_u16(base as usize + 6)
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "subtable too short"))?;
        let marks_base = data
            .read_offset16(base as usize + 8, base)
            .ok_or_else(|| DecodeError::bounds(base as usize + 8, "null mark array offset"))?;
        let ligatures_base = data
            .read_offset16(base as usize + 10, base)
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 10, "null ligature array offset")
            })?;
        let marks = MarkArray::parse(data, marks_base, mark_class_count)?;
        let ligatures = OffsetArray16::parse(data, ligatures_base, ligatures_base, depth)
            .ok_or_else(|| {
                DecodeError::bounds(ligatures_base as usize, "ligature attach offsets escape table")
            })?;
        let payload = Self {
            ligature_coverage,
            data,
            mark_class_count,
            marks,
            ligatures,
        };
        for index in 0..payload.ligatures.len() {
            let _ = payload.attach_checked(index)?;
        }
        Ok((mark_coverage, payload))
    }

    /// Returns the number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// Returns the mark array.
    pub fn marks(&self) -> &MarkArray<'a> {
        &self.marks
    }

    /// Returns the number of ligature attach tables.
    pub fn len(&self) -> usize {
        self.ligatures.len()
    }

    /// Returns true if there are no ligature attach tables.
    pub fn is_empty(&self) -> bool {
        self.ligatures.is_empty()
    }

    /// Returns the number of components for the ligature at the specified
    /// coverage index.
    pub fn component_count(&self, ligature_index: u16) -> Option<u16> {
        Some(self.attach(ligature_index)?.rows())
    }

    /// Returns the component anchor matrix for the ligature at the
    /// specified coverage index. Rows are components, columns are mark
    /// classes.
    pub fn attach(&self, ligature_index: u16) -> Option<AnchorMatrix<'a>> {
        self.attach_checked(ligature_index as usize).ok().flatten()
    }

    /// Resolves the class and anchor for the specified mark coverage index.
    pub fn mark_anchor(&self, mark_index: u16) -> Option<(MarkAttachClass, Anchor)> {
        self.marks.anchor(mark_index)
    }

    /// Resolves the component anchor for the specified ligature coverage
    /// index, component and mark class.
    pub fn component_anchor(
        &self,
        ligature_index: u16,
        component_index: u16,
        mark_class: MarkAttachClass,
    ) -> Option<Anchor> {
        self.attach(ligature_index)?.anchor(component_index, mark_class)
    }

    fn attach_checked(&self, index: usize) -> Result<Option<AnchorMatrix<'a>>, DecodeError> {
        if index >= self.ligatures.len() {
            return Ok(None);
        }
        let target = match self.ligatures.target(index) {
            Some(target) => target,
            None => return Ok(None),
        };
        AnchorMatrix::parse(self.data, target, self.mark_class_count).map(Some)
    }
}

/// Mark to mark attachment format 1.
#[derive(Clone, Debug)]
pub struct MarkMarkPos1<'a> {
    /// Coverage for the second (base) marks. The first mark coverage is
    /// the node coverage.
    pub mark2_coverage: Coverage<'a>,
    mark_class_count: u16,
    mark1: MarkArray<'a>,
    mark2: AnchorMatrix<'a>,
}

impl<'a> MarkMarkPos1<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let mark1_coverage = read_coverage_at(data, base, base as usize + 2)?;
        let mark2_coverage = read_coverage_at(data, base, base as usize + 4)?;
        let mark_class_count = data
            .read_u16(base as usize + 6)
            .ok_or_else(|| DecodeError::bounds(base as usize + 6, "subtable too short"))?;
        let mark1_base = data
            .read_offset16(base as usize + 8, base)
            .ok_or_else(|| DecodeError::bounds(base as usize + 8, "null mark1 array offset"))?;
        let mark2_base = data
            .read_offset16(base as usize + 10, base)
            .ok_or_else(|| DecodeError::bounds(base as usize + 10, "null mark2 array offset"))?;
        let mark1 = MarkArray::parse(data, mark1_base, mark_class_count)?;
        let mark2 = AnchorMatrix::parse(data, mark2_base, mark_class_count)?;
        Ok((
            mark1_coverage,
            Self {
                mark2_coverage,
                mark_class_count,
                mark1,
                mark2,
            },
        ))
    }

    /// Returns the number of mark classes.
    pub fn mark_class_count(&self) -> u16 {
        self.mark_class_count
    }

    /// Returns the array for the attaching marks.
    pub fn mark1(&self) -> &MarkArray<'a> {
        &self.mark1
    }

    /// Returns the anchor matrix for the base marks.
    pub fn mark2(&self) -> &AnchorMatrix<'a> {
        &self.mark2
    }

    /// Resolves the class and anchor for the specified mark1 coverage
    /// index.
    pub fn mark_anchor(&self, mark_index: u16) -> Option<(MarkAttachClass, Anchor)> {
        self.mark1.anchor(mark_index)
    }

    /// Resolves the base anchor for the specified mark2 coverage index and
    /// mark class.
    pub fn base_anchor(&self, mark2_index: u16, mark_class: MarkAttachClass) -> Option<Anchor> {
        self.mark2.anchor(mark2_index, mark_class)
    }
}

fn read_value_formats(data: Buffer, at: usize) -> Result<[ValueFormat; 2], DecodeError> {
    Ok([
        ValueFormat(
            data.read_u16(at)
                .ok_or_else(|| DecodeError::bounds(at, "subtable too short"))?,
        ),
        ValueFormat(
            data.read_u16(at + 2)
                .ok_or_else(|| DecodeError::bounds(at + 2, "subtable too short"))?,
        ),
    ])
}

fn read_class_def<'a>(
    data: Buffer<'a>,
    base: u32,
    at: usize,
) -> Result<ClassDef<'a>, DecodeError> {
    let offset = data
        .read_u16(at)
        .ok_or_else(|| DecodeError::bounds(at, "subtable too short"))?;
    if offset == 0 {
        return Ok(ClassDef::empty());
    }
    ClassDef::parse(data, base + offset as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_format_size() {
        assert_eq!(ValueFormat(0).size(), 0);
        assert_eq!(ValueFormat(ValueFormat::X_ADVANCE).size(), 2);
        assert_eq!(
            ValueFormat(ValueFormat::X_PLACEMENT | ValueFormat::Y_PLACEMENT).size(),
            4
        );
        assert_eq!(ValueFormat(0x00FF).size(), 16);
        // Reserved high bits do not contribute to the size.
        assert_eq!(ValueFormat(0xFF00 | ValueFormat::X_ADVANCE).size(), 2);
    }

    #[test]
    fn value_reads_only_enabled_fields() {
        let data = [0x00, 0x05, 0xFF, 0xFE];
        let mut cursor = Cursor::new(&data);
        let format = ValueFormat(ValueFormat::X_PLACEMENT | ValueFormat::X_ADVANCE);
        let value = Value::read(&mut cursor, format).unwrap();
        assert_eq!(value.x_placement, 5);
        assert_eq!(value.x_advance, -2);
        assert_eq!(value.y_placement, 0);
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn anchor_formats() {
        let f1 = [0x00, 0x01, 0x00, 0x0A, 0xFF, 0xF6];
        let anchor = Anchor::parse(Buffer::new(&f1), 0).unwrap();
        assert_eq!((anchor.x, anchor.y), (10, -10));
        assert_eq!(anchor.anchor_point, None);

        let f2 = [0x00, 0x02, 0x00, 0x01, 0x00, 0x02, 0x00, 0x07];
        let anchor = Anchor::parse(Buffer::new(&f2), 0).unwrap();
        assert_eq!(anchor.anchor_point, Some(7));

        let f4 = [0x00, 0x04, 0x00, 0x00, 0x00, 0x00];
        assert!(Anchor::parse(Buffer::new(&f4), 0).is_err());
    }
}
