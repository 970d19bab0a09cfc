use super::Tag;
use core::ops::Range;
use zerocopy::byteorder::{BigEndian, U16, U32};
use zerocopy::{FromBytes, Unaligned};

type BeU16 = U16<BigEndian>;
type BeU32 = U32<BigEndian>;

/// Raw header of the sfnt table directory.
#[derive(Copy, Clone, FromBytes, Unaligned, Debug)]
#[repr(C)]
pub struct RawDirectoryHeader {
    /// Font signature (`OTTO`, 0x00010000 or `true`).
    pub sfnt_version: BeU32,
    /// Number of table records.
    pub num_tables: BeU16,
    /// Unused binary search acceleration field.
    pub search_range: BeU16,
    /// Unused binary search acceleration field.
    pub entry_selector: BeU16,
    /// Unused binary search acceleration field.
    pub range_shift: BeU16,
}

/// Raw 16-byte record in the sfnt table directory.
#[derive(Copy, Clone, FromBytes, Unaligned, Debug)]
#[repr(C)]
pub struct RawTableRecord {
    /// Table identifier.
    pub tag: BeU32,
    /// Checksum for the table.
    pub checksum: BeU32,
    /// Offset from the beginning of the font data.
    pub offset: BeU32,
    /// Length of the table.
    pub len: BeU32,
}

/// Record for a table in a font.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum for the table.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Length of the table.
    pub len: u32,
}

impl From<&RawTableRecord> for TableRecord {
    fn from(raw: &RawTableRecord) -> Self {
        Self {
            tag: Tag(raw.tag.get()),
            checksum: raw.checksum.get(),
            offset: raw.offset.get(),
            len: raw.len.get(),
        }
    }
}

impl TableRecord {
    /// Returns the byte range of the table in the font data.
    pub fn data_range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}
