//! Naming table.

use super::diag::DecodeError;
use super::parse::{Buffer, ReadData, Slice};
use super::types::Tag;

/// Tag for the `name` table.
pub const NAME: Tag = Tag::new(b"name");

/// Name identifier for the font family.
pub const FAMILY: u16 = 1;

/// Name identifier for the font subfamily.
pub const SUBFAMILY: u16 = 2;

/// Name identifier for the typographic family.
pub const TYPOGRAPHIC_FAMILY: u16 = 16;

/// Name identifier for the typographic subfamily.
pub const TYPOGRAPHIC_SUBFAMILY: u16 = 17;

/// Naming table.
#[derive(Copy, Clone, Debug)]
pub struct Name<'a>(Buffer<'a>);

impl<'a> Name<'a> {
    /// Creates a new naming table from a byte slice containing the table
    /// data.
    pub(crate) fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() < 6 {
            return Err(DecodeError::bounds(0, "table shorter than 6 bytes"));
        }
        Ok(Self(Buffer::new(data)))
    }

    /// Returns the version.
    pub fn version(&self) -> u16 {
        self.0.read_or_default(0)
    }

    /// Returns the list of name records.
    pub fn records(&self) -> Slice<'a, NameRecord> {
        let len = self.0.read_or_default::<u16>(2) as usize;
        self.0.read_slice(6, len).unwrap_or_default()
    }

    /// Returns the storage area for the string data.
    pub fn storage(&self) -> &'a [u8] {
        if let Some(offset) = self.0.read_offset16(4, 0) {
            self.0.data().get(offset as usize..).unwrap_or(&[])
        } else {
            &[]
        }
    }

    /// Returns the decoded string for the specified name identifier,
    /// preferring Windows and Unicode encodings over Mac Roman.
    pub fn find(&self, name_id: u16) -> Option<String> {
        let mut fallback: Option<NameRecord> = None;
        for record in self.records().iter() {
            if record.name_id != name_id {
                continue;
            }
            match (record.platform_id, record.encoding_id) {
                (3, 1) | (3, 10) | (0, _) => return self.decode_utf16(&record),
                (1, 0) => fallback = fallback.or(Some(record)),
                _ => {}
            }
        }
        let record = fallback?;
        let bytes = self.storage().get(record.storage_range())?;
        Some(bytes.iter().map(|&b| b as char).collect())
    }

    /// Returns the family name, preferring the typographic entry.
    pub fn family_name(&self) -> Option<String> {
        self.find(TYPOGRAPHIC_FAMILY).or_else(|| self.find(FAMILY))
    }

    /// Returns the subfamily name, preferring the typographic entry.
    pub fn subfamily_name(&self) -> Option<String> {
        self.find(TYPOGRAPHIC_SUBFAMILY)
            .or_else(|| self.find(SUBFAMILY))
    }

    fn decode_utf16(&self, record: &NameRecord) -> Option<String> {
        let bytes = self.storage().get(record.storage_range())?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Some(String::from_utf16_lossy(&units))
    }
}

/// Record for an entry in the naming table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NameRecord {
    /// Platform identifier.
    pub platform_id: u16,
    /// Encoding identifier.
    pub encoding_id: u16,
    /// Language identifier.
    pub language_id: u16,
    /// Name identifier.
    pub name_id: u16,
    /// Length of the string in the storage area.
    pub len: u16,
    /// Offset to the string in the storage area.
    pub offset: u16,
}

impl NameRecord {
    /// Returns the byte range for the string data in the storage area.
    pub fn storage_range(&self) -> core::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

impl ReadData for NameRecord {
    const SIZE: usize = 12;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            platform_id: u16::read_data(buf, offset)?,
            encoding_id: u16::read_data(buf, offset + 2)?,
            language_id: u16::read_data(buf, offset + 4)?,
            name_id: u16::read_data(buf, offset + 6)?,
            len: u16::read_data(buf, offset + 8)?,
            offset: u16::read_data(buf, offset + 10)?,
        })
    }
}
