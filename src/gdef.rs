//! Glyph definition table.

use super::diag::{DecodeError, DiagnosticList, Severity};
use super::layout::{ClassDef, Coverage};
use super::parse::{Buffer, Slice};
use super::types::{GlyphClass, GlyphId, MarkAttachClass, Tag};
use std::sync::Arc;

/// Tag for the `GDEF` table.
pub const GDEF: Tag = Tag::new(b"GDEF");

/// Semantic glyph classes defined by the glyph class definition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GlyphClassKind {
    /// Not classified.
    Unclassified,
    /// Simple base glyph.
    Base,
    /// Ligature glyph.
    Ligature,
    /// Combining mark glyph.
    Mark,
    /// Ligature component glyph.
    Component,
}

impl From<GlyphClass> for GlyphClassKind {
    fn from(class: GlyphClass) -> Self {
        match class {
            1 => Self::Base,
            2 => Self::Ligature,
            3 => Self::Mark,
            4 => Self::Component,
            _ => Self::Unclassified,
        }
    }
}

/// Glyph definition table.
///
/// The version triplet gates which sections are present: 1.2 adds mark
/// glyph sets, 1.3 adds an item variation store whose offset is bounds
/// checked but never decoded.
#[derive(Debug)]
pub struct Gdef<'a> {
    data: Buffer<'a>,
    major: u16,
    minor: u16,
    glyph_classes: Option<ClassDef<'a>>,
    attachments: Option<AttachList<'a>>,
    lig_caret_offset: u16,
    mark_attach_classes: Option<ClassDef<'a>>,
    mark_sets: Option<MarkGlyphSets<'a>>,
}

impl<'a> Gdef<'a> {
    pub(crate) fn parse(
        data: &'a [u8],
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, DecodeError> {
        let data = Buffer::new(data);
        let major = data
            .read_u16(0)
            .ok_or_else(|| DecodeError::bounds(0, "table too short"))?;
        let minor = data
            .read_u16(2)
            .ok_or_else(|| DecodeError::bounds(2, "table too short"))?;
        if major != 1 || !matches!(minor, 0 | 2 | 3) {
            return Err(DecodeError::format(
                0,
                format!("unsupported version {}.{}", major, minor),
            ));
        }
        let section = |at: usize| -> Result<u16, DecodeError> {
            let offset = data
                .read_u16(at)
                .ok_or_else(|| DecodeError::bounds(at, "table too short"))?;
            if offset != 0 && offset as usize >= data.len() {
                return Err(DecodeError::bounds(
                    at,
                    format!("section offset {} escapes table", offset),
                ));
            }
            Ok(offset)
        };
        let glyph_classes_offset = section(4)?;
        let attach_list_offset = section(6)?;
        let lig_caret_offset = section(8)?;
        let mark_attach_offset = section(10)?;
        let mark_sets_offset = if minor >= 2 { section(12)? } else { 0 };
        if minor >= 3 {
            let offset = data
                .read_u32(14)
                .ok_or_else(|| DecodeError::bounds(14, "table too short"))?;
            if offset != 0 && offset as usize >= data.len() {
                return Err(DecodeError::bounds(
                    14,
                    "variation store offset escapes table",
                ));
            }
        }
        let mut gdef = Self {
            data,
            major,
            minor,
            glyph_classes: None,
            attachments: None,
            lig_caret_offset,
            mark_attach_classes: None,
            mark_sets: None,
        };
        if glyph_classes_offset != 0 {
            match ClassDef::parse(data, glyph_classes_offset as u32) {
                Ok(classes) => gdef.glyph_classes = Some(classes),
                Err(err) => {
                    diags.report(GDEF, "glyph class definition", Severity::Major, err);
                }
            }
        }
        if attach_list_offset != 0 {
            match AttachList::parse(data, attach_list_offset as u32) {
                Ok(list) => gdef.attachments = Some(list),
                Err(err) => {
                    diags.report(GDEF, "attachment point list", Severity::Major, err);
                }
            }
        }
        if mark_attach_offset != 0 {
            match ClassDef::parse(data, mark_attach_offset as u32) {
                Ok(classes) => gdef.mark_attach_classes = Some(classes),
                Err(err) => {
                    diags.report(GDEF, "mark attachment class definition", Severity::Major, err);
                }
            }
        }
        if mark_sets_offset != 0 {
            match MarkGlyphSets::parse(data, mark_sets_offset as u32) {
                Ok(sets) => gdef.mark_sets = Some(sets),
                Err(err) => {
                    diags.report(GDEF, "mark glyph sets", Severity::Major, err);
                }
            }
        }
        Ok(gdef)
    }

    /// Returns the (major, minor) version of the table.
    pub fn version(&self) -> (u16, u16) {
        (self.major, self.minor)
    }

    /// Returns true if glyph classes are available.
    pub fn has_glyph_classes(&self) -> bool {
        self.glyph_classes.is_some()
    }

    /// Returns the glyph class definition.
    pub fn glyph_classes(&self) -> Option<&ClassDef<'a>> {
        self.glyph_classes.as_ref()
    }

    /// Returns the class for the specified glyph.
    pub fn glyph_class(&self, glyph_id: GlyphId) -> GlyphClass {
        self.glyph_classes
            .as_ref()
            .map(|classes| classes.get(glyph_id))
            .unwrap_or(0)
    }

    /// Returns the semantic class for the specified glyph.
    pub fn glyph_class_kind(&self, glyph_id: GlyphId) -> GlyphClassKind {
        self.glyph_class(glyph_id).into()
    }

    /// Returns the attachment point list.
    pub fn attachments(&self) -> Option<&AttachList<'a>> {
        self.attachments.as_ref()
    }

    /// Returns the attachment point indices for the specified glyph.
    pub fn attach_points(&self, glyph_id: GlyphId) -> Option<Slice<'a, u16>> {
        self.attachments.as_ref()?.points(glyph_id)
    }

    /// Returns the raw ligature caret list offset. Caret values are not
    /// decoded.
    pub fn lig_caret_offset(&self) -> Option<u16> {
        if self.lig_caret_offset != 0 {
            Some(self.lig_caret_offset)
        } else {
            None
        }
    }

    /// Returns true if mark attachment classes are available.
    pub fn has_mark_attach_classes(&self) -> bool {
        self.mark_attach_classes.is_some()
    }

    /// Returns the mark attachment class definition.
    pub fn mark_attach_classes(&self) -> Option<&ClassDef<'a>> {
        self.mark_attach_classes.as_ref()
    }

    /// Returns the mark attachment class for the specified glyph.
    pub fn mark_attach_class(&self, glyph_id: GlyphId) -> MarkAttachClass {
        self.mark_attach_classes
            .as_ref()
            .map(|classes| classes.get(glyph_id))
            .unwrap_or(0)
    }

    /// Returns true if mark glyph sets are available.
    pub fn has_mark_sets(&self) -> bool {
        self.mark_sets.is_some()
    }

    /// Returns the number of mark glyph sets.
    pub fn num_mark_sets(&self) -> u16 {
        self.mark_sets
            .as_ref()
            .map(|sets| sets.len())
            .unwrap_or(0)
    }

    /// Returns the coverage for the specified mark glyph set.
    pub fn mark_set(&self, index: u16) -> Option<Coverage<'a>> {
        self.mark_sets.as_ref()?.coverage(index)
    }

    /// Returns true if the specified mark glyph set covers the glyph.
    /// Returns `None` when the set does not exist.
    pub fn mark_set_covers(&self, index: u16, glyph_id: GlyphId) -> Option<bool> {
        Some(self.mark_set(index)?.get(glyph_id).is_some())
    }
}

/// Attachment point list keyed by coverage.
#[derive(Debug)]
pub struct AttachList<'a> {
    data: Buffer<'a>,
    base: u32,
    coverage: Coverage<'a>,
    offsets: Slice<'a, u16>,
}

impl<'a> AttachList<'a> {
    fn parse(data: Buffer<'a>, base: u32) -> Result<Self, DecodeError> {
        let coverage_offset = data
            .read_u16(base as usize)
            .ok_or_else(|| DecodeError::bounds(base as usize, "attachment list too short"))?;
        if coverage_offset == 0 {
            return Err(DecodeError::bounds(
                base as usize,
                "null coverage offset in attachment list",
            ));
        }
        let coverage = Coverage::parse(data, base + coverage_offset as u32)?;
        let offsets = data
            .read_slice16::<u16>(base as usize + 2)
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 2, "attach point offsets escape table")
            })?;
        Ok(Self {
            data,
            base,
            coverage,
            offsets,
        })
    }

    /// Returns the coverage of glyphs with attachment points.
    pub fn coverage(&self) -> &Coverage<'a> {
        &self.coverage
    }

    /// Returns the contour point indices for the specified glyph.
    pub fn points(&self, glyph_id: GlyphId) -> Option<Slice<'a, u16>> {
        let index = self.coverage.get(glyph_id)?;
        let offset = self.offsets.get(index as usize)?;
        if offset == 0 {
            return None;
        }
        self.data
            .read_slice16::<u16>((self.base + offset as u32) as usize)
    }
}

/// Mark glyph sets: coverages selected by the mark filtering set index of a
/// lookup.
#[derive(Debug)]
pub struct MarkGlyphSets<'a> {
    data: Buffer<'a>,
    base: u32,
    offsets: Slice<'a, u32>,
}

impl<'a> MarkGlyphSets<'a> {
    fn parse(data: Buffer<'a>, base: u32) -> Result<Self, DecodeError> {
        let format = data
            .read_u16(base as usize)
            .ok_or_else(|| DecodeError::bounds(base as usize, "mark glyph sets too short"))?;
        if format != 1 {
            return Err(DecodeError::format(
                base as usize,
                format!("unknown mark glyph sets format {}", format),
            ));
        }
        // Mark set coverages use 32-bit offsets.
        let offsets = data
            .read_slice16::<u32>(base as usize + 2)
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 2, "mark set offsets escape table")
            })?;
        Ok(Self {
            data,
            base,
            offsets,
        })
    }

    /// Returns the number of mark glyph sets.
    pub fn len(&self) -> u16 {
        self.offsets.len() as u16
    }

    /// Returns true if there are no mark glyph sets.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the coverage for the specified set.
    pub fn coverage(&self, index: u16) -> Option<Coverage<'a>> {
        let offset = self.offsets.get(index as usize)?;
        if offset == 0 {
            return None;
        }
        Coverage::parse(self.data, self.base + offset).ok()
    }
}
