//! Script, language system and feature lists.

use super::shared::read_count;
use crate::diag::{DecodeError, Diagnostic, DiagnosticList, Severity};
use crate::limits;
use crate::parse::{Buffer, Slice};
use crate::types::Tag;
use std::sync::{Arc, OnceLock};

/// Reserved tag for the default language system of a script.
pub const DFLT: Tag = Tag::new(b"DFLT");

/// Tagged record in a script or feature list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TagRecord {
    /// Tag of the referenced node.
    pub tag: Tag,
    /// Absolute offset of the node from the beginning of the layout table.
    pub offset: u32,
}

/// Ordered mapping from script tag to script.
///
/// Scripts are decoded on first demand and memoized; the record list itself
/// is validated eagerly, including the strictly ascending tag order that
/// makes the list binary searchable.
#[derive(Debug)]
pub struct ScriptList<'a> {
    data: Buffer<'a>,
    table: Tag,
    records: Vec<TagRecord>,
    cells: Vec<OnceLock<Script<'a>>>,
    diags: Arc<DiagnosticList>,
}

impl<'a> ScriptList<'a> {
    pub(crate) fn parse(
        table: Tag,
        data: Buffer<'a>,
        base: u32,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, Diagnostic> {
        const SECTION: &str = "script list";
        let mut records = Vec::new();
        if base != 0 {
            let base = base as usize;
            let count = read_count(data, base, limits::MAX_SCRIPTS, "script count")
                .map_err(|e| diags.report(table, SECTION, Severity::Critical, e))?;
            let mut prev: Option<Tag> = None;
            records.reserve(count);
            for i in 0..count {
                let record_base = base + 2 + i * 6;
                let (tag, offset) = read_tag_record(data, record_base, base as u32)
                    .map_err(|e| diags.report(table, SECTION, Severity::Critical, e))?;
                if let Some(prev) = prev {
                    if tag <= prev {
                        return Err(diags.report(
                            table,
                            SECTION,
                            Severity::Critical,
                            DecodeError::order(
                                record_base,
                                format!("script tag {} out of order after {}", tag, prev),
                            ),
                        ));
                    }
                }
                prev = Some(tag);
                records.push(TagRecord { tag, offset });
            }
        }
        let cells = records.iter().map(|_| OnceLock::new()).collect();
        Ok(Self {
            data,
            table,
            records,
            cells,
            diags: diags.clone(),
        })
    }

    /// Returns the number of scripts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the tag of the script at the specified index.
    pub fn tag(&self, index: usize) -> Option<Tag> {
        Some(self.records.get(index)?.tag)
    }

    /// Returns the script at the specified index, decoding and memoizing it
    /// on first access.
    pub fn get(&self, index: usize) -> Option<&Script<'a>> {
        let record = *self.records.get(index)?;
        Some(self.cells[index].get_or_init(|| self.decode(record)))
    }

    /// Returns the script with the specified tag, using binary search over
    /// the sorted record list.
    pub fn find(&self, tag: Tag) -> Option<&Script<'a>> {
        let index = self
            .records
            .binary_search_by(|record| record.tag.cmp(&tag))
            .ok()?;
        self.get(index)
    }

    /// Returns an iterator over the scripts in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Script<'a>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    fn decode(&self, record: TagRecord) -> Script<'a> {
        match Script::parse(self.data, record, self.table, &self.diags) {
            Ok(script) => script,
            Err(err) => {
                self.diags.report(self.table, "script", Severity::Major, err);
                Script::empty(record.tag, self.data, self.table, &self.diags)
            }
        }
    }
}

/// Script with its language systems.
///
/// The default language system, when present, is exposed under the reserved
/// [`DFLT`] tag.
#[derive(Debug)]
pub struct Script<'a> {
    /// Tag that identifies the script.
    pub tag: Tag,
    data: Buffer<'a>,
    table: Tag,
    default_record: Option<TagRecord>,
    default_cell: OnceLock<Option<LangSys<'a>>>,
    records: Vec<TagRecord>,
    cells: Vec<OnceLock<Option<LangSys<'a>>>>,
    diags: Arc<DiagnosticList>,
}

impl<'a> Script<'a> {
    fn parse(
        data: Buffer<'a>,
        record: TagRecord,
        table: Tag,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, DecodeError> {
        let base = record.offset as usize;
        let default_offset = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "script table too short"))?;
        let default_record = if default_offset != 0 {
            Some(TagRecord {
                tag: DFLT,
                offset: record.offset + default_offset as u32,
            })
        } else {
            None
        };
        let count = read_count(data, base + 2, limits::MAX_TAG_RECORDS, "language count")?;
        let mut records = Vec::with_capacity(count);
        for i in 0..count {
            let record_base = base + 4 + i * 6;
            let (tag, offset) = read_tag_record(data, record_base, record.offset)?;
            records.push(TagRecord { tag, offset });
        }
        let cells = records.iter().map(|_| OnceLock::new()).collect();
        Ok(Self {
            tag: record.tag,
            data,
            table,
            default_record,
            default_cell: OnceLock::new(),
            records,
            cells,
            diags: diags.clone(),
        })
    }

    fn empty(tag: Tag, data: Buffer<'a>, table: Tag, diags: &Arc<DiagnosticList>) -> Self {
        Self {
            tag,
            data,
            table,
            default_record: None,
            default_cell: OnceLock::new(),
            records: Vec::new(),
            cells: Vec::new(),
            diags: diags.clone(),
        }
    }

    /// Returns the default language system for the script.
    pub fn default_language_system(&self) -> Option<&LangSys<'a>> {
        let record = self.default_record?;
        self.default_cell
            .get_or_init(|| self.decode(record))
            .as_ref()
    }

    /// Returns the number of explicit language systems.
    pub fn num_language_systems(&self) -> usize {
        self.records.len()
    }

    /// Returns the language system at the specified index.
    pub fn get(&self, index: usize) -> Option<&LangSys<'a>> {
        let record = *self.records.get(index)?;
        self.cells[index].get_or_init(|| self.decode(record)).as_ref()
    }

    /// Returns the language system with the specified tag. The reserved
    /// `DFLT` tag selects the default language system.
    pub fn language_system(&self, tag: Tag) -> Option<&LangSys<'a>> {
        if tag == DFLT {
            return self.default_language_system();
        }
        let index = self.records.iter().position(|record| record.tag == tag)?;
        self.get(index)
    }

    /// Returns an iterator over the explicit language systems in
    /// declaration order.
    pub fn language_systems(&self) -> impl Iterator<Item = &LangSys<'a>> + '_ {
        (0..self.records.len()).filter_map(move |index| self.get(index))
    }

    fn decode(&self, record: TagRecord) -> Option<LangSys<'a>> {
        match LangSys::parse(self.data, record) {
            Ok(lang_sys) => Some(lang_sys),
            Err(err) => {
                self.diags
                    .report(self.table, "language system", Severity::Major, err);
                None
            }
        }
    }
}

/// Language specific feature selection within a script.
#[derive(Clone, Debug)]
pub struct LangSys<'a> {
    /// Tag that identifies the language system.
    pub tag: Tag,
    required_feature: u16,
    feature_indices: Slice<'a, u16>,
}

impl<'a> LangSys<'a> {
    const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

    fn parse(data: Buffer<'a>, record: TagRecord) -> Result<Self, DecodeError> {
        let base = record.offset as usize;
        // The lookup order offset is reserved and always null.
        let required_feature = data
            .read_u16(base + 2)
            .ok_or_else(|| DecodeError::bounds(base, "language system table too short"))?;
        let feature_indices = data
            .read_slice16::<u16>(base + 4)
            .ok_or_else(|| DecodeError::bounds(base + 4, "feature index array escapes table"))?;
        Ok(Self {
            tag: record.tag,
            required_feature,
            feature_indices,
        })
    }

    /// Returns the index of the required feature, if any.
    pub fn required_feature(&self) -> Option<u16> {
        if self.required_feature != Self::NO_REQUIRED_FEATURE {
            Some(self.required_feature)
        } else {
            None
        }
    }

    /// Returns the ordered feature indices into the owning table's feature
    /// list.
    pub fn feature_indices(&self) -> Slice<'a, u16> {
        self.feature_indices
    }
}

/// Ordered list of tagged features.
///
/// Duplicate tags are permitted; the mapping from tag to feature indices is
/// one-to-many.
#[derive(Debug)]
pub struct FeatureList<'a> {
    data: Buffer<'a>,
    table: Tag,
    records: Vec<TagRecord>,
    cells: Vec<OnceLock<Option<Feature<'a>>>>,
    diags: Arc<DiagnosticList>,
}

impl<'a> FeatureList<'a> {
    pub(crate) fn parse(
        table: Tag,
        data: Buffer<'a>,
        base: u32,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, Diagnostic> {
        const SECTION: &str = "feature list";
        let mut records = Vec::new();
        if base != 0 {
            let base = base as usize;
            let count = read_count(data, base, limits::MAX_FEATURES, "feature count")
                .map_err(|e| diags.report(table, SECTION, Severity::Critical, e))?;
            records.reserve(count);
            for i in 0..count {
                let record_base = base + 2 + i * 6;
                let (tag, offset) = read_tag_record(data, record_base, base as u32)
                    .map_err(|e| diags.report(table, SECTION, Severity::Critical, e))?;
                records.push(TagRecord { tag, offset });
            }
        }
        let cells = records.iter().map(|_| OnceLock::new()).collect();
        Ok(Self {
            data,
            table,
            records,
            cells,
            diags: diags.clone(),
        })
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the tag of the feature at the specified index.
    pub fn tag(&self, index: u16) -> Option<Tag> {
        Some(self.records.get(index as usize)?.tag)
    }

    /// Returns the feature at the specified index, decoding and memoizing it
    /// on first access.
    pub fn get(&self, index: u16) -> Option<&Feature<'a>> {
        let record = *self.records.get(index as usize)?;
        self.cells[index as usize]
            .get_or_init(|| self.decode(index, record))
            .as_ref()
    }

    /// Returns the indices of all features with the specified tag.
    pub fn indices_for_tag(&self, tag: Tag) -> Vec<u16> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.tag == tag)
            .map(|(index, _)| index as u16)
            .collect()
    }

    /// Returns an iterator over the features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature<'a>> + '_ {
        (0..self.records.len()).filter_map(move |index| self.get(index as u16))
    }

    fn decode(&self, index: u16, record: TagRecord) -> Option<Feature<'a>> {
        match Feature::parse(self.data, index, record) {
            Ok(feature) => Some(feature),
            Err(err) => {
                self.diags.report(self.table, "feature", Severity::Major, err);
                None
            }
        }
    }
}

/// Typographic feature defined as an ordered set of lookups.
#[derive(Clone, Debug)]
pub struct Feature<'a> {
    /// Tag that identifies the feature.
    pub tag: Tag,
    /// Index of the feature in the feature list.
    pub index: u16,
    params_offset: u16,
    lookup_indices: Slice<'a, u16>,
}

impl<'a> Feature<'a> {
    fn parse(data: Buffer<'a>, index: u16, record: TagRecord) -> Result<Self, DecodeError> {
        let base = record.offset as usize;
        let params_offset = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "feature table too short"))?;
        let lookup_indices = data
            .read_slice16::<u16>(base + 2)
            .ok_or_else(|| DecodeError::bounds(base + 2, "lookup index array escapes table"))?;
        Ok(Self {
            tag: record.tag,
            index,
            params_offset,
            lookup_indices,
        })
    }

    /// Returns the raw feature parameters offset, if present.
    pub fn params_offset(&self) -> Option<u16> {
        if self.params_offset != 0 {
            Some(self.params_offset)
        } else {
            None
        }
    }

    /// Returns the ordered lookup indices into the owning table's lookup
    /// list.
    pub fn lookup_indices(&self) -> Slice<'a, u16> {
        self.lookup_indices
    }
}

fn read_tag_record(data: Buffer, base: usize, list_base: u32) -> Result<(Tag, u32), DecodeError> {
    let tag = data
        .read_tag(base)
        .ok_or_else(|| DecodeError::bounds(base, "record escapes table"))?;
    let offset = data
        .read_u16(base + 4)
        .ok_or_else(|| DecodeError::bounds(base + 4, "record escapes table"))?;
    if offset == 0 {
        return Err(DecodeError::bounds(
            base + 4,
            format!("null offset in record for {}", tag),
        ));
    }
    let offset = list_base + offset as u32;
    if offset as usize >= data.len() {
        return Err(DecodeError::bounds(
            base + 4,
            format!("record offset for {} escapes table", tag),
        ));
    }
    Ok((tag, offset))
}
