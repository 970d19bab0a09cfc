//! Common machinery for the OpenType layout tables.

mod context;
mod lookup;
mod pos;
mod shared;
mod sub;
mod table;

pub use context::{
    ChainContext1, ChainContext2, ChainContext3, ChainRule, ChainRuleSet, ReadRule, RuleSet,
    SeqContext1, SeqContext2, SeqContext3, SeqRule, SeqRuleSet, SequenceLookup,
};
pub use lookup::{
    Extension, GdefRequirements, Lookup, LookupFlag, LookupKind, LookupList, Payload,
    SubtableNode,
};
pub use pos::{
    Anchor, AnchorMatrix, CursivePos1, EntryExitRecord, MarkArray, MarkBasePos1,
    MarkLigaturePos1, MarkMarkPos1, MarkRecord, PairPos1, PairPos2, PairSet, PairValue,
    SinglePos1, SinglePos2, Value, ValueFormat,
};
pub use shared::{ClassDef, ClassRangeRecord, Coverage, CoverageRangeRecord};
pub use sub::{
    AlternateSubst1, Ligature, LigatureSet, LigatureSubst1, MultipleSubst1, RevChainContext1,
    SingleSubst1, SingleSubst2,
};
pub use table::{Feature, FeatureList, LangSys, Script, ScriptList, TagRecord, DFLT};

use super::diag::{DecodeError, Diagnostic, DiagnosticList, Severity};
use super::font::Options;
use super::parse::Buffer;
use super::types::Tag;
use std::sync::Arc;

/// Represents the two phases of layout.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Stage {
    /// Stage where glyphs are substituted based on typographic rules.
    Substitution,
    /// Stage where glyphs are positioned based on typographic rules.
    PositionAdjustment,
}

/// Decoded layout table for a single stage.
///
/// Script, language system, feature and subtable nodes are decoded on first
/// demand and memoized; the lookup headers are decoded eagerly so their
/// flags can be scanned for glyph definition requirements.
#[derive(Debug)]
pub struct LayoutTable<'a> {
    stage: Stage,
    tag: Tag,
    data: Buffer<'a>,
    scripts: ScriptList<'a>,
    features: FeatureList<'a>,
    lookups: LookupList<'a>,
}

impl<'a> LayoutTable<'a> {
    pub(crate) fn parse(
        stage: Stage,
        tag: Tag,
        data: &'a [u8],
        options: &Options,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, Diagnostic> {
        let data = Buffer::new(data);
        let critical = |section: &'static str, err: DecodeError| {
            diags.report(tag, section, Severity::Critical, err)
        };
        let major = data
            .read_u16(0)
            .ok_or_else(|| critical("header", DecodeError::bounds(0, "table too short")))?;
        let minor = data
            .read_u16(2)
            .ok_or_else(|| critical("header", DecodeError::bounds(2, "table too short")))?;
        if major != 1 || minor > 1 {
            return Err(critical(
                "header",
                DecodeError::format(0, format!("unsupported version {}.{}", major, minor)),
            ));
        }
        let mut section_offsets = [0u32; 3];
        for (i, slot) in section_offsets.iter_mut().enumerate() {
            let at = 4 + i * 2;
            let offset = data.read_u16(at).ok_or_else(|| {
                critical("header", DecodeError::bounds(at, "table too short"))
            })? as u32;
            if offset != 0 && offset as usize >= data.len() {
                return Err(critical(
                    "header",
                    DecodeError::bounds(at, format!("section offset {} escapes table", offset)),
                ));
            }
            *slot = offset;
        }
        let [script_offset, feature_offset, lookup_offset] = section_offsets;
        if minor == 1 {
            // Version 1.1 appends a feature variations offset. The content is
            // not decoded, only bounds checked.
            let offset = data.read_u32(10).ok_or_else(|| {
                critical("header", DecodeError::bounds(10, "table too short"))
            })?;
            if offset != 0 && offset as usize >= data.len() {
                return Err(critical(
                    "header",
                    DecodeError::bounds(10, "feature variations offset escapes table"),
                ));
            }
        }
        let lookups = LookupList::parse(stage, tag, data, lookup_offset, options, diags)?;
        let features = FeatureList::parse(tag, data, feature_offset, diags)?;
        let scripts = ScriptList::parse(tag, data, script_offset, diags)?;
        Ok(Self {
            stage,
            tag,
            data,
            scripts,
            features,
            lookups,
        })
    }

    /// Returns the stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the tag of the table.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the underlying table data.
    pub fn data(&self) -> &'a [u8] {
        self.data.data()
    }

    /// Returns the script list.
    pub fn scripts(&self) -> &ScriptList<'a> {
        &self.scripts
    }

    /// Returns the script with the specified tag.
    pub fn script(&self, tag: Tag) -> Option<&Script<'a>> {
        self.scripts.find(tag)
    }

    /// Returns the feature list.
    pub fn features(&self) -> &FeatureList<'a> {
        &self.features
    }

    /// Returns the feature at the specified index.
    pub fn feature(&self, index: u16) -> Option<&Feature<'a>> {
        self.features.get(index)
    }

    /// Returns the lookup list.
    pub fn lookups(&self) -> &LookupList<'a> {
        &self.lookups
    }

    /// Returns the lookup at the specified index.
    pub fn lookup(&self, index: u16) -> Option<&Lookup<'a>> {
        self.lookups.get(index)
    }

    /// Returns the glyph definition requirements accumulated from the
    /// lookup flags.
    pub fn requirements(&self) -> GdefRequirements {
        self.lookups.requirements()
    }
}
