//! Lookup list, subtable dispatch and extension resolution.

use super::context::{ChainContext1, ChainContext2, ChainContext3, SeqContext1, SeqContext2, SeqContext3};
use super::pos::{
    CursivePos1, MarkBasePos1, MarkLigaturePos1, MarkMarkPos1, PairPos1, PairPos2, SinglePos1,
    SinglePos2,
};
use super::shared::Coverage;
use super::sub::{
    AlternateSubst1, LigatureSubst1, MultipleSubst1, RevChainContext1, SingleSubst1, SingleSubst2,
};
use super::Stage;
use crate::diag::{DecodeError, Diagnostic, DiagnosticList, Severity};
use crate::font::Options;
use crate::limits;
use crate::parse::Buffer;
use crate::types::Tag;
use std::sync::{Arc, OnceLock};

/// Kind of a lookup.
///
/// Substitution and positioning kinds share one namespace so that a resolved
/// extension subtable can be dispatched without tracking its source table;
/// [`raw`](Self::raw) keeps substitution kinds in the low byte and
/// positioning kinds in the high byte.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LookupKind {
    /// One to one substitution.
    SingleSubst,
    /// One to many substitution.
    MultipleSubst,
    /// One to one substitution from a list of candidates.
    AlternateSubst,
    /// Many to one substitution.
    LigatureSubst,
    /// Contextual substitution.
    ContextSubst,
    /// Contextual substitution with backtrack and/or lookahead sequences.
    ChainContextSubst,
    /// Extension wrapper for substitution subtables.
    ExtensionSubst,
    /// Contextual substitution in reverse logical order.
    RevChainContextSubst,
    /// Single position adjustment.
    SinglePos,
    /// Position adjustment between a pair.
    PairPos,
    /// Cursive attachment.
    CursivePos,
    /// Mark to base attachment.
    MarkBasePos,
    /// Mark to ligature component attachment.
    MarkLigaturePos,
    /// Mark to mark attachment.
    MarkMarkPos,
    /// Contextual positioning.
    ContextPos,
    /// Contextual positioning with backtrack and/or lookahead sequences.
    ChainContextPos,
    /// Extension wrapper for positioning subtables.
    ExtensionPos,
}

impl LookupKind {
    /// Maps an on-disk lookup type for the specified stage.
    pub fn from_raw(stage: Stage, raw: u16) -> Option<Self> {
        use LookupKind::*;
        Some(match stage {
            Stage::Substitution => match raw {
                1 => SingleSubst,
                2 => MultipleSubst,
                3 => AlternateSubst,
                4 => LigatureSubst,
                5 => ContextSubst,
                6 => ChainContextSubst,
                7 => ExtensionSubst,
                8 => RevChainContextSubst,
                _ => return None,
            },
            Stage::PositionAdjustment => match raw {
                1 => SinglePos,
                2 => PairPos,
                3 => CursivePos,
                4 => MarkBasePos,
                5 => MarkLigaturePos,
                6 => MarkMarkPos,
                7 => ContextPos,
                8 => ChainContextPos,
                9 => ExtensionPos,
                _ => return None,
            },
        })
    }

    /// Returns the kind in a single 16-bit namespace: substitution kinds in
    /// the low byte, positioning kinds shifted into the high byte.
    pub fn raw(self) -> u16 {
        use LookupKind::*;
        match self {
            SingleSubst => 1,
            MultipleSubst => 2,
            AlternateSubst => 3,
            LigatureSubst => 4,
            ContextSubst => 5,
            ChainContextSubst => 6,
            ExtensionSubst => 7,
            RevChainContextSubst => 8,
            SinglePos => 1 << 8,
            PairPos => 2 << 8,
            CursivePos => 3 << 8,
            MarkBasePos => 4 << 8,
            MarkLigaturePos => 5 << 8,
            MarkMarkPos => 6 << 8,
            ContextPos => 7 << 8,
            ChainContextPos => 8 << 8,
            ExtensionPos => 9 << 8,
        }
    }

    /// Returns the stage the kind belongs to.
    pub fn stage(self) -> Stage {
        use LookupKind::*;
        match self {
            SingleSubst | MultipleSubst | AlternateSubst | LigatureSubst | ContextSubst
            | ChainContextSubst | ExtensionSubst | RevChainContextSubst => Stage::Substitution,
            _ => Stage::PositionAdjustment,
        }
    }

    /// Returns true for the extension wrapper kinds.
    pub fn is_extension(self) -> bool {
        matches!(self, Self::ExtensionSubst | Self::ExtensionPos)
    }
}

/// Lookup qualifiers.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct LookupFlag(pub u16);

impl LookupFlag {
    /// Cursive attachments are processed in right-to-left order.
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    /// Base glyphs are skipped.
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    /// Ligature glyphs are skipped.
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    /// Mark glyphs are skipped.
    pub const IGNORE_MARKS: u16 = 0x0008;
    /// A mark filtering set index follows the subtable offsets.
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
    /// Mark attachment class filter in the high byte.
    pub const MARK_ATTACHMENT_TYPE_MASK: u16 = 0xFF00;

    /// Returns true if cursive attachments should be processed in
    /// right-to-left order.
    pub fn is_rtl(self) -> bool {
        self.0 & Self::RIGHT_TO_LEFT != 0
    }

    /// Returns true if base glyphs should be ignored.
    pub fn ignore_base_glyphs(self) -> bool {
        self.0 & Self::IGNORE_BASE_GLYPHS != 0
    }

    /// Returns true if ligatures should be ignored.
    pub fn ignore_ligatures(self) -> bool {
        self.0 & Self::IGNORE_LIGATURES != 0
    }

    /// Returns true if marks should be ignored.
    pub fn ignore_marks(self) -> bool {
        self.0 & Self::IGNORE_MARKS != 0
    }

    /// Returns true if a mark filtering set should be used.
    pub fn use_mark_filtering_set(self) -> bool {
        self.0 & Self::USE_MARK_FILTERING_SET != 0
    }

    /// Returns the mark attachment class filter, if any.
    pub fn mark_attachment_class(self) -> Option<u16> {
        let class = (self.0 & Self::MARK_ATTACHMENT_TYPE_MASK) >> 8;
        if class != 0 {
            Some(class)
        } else {
            None
        }
    }
}

/// Glyph definition sections required by the lookup flags of a layout
/// table.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct GdefRequirements {
    /// A flag selects base, ligature or mark glyphs.
    pub glyph_classes: bool,
    /// A flag carries a mark attachment class filter.
    pub mark_attach_classes: bool,
    /// A flag selects a mark filtering set.
    pub mark_sets: bool,
}

impl GdefRequirements {
    pub(crate) fn accumulate(&mut self, flag: LookupFlag) {
        if flag.ignore_base_glyphs() || flag.ignore_ligatures() || flag.ignore_marks() {
            self.glyph_classes = true;
        }
        if flag.mark_attachment_class().is_some() {
            self.mark_attach_classes = true;
        }
        if flag.use_mark_filtering_set() {
            self.mark_sets = true;
        }
    }

    /// Returns the union of two requirement sets.
    pub fn union(self, other: Self) -> Self {
        Self {
            glyph_classes: self.glyph_classes || other.glyph_classes,
            mark_attach_classes: self.mark_attach_classes || other.mark_attach_classes,
            mark_sets: self.mark_sets || other.mark_sets,
        }
    }

    /// Returns true if any section is required.
    pub fn any(self) -> bool {
        self.glyph_classes || self.mark_attach_classes || self.mark_sets
    }
}

/// Ordered list of lookups.
#[derive(Debug)]
pub struct LookupList<'a> {
    lookups: Vec<Lookup<'a>>,
    requirements: GdefRequirements,
}

impl<'a> LookupList<'a> {
    pub(crate) fn parse(
        stage: Stage,
        table: Tag,
        data: Buffer<'a>,
        base: u32,
        options: &Options,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, Diagnostic> {
        const SECTION: &str = "lookup list";
        let mut lookups = Vec::new();
        let mut requirements = GdefRequirements::default();
        if base != 0 {
            let offsets = data.read_slice16::<u16>(base as usize).ok_or_else(|| {
                diags.report(
                    table,
                    SECTION,
                    Severity::Critical,
                    DecodeError::bounds(base as usize, "lookup offset array escapes table"),
                )
            })?;
            if offsets.len() > limits::MAX_LOOKUPS {
                return Err(diags.report(
                    table,
                    SECTION,
                    Severity::Critical,
                    DecodeError::bounds(
                        base as usize,
                        format!(
                            "lookup count {} exceeds limit {}",
                            offsets.len(),
                            limits::MAX_LOOKUPS
                        ),
                    ),
                ));
            }
            lookups.reserve(offsets.len());
            for (index, offset) in offsets.iter().enumerate() {
                let lookup = Lookup::parse(
                    stage,
                    table,
                    data,
                    index as u16,
                    base + offset as u32,
                    options,
                    diags,
                )
                .map_err(|e| diags.report(table, SECTION, Severity::Critical, e))?;
                requirements.accumulate(lookup.flag);
                lookups.push(lookup);
            }
        }
        Ok(Self {
            lookups,
            requirements,
        })
    }

    /// Returns the number of lookups.
    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Returns the lookup at the specified index.
    pub fn get(&self, index: u16) -> Option<&Lookup<'a>> {
        self.lookups.get(index as usize)
    }

    /// Returns an iterator over the lookups in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Lookup<'a>> + '_ {
        self.lookups.iter()
    }

    /// Returns the glyph definition requirements accumulated from the
    /// lookup flags.
    pub fn requirements(&self) -> GdefRequirements {
        self.requirements
    }
}

/// Eagerly resolved location of a subtable, after extension indirection.
#[derive(Clone, Debug)]
struct SubtableRecord {
    /// Offset of the subtable from the beginning of the layout table.
    offset: u32,
    /// Resolved kind and offset, or the diagnostic that invalidated the
    /// subtable.
    resolved: Result<(LookupKind, u32), Diagnostic>,
}

/// Single lookup with eagerly decoded header and lazily decoded subtables.
#[derive(Debug)]
pub struct Lookup<'a> {
    /// Index of the lookup in the lookup list.
    pub index: u16,
    /// Stage that contains the lookup.
    pub stage: Stage,
    /// Kind of the lookup.
    pub kind: LookupKind,
    /// Lookup qualifiers.
    pub flag: LookupFlag,
    /// Mark filtering set index, present when the flag selects one.
    pub mark_filtering_set: Option<u16>,
    table: Tag,
    data: Buffer<'a>,
    offset: u32,
    subtables: Vec<SubtableRecord>,
    cells: Vec<OnceLock<SubtableNode<'a>>>,
    diags: Arc<DiagnosticList>,
    nesting_depth: u8,
}

impl<'a> Lookup<'a> {
    fn parse(
        stage: Stage,
        table: Tag,
        data: Buffer<'a>,
        index: u16,
        offset: u32,
        options: &Options,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, DecodeError> {
        let base = offset as usize;
        if base >= data.len() {
            return Err(DecodeError::bounds(
                base,
                format!("lookup {} offset escapes table", index),
            ));
        }
        let raw_kind = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "lookup header too short"))?;
        let kind = LookupKind::from_raw(stage, raw_kind).ok_or_else(|| {
            DecodeError::format(base, format!("unknown lookup type {}", raw_kind))
        })?;
        let flag = LookupFlag(
            data.read_u16(base + 2)
                .ok_or_else(|| DecodeError::bounds(base + 2, "lookup header too short"))?,
        );
        let offsets = data
            .read_slice16::<u16>(base + 4)
            .ok_or_else(|| DecodeError::bounds(base + 4, "subtable offsets escape table"))?;
        let mark_filtering_set = if flag.use_mark_filtering_set() {
            let at = base + 6 + offsets.len() * 2;
            Some(
                data.read_u16(at)
                    .ok_or_else(|| DecodeError::bounds(at, "mark filtering set escapes table"))?,
            )
        } else {
            None
        };
        let mut subtables = Vec::with_capacity(offsets.len());
        for (sub_index, sub_offset) in offsets.iter().enumerate() {
            let resolved = if sub_offset == 0 {
                // Null subtable offsets occur in shipped fonts; treat the
                // subtable as absent rather than rejecting the lookup.
                Err(diags.report(
                    table,
                    "subtable",
                    Severity::Minor,
                    DecodeError::bounds(
                        base + 6 + sub_index * 2,
                        format!("lookup {} subtable {} has null offset", index, sub_index),
                    ),
                ))
            } else {
                let target = offset + sub_offset as u32;
                resolve_subtable(stage, data, kind, target, options.max_extension_depth)
                    .map_err(|e| diags.report(table, "subtable", Severity::Major, e))
            };
            subtables.push(SubtableRecord {
                offset: offset + sub_offset as u32,
                resolved,
            });
        }
        let cells = subtables.iter().map(|_| OnceLock::new()).collect();
        Ok(Self {
            index,
            stage,
            kind,
            flag,
            mark_filtering_set,
            table,
            data,
            offset,
            subtables,
            cells,
            diags: diags.clone(),
            nesting_depth: options.max_nesting_depth,
        })
    }

    /// Returns the offset of the lookup from the beginning of the layout
    /// table.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the number of subtables.
    pub fn num_subtables(&self) -> usize {
        self.subtables.len()
    }

    /// Returns the raw offset of the specified subtable from the beginning
    /// of the layout table.
    pub fn subtable_offset(&self, index: usize) -> Option<u32> {
        Some(self.subtables.get(index)?.offset)
    }

    /// Returns the subtable at the specified index, decoding and memoizing
    /// it on first access.
    pub fn subtable(&self, index: usize) -> Option<&SubtableNode<'a>> {
        if index >= self.subtables.len() {
            return None;
        }
        Some(self.cells[index].get_or_init(|| self.decode_subtable(index)))
    }

    /// Returns an iterator over the subtables in declaration order.
    pub fn subtables(&self) -> impl Iterator<Item = &SubtableNode<'a>> + '_ {
        (0..self.subtables.len()).filter_map(move |index| self.subtable(index))
    }

    fn decode_subtable(&self, index: usize) -> SubtableNode<'a> {
        let record = &self.subtables[index];
        let (kind, offset) = match &record.resolved {
            Ok(resolved) => *resolved,
            Err(diagnostic) => return SubtableNode::failed(self.kind, diagnostic.clone()),
        };
        match decode_payload(self.data, kind, offset, self.nesting_depth) {
            Ok((format, coverage, payload)) => {
                if self.kind.is_extension() {
                    let inner = SubtableNode {
                        kind,
                        format,
                        coverage: coverage.clone(),
                        payload,
                        error: None,
                    };
                    SubtableNode {
                        kind: self.kind,
                        format: 1,
                        // The extension node mirrors the resolved coverage so
                        // callers can filter glyphs without unwrapping.
                        coverage,
                        payload: Payload::Extension(Extension {
                            resolved: Box::new(inner),
                        }),
                        error: None,
                    }
                } else {
                    SubtableNode {
                        kind,
                        format,
                        coverage,
                        payload,
                        error: None,
                    }
                }
            }
            Err(err) => {
                let diagnostic = self
                    .diags
                    .report(self.table, "subtable", Severity::Major, err);
                SubtableNode::failed(self.kind, diagnostic)
            }
        }
    }
}

/// Decoded subtable with its tagged payload.
#[derive(Clone, Debug)]
pub struct SubtableNode<'a> {
    /// Kind of the owning lookup. For a resolved extension payload, the
    /// inner node carries the wrapped kind.
    pub kind: LookupKind,
    /// On-disk format of the subtable.
    pub format: u16,
    /// Primary coverage. Absent for format 3 contextual subtables and
    /// failed decodes; an extension node mirrors the resolved coverage.
    pub coverage: Option<Coverage<'a>>,
    /// Payload for the (kind, format) combination.
    pub payload: Payload<'a>,
    /// Diagnostic that invalidated the subtable, if any.
    pub error: Option<Diagnostic>,
}

impl<'a> SubtableNode<'a> {
    fn failed(kind: LookupKind, error: Diagnostic) -> Self {
        Self {
            kind,
            format: 0,
            coverage: None,
            payload: Payload::None,
            error: Some(error),
        }
    }
}

/// Extension payload wrapping a resolved subtable.
#[derive(Clone, Debug)]
pub struct Extension<'a> {
    /// The fully decoded wrapped subtable.
    pub resolved: Box<SubtableNode<'a>>,
}

/// Tagged payload for every (lookup kind, format) combination.
///
/// Exactly one variant is produced for any successfully decoded subtable;
/// a failed decode yields [`Payload::None`] with the node's error field
/// set.
#[derive(Clone, Debug)]
pub enum Payload<'a> {
    /// Decode failed; see the node's error field.
    None,
    /// Single substitution format 1.
    SingleSubst1(SingleSubst1),
    /// Single substitution format 2.
    SingleSubst2(SingleSubst2<'a>),
    /// Multiple substitution format 1.
    MultipleSubst1(MultipleSubst1<'a>),
    /// Alternate substitution format 1.
    AlternateSubst1(AlternateSubst1<'a>),
    /// Ligature substitution format 1.
    LigatureSubst1(LigatureSubst1<'a>),
    /// Reverse chaining contextual substitution format 1.
    RevChainContext1(RevChainContext1<'a>),
    /// Sequence context format 1.
    SeqContext1(SeqContext1<'a>),
    /// Sequence context format 2.
    SeqContext2(SeqContext2<'a>),
    /// Sequence context format 3.
    SeqContext3(SeqContext3<'a>),
    /// Chained sequence context format 1.
    ChainContext1(ChainContext1<'a>),
    /// Chained sequence context format 2.
    ChainContext2(ChainContext2<'a>),
    /// Chained sequence context format 3.
    ChainContext3(ChainContext3<'a>),
    /// Extension wrapper (either stage).
    Extension(Extension<'a>),
    /// Single position adjustment format 1.
    SinglePos1(SinglePos1),
    /// Single position adjustment format 2.
    SinglePos2(SinglePos2<'a>),
    /// Pair position adjustment format 1.
    PairPos1(PairPos1<'a>),
    /// Pair position adjustment format 2.
    PairPos2(PairPos2<'a>),
    /// Cursive attachment format 1.
    CursivePos1(CursivePos1<'a>),
    /// Mark to base attachment format 1.
    MarkBasePos1(MarkBasePos1<'a>),
    /// Mark to ligature attachment format 1.
    MarkLigaturePos1(MarkLigaturePos1<'a>),
    /// Mark to mark attachment format 1.
    MarkMarkPos1(MarkMarkPos1<'a>),
}

/// Follows extension indirection to the terminal subtable location.
///
/// The depth counter is threaded explicitly; wrapped extensions and
/// exhausted budgets are recursion errors.
fn resolve_subtable(
    stage: Stage,
    data: Buffer,
    kind: LookupKind,
    offset: u32,
    max_depth: u8,
) -> Result<(LookupKind, u32), DecodeError> {
    let mut kind = kind;
    let mut offset = offset;
    let mut depth = 0u8;
    if offset as usize >= data.len() {
        return Err(DecodeError::bounds(
            offset as usize,
            "subtable offset escapes table",
        ));
    }
    while kind.is_extension() {
        if depth >= max_depth {
            return Err(DecodeError::recursion(
                offset as usize,
                format!("extension depth exceeds limit {}", max_depth),
            ));
        }
        let base = offset as usize;
        let format = data
            .read_u16(base)
            .ok_or_else(|| DecodeError::bounds(base, "extension subtable too short"))?;
        if format != 1 {
            return Err(DecodeError::format(
                base,
                format!("unknown extension format {}", format),
            ));
        }
        let raw_wrapped = data
            .read_u16(base + 2)
            .ok_or_else(|| DecodeError::bounds(base + 2, "extension subtable too short"))?;
        let wrapped = LookupKind::from_raw(stage, raw_wrapped).ok_or_else(|| {
            DecodeError::format(
                base + 2,
                format!("unknown extension lookup type {}", raw_wrapped),
            )
        })?;
        if wrapped.is_extension() {
            return Err(DecodeError::recursion(
                base + 2,
                "extension subtable wraps another extension",
            ));
        }
        let target = data
            .read_u32(base + 4)
            .ok_or_else(|| DecodeError::bounds(base + 4, "extension subtable too short"))?;
        let target = offset
            .checked_add(target)
            .filter(|t| (*t as usize) < data.len())
            .ok_or_else(|| {
                DecodeError::bounds(base + 4, "extension target offset escapes table")
            })?;
        kind = wrapped;
        offset = target;
        depth += 1;
    }
    Ok((kind, offset))
}

/// Decodes the payload for a non-extension subtable.
fn decode_payload<'a>(
    data: Buffer<'a>,
    kind: LookupKind,
    offset: u32,
    nesting_depth: u8,
) -> Result<(u16, Option<Coverage<'a>>, Payload<'a>), DecodeError> {
    let base = offset as usize;
    let format = data
        .read_u16(base)
        .ok_or_else(|| DecodeError::bounds(base, "subtable too short"))?;
    use LookupKind::*;
    Ok(match (kind, format) {
        (SingleSubst, 1) => {
            let (coverage, payload) = SingleSubst1::parse(data, offset)?;
            (format, Some(coverage), Payload::SingleSubst1(payload))
        }
        (SingleSubst, 2) => {
            let (coverage, payload) = SingleSubst2::parse(data, offset)?;
            (format, Some(coverage), Payload::SingleSubst2(payload))
        }
        (MultipleSubst, 1) => {
            let (coverage, payload) = MultipleSubst1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::MultipleSubst1(payload))
        }
        (AlternateSubst, 1) => {
            let (coverage, payload) = AlternateSubst1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::AlternateSubst1(payload))
        }
        (LigatureSubst, 1) => {
            let (coverage, payload) = LigatureSubst1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::LigatureSubst1(payload))
        }
        (RevChainContextSubst, 1) => {
            let (coverage, payload) = RevChainContext1::parse(data, offset)?;
            (format, Some(coverage), Payload::RevChainContext1(payload))
        }
        (ContextSubst | ContextPos, 1) => {
            let (coverage, payload) = SeqContext1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::SeqContext1(payload))
        }
        (ContextSubst | ContextPos, 2) => {
            let (coverage, payload) = SeqContext2::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::SeqContext2(payload))
        }
        (ContextSubst | ContextPos, 3) => {
            let payload = SeqContext3::parse(data, offset)?;
            (format, None, Payload::SeqContext3(payload))
        }
        (ChainContextSubst | ChainContextPos, 1) => {
            let (coverage, payload) = ChainContext1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::ChainContext1(payload))
        }
        (ChainContextSubst | ChainContextPos, 2) => {
            let (coverage, payload) = ChainContext2::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::ChainContext2(payload))
        }
        (ChainContextSubst | ChainContextPos, 3) => {
            let payload = ChainContext3::parse(data, offset)?;
            (format, None, Payload::ChainContext3(payload))
        }
        (SinglePos, 1) => {
            let (coverage, payload) = SinglePos1::parse(data, offset)?;
            (format, Some(coverage), Payload::SinglePos1(payload))
        }
        (SinglePos, 2) => {
            let (coverage, payload) = SinglePos2::parse(data, offset)?;
            (format, Some(coverage), Payload::SinglePos2(payload))
        }
        (PairPos, 1) => {
            let (coverage, payload) = PairPos1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::PairPos1(payload))
        }
        (PairPos, 2) => {
            let (coverage, payload) = PairPos2::parse(data, offset)?;
            (format, Some(coverage), Payload::PairPos2(payload))
        }
        (CursivePos, 1) => {
            let (coverage, payload) = CursivePos1::parse(data, offset)?;
            (format, Some(coverage), Payload::CursivePos1(payload))
        }
        (MarkBasePos, 1) => {
            let (coverage, payload) = MarkBasePos1::parse(data, offset)?;
            (format, Some(coverage), Payload::MarkBasePos1(payload))
        }
        (MarkLigaturePos, 1) => {
            let (coverage, payload) = MarkLigaturePos1::parse(data, offset, nesting_depth)?;
            (format, Some(coverage), Payload::MarkLigaturePos1(payload))
        }
        (MarkMarkPos, 1) => {
            let (coverage, payload) = MarkMarkPos1::parse(data, offset)?;
            (format, Some(coverage), Payload::MarkMarkPos1(payload))
        }
        _ => {
            return Err(DecodeError::format(
                base,
                format!("unknown format {} for {:?} subtable", format, kind),
            ))
        }
    })
}
