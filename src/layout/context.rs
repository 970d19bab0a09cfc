//! Sequence context and chained sequence context payloads.

use super::shared::{read_coverage_array, read_coverage_at, ClassDef, Coverage};
use crate::diag::DecodeError;
use crate::parse::{Buffer, Cursor, OffsetArray16, ReadData, Slice};

/// Lookup to be applied on a successful contextual match.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SequenceLookup {
    /// Position within the matched input at which to apply the lookup.
    pub sequence_index: u16,
    /// Index of the lookup in the lookup list.
    pub lookup_index: u16,
}

impl ReadData for SequenceLookup {
    const SIZE: usize = 4;

    fn read_data(buf: &[u8], offset: usize) -> Option<Self> {
        Some(Self {
            sequence_index: u16::read_data(buf, offset)?,
            lookup_index: u16::read_data(buf, offset + 2)?,
        })
    }
}

/// Trait for rules stored in count-prefixed rule sets.
pub trait ReadRule<'a>: Sized {
    /// Reads the rule at the cursor.
    fn read_rule(cursor: &mut Cursor<'a>) -> Option<Self>;
}

/// Rule for a sequence context, matched by glyph or class identifiers.
#[derive(Copy, Clone, Debug)]
pub struct SeqRule<'a> {
    /// The second through last items of the input sequence.
    pub input: Slice<'a, u16>,
    /// Lookups to apply on a match.
    pub lookups: Slice<'a, SequenceLookup>,
}

impl<'a> ReadRule<'a> for SeqRule<'a> {
    fn read_rule(cursor: &mut Cursor<'a>) -> Option<Self> {
        let input_count = (cursor.read_u16()? as usize).checked_sub(1)?;
        let lookup_count = cursor.read_u16()? as usize;
        let input = cursor.read_slice::<u16>(input_count)?;
        let lookups = cursor.read_slice::<SequenceLookup>(lookup_count)?;
        Some(Self { input, lookups })
    }
}

/// Rule for a chained sequence context, matched by glyph or class
/// identifiers.
#[derive(Copy, Clone, Debug)]
pub struct ChainRule<'a> {
    /// Backtrack sequence, ordered away from the input glyph.
    pub backtrack: Slice<'a, u16>,
    /// The second through last items of the input sequence.
    pub input: Slice<'a, u16>,
    /// Lookahead sequence.
    pub lookahead: Slice<'a, u16>,
    /// Lookups to apply on a match.
    pub lookups: Slice<'a, SequenceLookup>,
}

impl<'a> ReadRule<'a> for ChainRule<'a> {
    fn read_rule(cursor: &mut Cursor<'a>) -> Option<Self> {
        let backtrack = cursor.read_slice16::<u16>()?;
        let input_count = (cursor.read_u16()? as usize).checked_sub(1)?;
        let input = cursor.read_slice::<u16>(input_count)?;
        let lookahead = cursor.read_slice16::<u16>()?;
        let lookups = cursor.read_slice16::<SequenceLookup>()?;
        Some(Self {
            backtrack,
            input,
            lookahead,
            lookups,
        })
    }
}

/// Set of rules sharing a first-glyph coverage index or input class.
#[derive(Clone, Debug)]
pub struct RuleSet<'a, R: ReadRule<'a>> {
    data: Buffer<'a>,
    array: OffsetArray16<'a>,
    _p: core::marker::PhantomData<R>,
}

/// Rule set for sequence contexts.
pub type SeqRuleSet<'a> = RuleSet<'a, SeqRule<'a>>;

/// Rule set for chained sequence contexts.
pub type ChainRuleSet<'a> = RuleSet<'a, ChainRule<'a>>;

impl<'a, R: ReadRule<'a>> RuleSet<'a, R> {
    /// Returns the number of rules in the set.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns the rule at the specified index.
    pub fn get(&self, index: usize) -> Option<R> {
        let target = self.array.target(index)?;
        let mut cursor = self.data.cursor_at(target as usize)?;
        R::read_rule(&mut cursor)
    }

    /// Returns an iterator over the rules in the set.
    pub fn iter(&self) -> impl Iterator<Item = R> + use<'_, 'a, R> {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

/// Collection of rule sets indexed by coverage index or input class.
#[derive(Clone, Debug)]
struct RuleSets<'a> {
    data: Buffer<'a>,
    sets: OffsetArray16<'a>,
}

impl<'a> RuleSets<'a> {
    fn parse(
        data: Buffer<'a>,
        base: u32,
        count_offset: u32,
        depth: u8,
    ) -> Result<Self, DecodeError> {
        let sets = OffsetArray16::parse(data, base, count_offset, depth).ok_or_else(|| {
            DecodeError::bounds(count_offset as usize, "rule set offsets escape table")
        })?;
        Ok(Self { data, sets })
    }

    fn len(&self) -> usize {
        self.sets.len()
    }

    fn get_checked<R: ReadRule<'a>>(
        &self,
        index: usize,
    ) -> Result<Option<RuleSet<'a, R>>, DecodeError> {
        if index >= self.sets.len() {
            return Ok(None);
        }
        let target = match self.sets.target(index) {
            Some(target) => target,
            None => return Ok(None),
        };
        if self.sets.depth() == 0 {
            return Err(DecodeError::recursion(
                target as usize,
                "rule set nesting exceeds limit",
            ));
        }
        let array = OffsetArray16::parse(self.data, target, target, self.sets.depth() - 1)
            .ok_or_else(|| DecodeError::bounds(target as usize, "rule set escapes table"))?;
        Ok(Some(RuleSet {
            data: self.data,
            array,
            _p: core::marker::PhantomData,
        }))
    }

    fn validate<R: ReadRule<'a>>(&self) -> Result<(), DecodeError> {
        for index in 0..self.len() {
            if let Some(set) = self.get_checked::<R>(index)? {
                for rule in 0..set.len() {
                    if let Some(target) = set.array.target(rule) {
                        let mut cursor = self
                            .data
                            .cursor_at(target as usize)
                            .ok_or_else(|| {
                                DecodeError::bounds(target as usize, "rule escapes table")
                            })?;
                        R::read_rule(&mut cursor).ok_or_else(|| {
                            DecodeError::bounds(target as usize, "rule escapes table")
                        })?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Sequence context format 1: rules matched by glyph identifiers.
#[derive(Clone, Debug)]
pub struct SeqContext1<'a> {
    sets: RuleSets<'a>,
}

impl<'a> SeqContext1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let sets = RuleSets::parse(data, base, base + 4, depth)?;
        sets.validate::<SeqRule>()?;
        Ok((coverage, Self { sets }))
    }

    /// Returns the number of rule sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no rule sets.
    pub fn is_empty(&self) -> bool {
        self.sets.len() == 0
    }

    /// Returns the rule set for the specified coverage index.
    pub fn rule_set(&self, coverage_index: u16) -> Option<SeqRuleSet<'a>> {
        self.sets.get_checked(coverage_index as usize).ok().flatten()
    }
}

/// Sequence context format 2: rules matched by glyph classes.
#[derive(Clone, Debug)]
pub struct SeqContext2<'a> {
    /// Class definition applied to input glyphs.
    pub classes: ClassDef<'a>,
    sets: RuleSets<'a>,
}

impl<'a> SeqContext2<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let classes = read_class_def_at(data, base, base as usize + 4)?;
        let sets = RuleSets::parse(data, base, base + 6, depth)?;
        sets.validate::<SeqRule>()?;
        Ok((coverage, Self { classes, sets }))
    }

    /// Returns the number of class rule sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no class rule sets.
    pub fn is_empty(&self) -> bool {
        self.sets.len() == 0
    }

    /// Returns the rule set for the specified input class.
    pub fn rule_set(&self, class: u16) -> Option<SeqRuleSet<'a>> {
        self.sets.get_checked(class as usize).ok().flatten()
    }
}

/// Sequence context format 3: one rule matched by per-position coverages.
///
/// This format has no outer coverage; the node's coverage field is absent.
#[derive(Clone, Debug)]
pub struct SeqContext3<'a> {
    /// One coverage per input position.
    pub coverages: Vec<Coverage<'a>>,
    /// Lookups to apply on a match.
    pub lookups: Slice<'a, SequenceLookup>,
}

impl<'a> SeqContext3<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<Self, DecodeError> {
        let mut cursor = data
            .cursor_at(base as usize + 2)
            .ok_or_else(|| DecodeError::bounds(base as usize + 2, "subtable too short"))?;
        let glyph_count = cursor
            .read_u16()
            .ok_or_else(|| DecodeError::bounds(base as usize + 2, "subtable too short"))?
            as usize;
        let lookup_count = cursor
            .read_u16()
            .ok_or_else(|| DecodeError::bounds(base as usize + 4, "subtable too short"))?
            as usize;
        let offsets = cursor.read_slice::<u16>(glyph_count).ok_or_else(|| {
            DecodeError::bounds(base as usize + 6, "coverage offsets escape table")
        })?;
        let lookups = cursor.read_slice::<SequenceLookup>(lookup_count).ok_or_else(|| {
            DecodeError::bounds(base as usize + 6, "lookup records escape table")
        })?;
        let coverages = read_coverage_array(data, base, offsets)?;
        Ok(Self { coverages, lookups })
    }
}

/// Chained sequence context format 1: rules matched by glyph identifiers.
#[derive(Clone, Debug)]
pub struct ChainContext1<'a> {
    sets: RuleSets<'a>,
}

impl<'a> ChainContext1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let sets = RuleSets::parse(data, base, base + 4, depth)?;
        sets.validate::<ChainRule>()?;
        Ok((coverage, Self { sets }))
    }

    /// Returns the number of rule sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no rule sets.
    pub fn is_empty(&self) -> bool {
        self.sets.len() == 0
    }

    /// Returns the rule set for the specified coverage index.
    pub fn rule_set(&self, coverage_index: u16) -> Option<ChainRuleSet<'a>> {
        self.sets.get_checked(coverage_index as usize).ok().flatten()
    }
}

/// Chained sequence context format 2: rules matched by glyph classes, with
/// separate class definitions for the backtrack, input and lookahead
/// sequences.
#[derive(Clone, Debug)]
pub struct ChainContext2<'a> {
    /// Class definition applied to backtrack glyphs.
    pub backtrack_classes: ClassDef<'a>,
    /// Class definition applied to input glyphs.
    pub input_classes: ClassDef<'a>,
    /// Class definition applied to lookahead glyphs.
    pub lookahead_classes: ClassDef<'a>,
    sets: RuleSets<'a>,
}

impl<'a> ChainContext2<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let backtrack_classes = read_class_def_at(data, base, base as usize + 4)?;
        let input_classes = read_class_def_at(data, base, base as usize + 6)?;
        let lookahead_classes = read_class_def_at(data, base, base as usize + 8)?;
        let sets = RuleSets::parse(data, base, base + 10, depth)?;
        sets.validate::<ChainRule>()?;
        Ok((
            coverage,
            Self {
                backtrack_classes,
                input_classes,
                lookahead_classes,
                sets,
            },
        ))
    }

    /// Returns the number of class rule sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no class rule sets.
    pub fn is_empty(&self) -> bool {
        self.sets.len() == 0
    }

    /// Returns the rule set for the specified input class.
    pub fn rule_set(&self, class: u16) -> Option<ChainRuleSet<'a>> {
        self.sets.get_checked(class as usize).ok().flatten()
    }
}

/// Chained sequence context format 3: one rule matched by per-position
/// coverages for the backtrack, input and lookahead sequences.
///
/// This format has no outer coverage; the node's coverage field is absent.
#[derive(Clone, Debug)]
pub struct ChainContext3<'a> {
    /// Backtrack coverages, ordered away from the input glyph.
    pub backtrack: Vec<Coverage<'a>>,
    /// One coverage per input position.
    pub input: Vec<Coverage<'a>>,
    /// Lookahead coverages.
    pub lookahead: Vec<Coverage<'a>>,
    /// Lookups to apply on a match.
    pub lookups: Slice<'a, SequenceLookup>,
}

impl<'a> ChainContext3<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<Self, DecodeError> {
        let mut cursor = data
            .cursor_at(base as usize + 2)
            .ok_or_else(|| DecodeError::bounds(base as usize + 2, "subtable too short"))?;
        let backtrack_offsets = cursor.read_slice16::<u16>().ok_or_else(|| {
            DecodeError::bounds(base as usize + 2, "backtrack offsets escape table")
        })?;
        let input_offsets = cursor.read_slice16::<u16>().ok_or_else(|| {
            DecodeError::bounds(base as usize + 2, "input offsets escape table")
        })?;
        let lookahead_offsets = cursor.read_slice16::<u16>().ok_or_else(|| {
            DecodeError::bounds(base as usize + 2, "lookahead offsets escape table")
        })?;
        let lookups = cursor.read_slice16::<SequenceLookup>().ok_or_else(|| {
            DecodeError::bounds(base as usize + 2, "lookup records escape table")
        })?;
        Ok(Self {
            backtrack: read_coverage_array(data, base, backtrack_offsets)?,
            input: read_coverage_array(data, base, input_offsets)?,
            lookahead: read_coverage_array(data, base, lookahead_offsets)?,
            lookups,
        })
    }
}

fn read_class_def_at<'a>(
    data: Buffer<'a>,
    base: u32,
    at: usize,
) -> Result<ClassDef<'a>, DecodeError> {
    let offset = data
        .read_u16(at)
        .ok_or_else(|| DecodeError::bounds(at, "class definition offset escapes table"))?;
    if offset == 0 {
        return Ok(ClassDef::empty());
    }
    ClassDef::parse(data, base + offset as u32)
}
