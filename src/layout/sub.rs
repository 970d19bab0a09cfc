//! Glyph substitution payloads.

use super::shared::{read_coverage_array, read_coverage_at, Coverage};
use crate::diag::DecodeError;
use crate::parse::{Buffer, Cursor, OffsetArray16, Slice};
use crate::types::GlyphId;

/// Single substitution format 1: a signed delta applied to every covered
/// glyph.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SingleSubst1 {
    /// Delta added to the glyph identifier.
    pub delta: i16,
}

impl SingleSubst1 {
    pub(crate) fn parse(data: Buffer, base: u32) -> Result<(Coverage, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let delta = data
            .read_i16(base as usize + 4)
            .ok_or_else(|| DecodeError::bounds(base as usize + 4, "subtable too short"))?;
        Ok((coverage, Self { delta }))
    }

    /// Returns the replacement for a covered glyph.
    pub fn apply(&self, glyph_id: GlyphId) -> GlyphId {
        (glyph_id as i32 + self.delta as i32) as u16
    }
}

/// Single substitution format 2: one replacement glyph per coverage index.
#[derive(Clone, Debug)]
pub struct SingleSubst2<'a> {
    substitutes: Slice<'a, GlyphId>,
}

impl<'a> SingleSubst2<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let substitutes = data
            .read_slice16::<GlyphId>(base as usize + 4)
            .ok_or_else(|| {
                DecodeError::bounds(base as usize + 4, "substitute array escapes table")
            })?;
        if (substitutes.len() as u32) < coverage.len() {
            return Err(DecodeError::bounds(
                base as usize + 4,
                "substitute array shorter than coverage",
            ));
        }
        Ok((coverage, Self { substitutes }))
    }

    /// Returns the replacement glyphs, one per coverage index.
    pub fn substitutes(&self) -> Slice<'a, GlyphId> {
        self.substitutes
    }

    /// Returns the replacement for the specified coverage index.
    pub fn substitute(&self, coverage_index: u16) -> Option<GlyphId> {
        self.substitutes.get(coverage_index as usize)
    }
}

/// Multiple substitution format 1: one input glyph replaced by a glyph
/// sequence.
#[derive(Clone, Debug)]
pub struct MultipleSubst1<'a> {
    data: Buffer<'a>,
    sets: OffsetArray16<'a>,
}

impl<'a> MultipleSubst1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let sets = OffsetArray16::parse(data, base, base + 4, depth).ok_or_else(|| {
            DecodeError::bounds(base as usize + 4, "sequence offsets escape table")
        })?;
        let payload = Self { data, sets };
        for index in 0..payload.sets.len() {
            let _ = payload.sequence_checked(index)?;
        }
        Ok((coverage, payload))
    }

    /// Returns the number of sequences.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no sequences.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns the replacement sequence for the specified coverage index.
    pub fn sequence(&self, coverage_index: u16) -> Option<Slice<'a, GlyphId>> {
        self.sequence_checked(coverage_index as usize).ok().flatten()
    }

    fn sequence_checked(&self, index: usize) -> Result<Option<Slice<'a, GlyphId>>, DecodeError> {
        if index >= self.sets.len() {
            return Ok(None);
        }
        let target = match self.sets.target(index) {
            Some(target) => target as usize,
            None => return Ok(None),
        };
        self.data
            .read_slice16::<GlyphId>(target)
            .map(Some)
            .ok_or_else(|| DecodeError::bounds(target, "glyph sequence escapes table"))
    }
}

/// Alternate substitution format 1: one input glyph with a list of
/// replacement candidates. The on-disk layout matches multiple
/// substitution.
#[derive(Clone, Debug)]
pub struct AlternateSubst1<'a> {
    inner: MultipleSubst1<'a>,
}

impl<'a> AlternateSubst1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let (coverage, inner) = MultipleSubst1::parse(data, base, depth)?;
        Ok((coverage, Self { inner }))
    }

    /// Returns the number of alternate sets.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no alternate sets.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the alternate glyphs for the specified coverage index.
    pub fn alternates(&self, coverage_index: u16) -> Option<Slice<'a, GlyphId>> {
        self.inner.sequence(coverage_index)
    }
}

/// Ligature substitution format 1: many input glyphs replaced by one
/// ligature glyph.
#[derive(Clone, Debug)]
pub struct LigatureSubst1<'a> {
    data: Buffer<'a>,
    sets: OffsetArray16<'a>,
}

impl<'a> LigatureSubst1<'a> {
    pub(crate) fn parse(
        data: Buffer<'a>,
        base: u32,
        depth: u8,
    ) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let sets = OffsetArray16::parse(data, base, base + 4, depth).ok_or_else(|| {
            DecodeError::bounds(base as usize + 4, "ligature set offsets escape table")
        })?;
        let payload = Self { data, sets };
        for index in 0..payload.sets.len() {
            if let Some(set) = payload.ligature_set_checked(index)? {
                for rule in 0..set.len() {
                    let _ = set.get_checked(rule)?;
                }
            }
        }
        Ok((coverage, payload))
    }

    /// Returns the number of ligature sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true if there are no ligature sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns the ligature set for the specified coverage index.
    pub fn ligature_set(&self, coverage_index: u16) -> Option<LigatureSet<'a>> {
        self.ligature_set_checked(coverage_index as usize)
            .ok()
            .flatten()
    }

    fn ligature_set_checked(&self, index: usize) -> Result<Option<LigatureSet<'a>>, DecodeError> {
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
                "ligature set nesting exceeds limit",
            ));
        }
        let array = OffsetArray16::parse(self.data, target, target, self.sets.depth() - 1)
            .ok_or_else(|| DecodeError::bounds(target as usize, "ligature set escapes table"))?;
        Ok(Some(LigatureSet {
            data: self.data,
            array,
        }))
    }
}

/// Set of ligature rules beginning with one covered glyph.
#[derive(Clone, Debug)]
pub struct LigatureSet<'a> {
    data: Buffer<'a>,
    array: OffsetArray16<'a>,
}

impl<'a> LigatureSet<'a> {
    /// Returns the number of ligature rules in the set.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns the ligature rule at the specified index.
    pub fn get(&self, index: usize) -> Option<Ligature<'a>> {
        self.get_checked(index).ok().flatten()
    }

    /// Returns an iterator over the ligature rules.
    pub fn iter(&self) -> impl Iterator<Item = Ligature<'a>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    fn get_checked(&self, index: usize) -> Result<Option<Ligature<'a>>, DecodeError> {
        let target = match self.array.target(index) {
            Some(target) => target as usize,
            None => return Ok(None),
        };
        let glyph = self
            .data
            .read_u16(target)
            .ok_or_else(|| DecodeError::bounds(target, "ligature escapes table"))?;
        let component_count = self
            .data
            .read_u16(target + 2)
            .ok_or_else(|| DecodeError::bounds(target + 2, "ligature escapes table"))?;
        // Components hold the second through last input glyphs.
        let components = self
            .data
            .read_slice::<GlyphId>(target + 4, (component_count as usize).saturating_sub(1))
            .ok_or_else(|| {
                DecodeError::bounds(target + 4, "ligature components escape table")
            })?;
        Ok(Some(Ligature { glyph, components }))
    }
}

/// Ligature glyph and its trailing components.
#[derive(Clone, Debug)]
pub struct Ligature<'a> {
    /// Identifier of the ligature glyph.
    pub glyph: GlyphId,
    /// The second through last input glyphs.
    pub components: Slice<'a, GlyphId>,
}

/// Reverse chaining contextual substitution format 1.
#[derive(Clone, Debug)]
pub struct RevChainContext1<'a> {
    /// Backtrack coverages, ordered away from the input glyph.
    pub backtrack: Vec<Coverage<'a>>,
    /// Lookahead coverages.
    pub lookahead: Vec<Coverage<'a>>,
    substitutes: Slice<'a, GlyphId>,
}

impl<'a> RevChainContext1<'a> {
    pub(crate) fn parse(data: Buffer<'a>, base: u32) -> Result<(Coverage<'a>, Self), DecodeError> {
        let coverage = read_coverage_at(data, base, base as usize + 2)?;
        let mut cursor = data
            .cursor_at(base as usize + 4)
            .ok_or_else(|| DecodeError::bounds(base as usize + 4, "subtable too short"))?;
        let backtrack_offsets = read_offsets16(&mut cursor, base as usize)?;
        let lookahead_offsets = read_offsets16(&mut cursor, base as usize)?;
        let substitutes = cursor
            .read_slice16::<GlyphId>()
            .ok_or_else(|| DecodeError::bounds(base as usize, "substitute array escapes table"))?;
        let backtrack = read_coverage_array(data, base, backtrack_offsets)?;
        let lookahead = read_coverage_array(data, base, lookahead_offsets)?;
        if (substitutes.len() as u32) < coverage.len() {
            return Err(DecodeError::bounds(
                base as usize,
                "substitute array shorter than coverage",
            ));
        }
        Ok((
            coverage,
            Self {
                backtrack,
                lookahead,
                substitutes,
            },
        ))
    }

    /// Returns the substitute glyphs, one per coverage index.
    pub fn substitutes(&self) -> Slice<'a, GlyphId> {
        self.substitutes
    }

    /// Returns the substitute for the specified coverage index.
    pub fn substitute(&self, coverage_index: u16) -> Option<GlyphId> {
        self.substitutes.get(coverage_index as usize)
    }
}

fn read_offsets16<'a>(
    cursor: &mut Cursor<'a>,
    base: usize,
) -> Result<Slice<'a, u16>, DecodeError> {
    cursor
        .read_slice16::<u16>()
        .ok_or_else(|| DecodeError::bounds(base, "offset array escapes table"))
}
