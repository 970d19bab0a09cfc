//! Glyph substitution table.

use super::diag::{Diagnostic, DiagnosticList};
use super::font::Options;
use super::layout::{
    Feature, FeatureList, GdefRequirements, LayoutTable, Lookup, LookupList, Script, ScriptList,
    Stage,
};
use super::types::Tag;
use std::sync::Arc;

/// Tag for the `GSUB` table.
pub const GSUB: Tag = Tag::new(b"GSUB");

/// Glyph substitution table.
#[derive(Debug)]
pub struct Gsub<'a>(LayoutTable<'a>);

impl<'a> Gsub<'a> {
    pub(crate) fn parse(
        data: &'a [u8],
        options: &Options,
        diags: &Arc<DiagnosticList>,
    ) -> Result<Self, Diagnostic> {
        Ok(Self(LayoutTable::parse(
            Stage::Substitution,
            GSUB,
            data,
            options,
            diags,
        )?))
    }

    /// Returns the underlying layout table.
    pub fn table(&self) -> &LayoutTable<'a> {
        &self.0
    }

    /// Returns the script list.
    pub fn scripts(&self) -> &ScriptList<'a> {
        self.0.scripts()
    }

    /// Returns the script with the specified tag.
    pub fn script(&self, tag: Tag) -> Option<&Script<'a>> {
        self.0.script(tag)
    }

    /// Returns the feature list.
    pub fn features(&self) -> &FeatureList<'a> {
        self.0.features()
    }

    /// Returns the feature at the specified index.
    pub fn feature(&self, index: u16) -> Option<&Feature<'a>> {
        self.0.feature(index)
    }

    /// Returns the lookup list.
    pub fn lookups(&self) -> &LookupList<'a> {
        self.0.lookups()
    }

    /// Returns the lookup at the specified index.
    pub fn lookup(&self, index: u16) -> Option<&Lookup<'a>> {
        self.0.lookup(index)
    }

    /// Returns the glyph definition requirements accumulated from the
    /// lookup flags.
    pub fn requirements(&self) -> GdefRequirements {
        self.0.requirements()
    }
}
