//! Font directory decoding and the top level font handle.

use super::cmap::{Cmap, CMAP};
use super::diag::{DecodeError, Diagnostic, DiagnosticList, Error, Severity, Warning};
use super::gdef::{Gdef, GDEF};
use super::gpos::{Gpos, GPOS};
use super::gsub::{Gsub, GSUB};
use super::head::{Head, HEAD};
use super::hhea::{Hhea, HHEA};
use super::hmtx::{Hmtx, HMTX};
use super::limits;
use super::loca::LOCA;
use super::maxp::{Maxp, MAXP};
use super::name::{Name, NAME};
use super::os2::{Os2, OS2};
use super::post::{Post, POST};
use super::types::{FWord, GlyphId, RawDirectoryHeader, RawTableRecord, TableRecord, Tag, UfWord};
use super::validate::{self, CrossTableCheck, GdefSections};
use std::sync::Arc;
use zerocopy::LayoutVerified;

/// Tag used for diagnostics about the sfnt wrapper itself.
const SFNT: Tag = Tag::new(b"sfnt");

const OTTO: Tag = Tag::new(b"OTTO");
const TRUE_TYPE: Tag = Tag(0x00010000);
const TRUE: Tag = Tag::new(b"true");

/// Decoder options.
#[derive(Copy, Clone, Debug)]
pub struct Options {
    /// Downgrades table order, alignment, presence and numeric consistency
    /// findings to warnings. Intended for test fonts only.
    pub relax_consistency: bool,
    /// Ceiling for extension subtable indirection.
    pub max_extension_depth: u8,
    /// Ceiling for nested offset-array indirection.
    pub max_nesting_depth: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            relax_consistency: false,
            max_extension_depth: limits::MAX_EXTENSION_DEPTH,
            max_nesting_depth: limits::MAX_NESTING_DEPTH,
        }
    }
}

/// Decoded font borrowing the caller owned byte image.
///
/// The advanced layout graph is reachable through [`gsub`](Self::gsub),
/// [`gpos`](Self::gpos) and [`gdef`](Self::gdef); diagnostics accumulated
/// during decoding (including lazy node decoding) are reachable through the
/// error accessors.
#[derive(Debug)]
pub struct Font<'a> {
    data: &'a [u8],
    records: Vec<TableRecord>,
    diags: Arc<DiagnosticList>,
    head: Option<Head<'a>>,
    hhea: Option<Hhea<'a>>,
    maxp: Option<Maxp<'a>>,
    name: Option<Name<'a>>,
    os2: Option<Os2<'a>>,
    post: Option<Post<'a>>,
    cmap: Option<Cmap<'a>>,
    hmtx: Option<Hmtx<'a>>,
    gdef: Option<Gdef<'a>>,
    gsub: Option<Gsub<'a>>,
    gpos: Option<Gpos<'a>>,
}

impl<'a> Font<'a> {
    /// Decodes a font from the specified byte image with default options.
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        Self::parse_with(data, Options::default())
    }

    /// Decodes a font from the specified byte image.
    pub fn parse_with(data: &'a [u8], options: Options) -> Result<Self, Error> {
        let diags = Arc::new(DiagnosticList::new());
        let fatal = |diagnostic: Diagnostic, diags: &Arc<DiagnosticList>| Error {
            fatal: diagnostic,
            diagnostics: diags.errors(),
        };
        let records = match parse_directory(data, &options, &diags) {
            Ok(records) => records,
            Err(diagnostic) => return Err(fatal(diagnostic, &diags)),
        };
        let mut font = Font {
            data,
            records,
            diags: diags.clone(),
            head: None,
            hhea: None,
            maxp: None,
            name: None,
            os2: None,
            post: None,
            cmap: None,
            hmtx: None,
            gdef: None,
            gsub: None,
            gpos: None,
        };
        // Required sibling tables: structural errors here are critical.
        macro_rules! required_table {
            ($tag:expr, $section:literal, $parse:expr) => {
                if let Some(table_data) = font.table($tag) {
                    match $parse(table_data) {
                        Ok(table) => Some(table),
                        Err(err) => {
                            let diagnostic =
                                diags.report($tag, $section, Severity::Critical, err);
                            return Err(fatal(diagnostic, &diags));
                        }
                    }
                } else {
                    None
                }
            };
        }
        font.head = required_table!(HEAD, "header", Head::parse);
        font.hhea = required_table!(HHEA, "header", Hhea::parse);
        font.maxp = required_table!(MAXP, "header", Maxp::parse);
        font.name = required_table!(NAME, "header", Name::parse);
        font.os2 = required_table!(OS2, "header", Os2::parse);
        font.post = required_table!(POST, "header", Post::parse);
        font.cmap = required_table!(CMAP, "header", Cmap::parse);
        if let (Some(hmtx_data), Some(hhea), Some(maxp)) =
            (font.table(HMTX), font.hhea, font.maxp)
        {
            font.hmtx = Some(Hmtx::new(
                hmtx_data,
                maxp.num_glyphs(),
                hhea.num_long_metrics(),
            ));
        }
        // Layout tables: GSUB and GPOS headers, lookup, feature and script
        // lists decode eagerly; GDEF section errors degrade locally.
        if let Some(gsub_data) = font.table(GSUB) {
            match Gsub::parse(gsub_data, &options, &diags) {
                Ok(gsub) => font.gsub = Some(gsub),
                Err(diagnostic) => return Err(fatal(diagnostic, &diags)),
            }
        }
        if let Some(gpos_data) = font.table(GPOS) {
            match Gpos::parse(gpos_data, &options, &diags) {
                Ok(gpos) => font.gpos = Some(gpos),
                Err(diagnostic) => return Err(fatal(diagnostic, &diags)),
            }
        }
        if let Some(gdef_data) = font.table(GDEF) {
            match Gdef::parse(gdef_data, &diags) {
                Ok(gdef) => font.gdef = Some(gdef),
                Err(err) => {
                    diags.report(GDEF, "header", Severity::Major, err);
                }
            }
        }
        let mut requirements = Default::default();
        if let Some(gsub) = &font.gsub {
            requirements = gsub.requirements();
        }
        if let Some(gpos) = &font.gpos {
            requirements = gpos.requirements().union(requirements);
        }
        let check = CrossTableCheck {
            records: &font.records,
            num_glyphs: font.maxp.map(|maxp| maxp.num_glyphs()),
            num_long_metrics: font.hhea.map(|hhea| hhea.num_long_metrics()),
            index_to_loc_format: font.head.map(|head| head.index_to_loc_format()),
            hmtx_len: font.table(HMTX).map(|data| data.len()),
            loca_len: font.table(LOCA).map(|data| data.len()),
            requirements,
            gdef: font.gdef.as_ref().map(|gdef| GdefSections {
                glyph_classes: gdef.has_glyph_classes(),
                mark_attach_classes: gdef.has_mark_attach_classes(),
                mark_sets: gdef.has_mark_sets(),
            }),
        };
        if let Err(diagnostic) = validate::run(&check, options.relax_consistency, &diags) {
            return Err(fatal(diagnostic, &diags));
        }
        Ok(font)
    }

    /// Returns the underlying byte image.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the validated table directory records.
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    /// Returns the record for the table with the specified tag.
    pub fn record(&self, tag: Tag) -> Option<TableRecord> {
        self.records.iter().find(|record| record.tag == tag).copied()
    }

    /// Returns the raw data for the table with the specified tag.
    pub fn table(&self, tag: Tag) -> Option<&'a [u8]> {
        self.data.get(self.record(tag)?.data_range())
    }

    /// Returns the glyph substitution table.
    pub fn gsub(&self) -> Option<&Gsub<'a>> {
        self.gsub.as_ref()
    }

    /// Returns the glyph positioning table.
    pub fn gpos(&self) -> Option<&Gpos<'a>> {
        self.gpos.as_ref()
    }

    /// Returns the glyph definition table.
    pub fn gdef(&self) -> Option<&Gdef<'a>> {
        self.gdef.as_ref()
    }

    /// Returns the font header table.
    pub fn head(&self) -> Option<&Head<'a>> {
        self.head.as_ref()
    }

    /// Returns the horizontal header table.
    pub fn hhea(&self) -> Option<&Hhea<'a>> {
        self.hhea.as_ref()
    }

    /// Returns the maximum profile table.
    pub fn maxp(&self) -> Option<&Maxp<'a>> {
        self.maxp.as_ref()
    }

    /// Returns the naming table.
    pub fn name(&self) -> Option<&Name<'a>> {
        self.name.as_ref()
    }

    /// Returns the OS/2 and Windows metrics table.
    pub fn os2(&self) -> Option<&Os2<'a>> {
        self.os2.as_ref()
    }

    /// Returns the PostScript table.
    pub fn post(&self) -> Option<&Post<'a>> {
        self.post.as_ref()
    }

    /// Returns the character mapping table.
    pub fn cmap(&self) -> Option<&Cmap<'a>> {
        self.cmap.as_ref()
    }

    /// Returns the horizontal metrics table.
    pub fn hmtx(&self) -> Option<&Hmtx<'a>> {
        self.hmtx.as_ref()
    }

    /// Returns the number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.maxp.map(|maxp| maxp.num_glyphs()).unwrap_or(0)
    }

    /// Returns the family name.
    pub fn family_name(&self) -> Option<String> {
        self.name.as_ref()?.family_name()
    }

    /// Returns the subfamily name.
    pub fn subfamily_name(&self) -> Option<String> {
        self.name.as_ref()?.subfamily_name()
    }

    /// Returns the advance width for the specified glyph.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<UfWord> {
        self.hmtx.as_ref()?.advance_width(glyph_id)
    }

    /// Returns the left side bearing for the specified glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<FWord> {
        self.hmtx.as_ref()?.side_bearing(glyph_id)
    }

    /// Returns a snapshot of the recorded diagnostics.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.diags.errors()
    }

    /// Returns a snapshot of the recorded warnings.
    pub fn warnings(&self) -> Vec<Warning> {
        self.diags.warnings()
    }

    /// Returns a snapshot of the critical diagnostics.
    pub fn critical_errors(&self) -> Vec<Diagnostic> {
        self.diags.critical_errors()
    }

    /// Returns true if any critical diagnostic has been recorded.
    pub fn has_critical_errors(&self) -> bool {
        self.diags.has_critical_errors()
    }
}

/// Decodes and validates the sfnt table directory.
fn parse_directory(
    data: &[u8],
    options: &Options,
    diags: &Arc<DiagnosticList>,
) -> Result<Vec<TableRecord>, Diagnostic> {
    const SECTION: &str = "directory";
    let critical = |err: DecodeError| diags.report(SFNT, SECTION, Severity::Critical, err);
    let (header, rest) =
        LayoutVerified::<_, RawDirectoryHeader>::new_unaligned_from_prefix(data)
            .ok_or_else(|| critical(DecodeError::bounds(0, "image too short for offset table")))?;
    let header = header.into_ref();
    let signature = Tag(header.sfnt_version.get());
    if !matches!(signature, OTTO | TRUE_TYPE | TRUE) {
        return Err(critical(DecodeError::format(
            0,
            format!("unknown font signature 0x{:08X}", signature.0),
        )));
    }
    let count = header.num_tables.get() as usize;
    let (raw_records, _) =
        LayoutVerified::<_, [RawTableRecord]>::new_slice_unaligned_from_prefix(rest, count)
            .ok_or_else(|| {
                critical(DecodeError::bounds(
                    12,
                    format!("image too short for {} table records", count),
                ))
            })?;
    let raw_records = raw_records.into_slice();
    let mut records = Vec::with_capacity(count);
    let mut prev_tag: Option<Tag> = None;
    for (index, raw) in raw_records.iter().enumerate() {
        let record = TableRecord::from(raw);
        let record_offset = 12 + index * 16;
        if let Some(prev) = prev_tag {
            if record.tag <= prev {
                let err = DecodeError::order(
                    record_offset,
                    format!("table tag {} out of order after {}", record.tag, prev),
                );
                if options.relax_consistency {
                    diags.push_warning(Warning {
                        table: SFNT,
                        detail: err.detail,
                        offset: err.offset,
                    });
                } else {
                    return Err(critical(err));
                }
            }
        }
        prev_tag = Some(record.tag);
        if record.offset % 4 != 0 {
            let err = DecodeError::format(
                record_offset + 8,
                format!("table {} offset {} is not 4-aligned", record.tag, record.offset),
            );
            if options.relax_consistency {
                diags.push_warning(Warning {
                    table: SFNT,
                    detail: err.detail,
                    offset: err.offset,
                });
            } else {
                return Err(critical(err));
            }
        }
        let end = record.offset as u64 + record.len as u64;
        if end > data.len() as u64 {
            return Err(critical(DecodeError::bounds(
                record_offset + 8,
                format!("table {} escapes the image", record.tag),
            )));
        }
        records.push(record);
    }
    Ok(records)
}
