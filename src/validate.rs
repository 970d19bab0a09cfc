//! Cross-table consistency validation.

use super::diag::{DecodeError, Diagnostic, DiagnosticList, IssueKind, Severity, Warning};
use super::gdef::GDEF;
use super::gpos::GPOS;
use super::gsub::GSUB;
use super::hmtx;
use super::layout::GdefRequirements;
use super::loca;
use super::types::{TableRecord, Tag};

/// Tables that must be present for the font to be usable.
pub(crate) const REQUIRED_TABLES: [Tag; 10] = [
    super::cmap::CMAP,
    super::head::HEAD,
    super::hhea::HHEA,
    super::hmtx::HMTX,
    super::maxp::MAXP,
    super::name::NAME,
    super::os2::OS2,
    super::post::POST,
    GSUB,
    GPOS,
];

/// Presence of the GDEF sections relevant to requirement satisfaction.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct GdefSections {
    pub glyph_classes: bool,
    pub mark_attach_classes: bool,
    pub mark_sets: bool,
}

/// Inputs to the cross-table validator.
pub(crate) struct CrossTableCheck<'x> {
    pub records: &'x [TableRecord],
    pub num_glyphs: Option<u16>,
    pub num_long_metrics: Option<u16>,
    pub index_to_loc_format: Option<i16>,
    pub hmtx_len: Option<usize>,
    pub loca_len: Option<usize>,
    pub requirements: GdefRequirements,
    pub gdef: Option<GdefSections>,
}

/// Runs the cross-table validator.
///
/// Critical findings short-circuit; under the relaxed mode the presence and
/// numeric consistency checks are downgraded to warnings while the glyph
/// definition requirements stay critical.
pub(crate) fn run(
    check: &CrossTableCheck,
    relax: bool,
    diags: &DiagnosticList,
) -> Result<(), Diagnostic> {
    for tag in REQUIRED_TABLES {
        if !check.records.iter().any(|record| record.tag == tag) {
            fail(
                relax,
                diags,
                tag,
                "font",
                DecodeError::missing(format!("required table {} is absent", tag)),
            )?;
        }
    }
    if let (Some(num_glyphs), Some(num_long_metrics)) = (check.num_glyphs, check.num_long_metrics)
    {
        if num_long_metrics > num_glyphs {
            fail(
                relax,
                diags,
                super::hhea::HHEA,
                "metrics",
                DecodeError {
                    kind: IssueKind::Consistency,
                    offset: 34,
                    detail: format!(
                        "{} long metrics exceed {} glyphs",
                        num_long_metrics, num_glyphs
                    ),
                },
            )?;
        }
        if let Some(len) = check.hmtx_len {
            let expected = hmtx::expected_len(num_glyphs, num_long_metrics);
            if len < expected {
                fail(
                    relax,
                    diags,
                    super::hmtx::HMTX,
                    "metrics",
                    DecodeError {
                        kind: IssueKind::Consistency,
                        offset: 0,
                        detail: format!("table is {} bytes, expected at least {}", len, expected),
                    },
                )?;
            }
        }
    }
    if let (Some(num_glyphs), Some(format), Some(len)) =
        (check.num_glyphs, check.index_to_loc_format, check.loca_len)
    {
        let expected = loca::expected_len(num_glyphs, format != 0);
        if len != expected {
            fail(
                relax,
                diags,
                loca::LOCA,
                "metrics",
                DecodeError {
                    kind: IssueKind::Consistency,
                    offset: 0,
                    detail: format!(
                        "table is {} bytes, format {} requires {}",
                        len, format, expected
                    ),
                },
            )?;
        }
    }
    check_gdef_requirements(check.requirements, check.gdef, diags)?;
    Ok(())
}

/// Verifies that the glyph definition sections required by the accumulated
/// lookup flags are present. These findings are always critical.
fn check_gdef_requirements(
    requirements: GdefRequirements,
    gdef: Option<GdefSections>,
    diags: &DiagnosticList,
) -> Result<(), Diagnostic> {
    if !requirements.any() {
        return Ok(());
    }
    let sections = gdef.unwrap_or_default();
    let mut missing: Option<&'static str> = None;
    if requirements.glyph_classes && !sections.glyph_classes {
        missing = Some("GlyphClassDef");
    } else if requirements.mark_attach_classes && !sections.mark_attach_classes {
        missing = Some("MarkAttachClassDef");
    } else if requirements.mark_sets && !sections.mark_sets {
        missing = Some("MarkGlyphSetsDef");
    }
    if let Some(section) = missing {
        let detail = if gdef.is_some() {
            format!("lookup flags require GDEF {}", section)
        } else {
            format!("lookup flags require GDEF {} but GDEF is absent", section)
        };
        return Err(diags.report(
            GDEF,
            "requirements",
            Severity::Critical,
            DecodeError::missing(detail),
        ));
    }
    Ok(())
}

fn fail(
    relax: bool,
    diags: &DiagnosticList,
    table: Tag,
    section: &'static str,
    error: DecodeError,
) -> Result<(), Diagnostic> {
    if relax {
        diags.push_warning(Warning {
            table,
            detail: error.detail,
            offset: error.offset,
        });
        Ok(())
    } else {
        Err(diags.report(table, section, Severity::Critical, error))
    }
}
