//! Directory decoding and cross-table validation.

mod common;

use common::*;
use otlayout::{Font, IssueKind, Options, Severity, Tag};
use pretty_assertions::assert_eq;

#[test]
fn empty_image() {
    let error = Font::parse(&[]).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Bounds);
}

#[test]
fn unknown_signature() {
    let mut data = build_test_font(FontSpec::default());
    data[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Format);
    assert_eq!(error.fatal.severity, Severity::Critical);
}

#[test]
fn truncated_record_array() {
    let data = build_test_font(FontSpec::default());
    // Cut the image in the middle of the table records.
    let error = Font::parse(&data[..40]).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Bounds);
}

#[test]
fn out_of_order_directory_tags() {
    let mut data = build_test_font(FontSpec::default());
    // Swap the first two 16-byte records (GPOS and GSUB).
    let (a, b) = (12, 28);
    let mut first = [0u8; 16];
    first.copy_from_slice(&data[a..a + 16]);
    let mut second = [0u8; 16];
    second.copy_from_slice(&data[b..b + 16]);
    data[a..a + 16].copy_from_slice(&second);
    data[b..b + 16].copy_from_slice(&first);
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Order);

    // The relaxed mode downgrades the finding to a warning.
    let font = Font::parse_with(
        &data,
        Options {
            relax_consistency: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!font.warnings().is_empty());
}

#[test]
fn table_escaping_image_is_rejected() {
    let mut data = build_test_font(FontSpec::default());
    // Inflate the length of the first table record.
    let len_at = 12 + 12;
    data[len_at..len_at + 4].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Bounds);
}

#[test]
fn missing_required_table_is_critical() {
    // Build a font without GPOS.
    let spec = FontSpec::default();
    let mut head = vec![0u8; 54];
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());
    let mut hhea = vec![0u8; 36];
    hhea[34..36].copy_from_slice(&spec.num_long_metrics.to_be_bytes());
    let hmtx = vec![0u8; 4 * spec.num_long_metrics as usize];
    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x00005000);
    push_u16(&mut maxp, spec.num_glyphs);
    let tables = vec![
        (*b"GSUB", empty_layout_table()),
        (*b"OS/2", vec![0u8; 78]),
        (*b"cmap", vec![0u8; 4]),
        (*b"head", head),
        (*b"hhea", hhea),
        (*b"hmtx", hmtx),
        (*b"maxp", maxp),
        (*b"name", vec![0, 0, 0, 0, 0, 6]),
        (*b"post", vec![0u8; 32]),
    ];
    let data = build_font(&tables);
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Missing);
    assert!(error.fatal.detail.contains("GPOS"));
}

#[test]
fn hhea_metrics_exceeding_glyph_count() {
    let data = build_test_font(FontSpec {
        num_glyphs: 2,
        num_long_metrics: 5,
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Consistency);
    assert_eq!(error.fatal.severity, Severity::Critical);

    // The relaxed mode accepts the font and records a warning.
    let font = Font::parse_with(
        &data,
        Options {
            relax_consistency: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(font
        .warnings()
        .iter()
        .any(|w| w.detail.contains("long metrics")));
}

#[test]
fn short_hmtx_is_inconsistent() {
    let spec = FontSpec {
        num_glyphs: 8,
        num_long_metrics: 4,
        ..Default::default()
    };
    let mut data = build_test_font(spec);
    // Shrink the hmtx record length: 4 glyphs of trailing bearings vanish.
    let record_at = data
        .windows(4)
        .position(|window| window == b"hmtx")
        .unwrap();
    let len_at = record_at + 12;
    data[len_at..len_at + 4].copy_from_slice(&8u32.to_be_bytes());
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Consistency);
}

#[test]
fn gdef_requirement_inferred_from_lookup_flags() {
    // A GSUB lookup that ignores base glyphs, against a GDEF without a
    // glyph class definition.
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x06, // coverage offset: 6
        0x00, 0x01, // delta: 1
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x02, // glyph: 2
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::with_flag(
        1, 0x0002, subtable,
    )]));
    let data = build_test_font(FontSpec {
        gsub: gsub.clone(),
        gdef: Some(gdef_table(None, None)),
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Missing);
    assert!(error.fatal.detail.contains("GlyphClassDef"));

    // The same font with a populated glyph class definition decodes.
    let data = build_test_font(FontSpec {
        gsub,
        gdef: Some(gdef_table(Some(class_def_range(1, 10, 1)), None)),
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    assert!(!font.has_critical_errors());
    let gdef = font.gdef().unwrap();
    assert!(gdef.has_glyph_classes());
    assert_eq!(gdef.glyph_class(5), 1);
    assert_eq!(gdef.glyph_class(11), 0);
}

#[test]
fn ignore_marks_without_gdef_is_critical() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x06, // coverage offset: 6
        0x00, 0x01, // delta: 1
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x02, // glyph: 2
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::with_flag(
        1, 0x0008, subtable,
    )]));
    let data = build_test_font(FontSpec {
        gsub,
        gdef: None,
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Missing);
    assert!(error.fatal.detail.contains("GDEF is absent"));
}

#[test]
fn mark_attachment_class_requires_mark_attach_def() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x06, // coverage offset: 6
        0x00, 0x01, // delta: 1
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x02, // glyph: 2
    ];
    // Mark attachment type 3 in the high byte of the flag.
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::with_flag(
        1, 0x0300, subtable,
    )]));
    let data = build_test_font(FontSpec {
        gsub: gsub.clone(),
        gdef: Some(gdef_table(Some(class_def_range(1, 10, 1)), None)),
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert!(error.fatal.detail.contains("MarkAttachClassDef"));

    let data = build_test_font(FontSpec {
        gsub,
        gdef: Some(gdef_table(
            Some(class_def_range(1, 10, 1)),
            Some(class_def_range(20, 30, 3)),
        )),
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    let gdef = font.gdef().unwrap();
    assert_eq!(gdef.mark_attach_class(25), 3);
}

#[test]
fn unknown_lookup_type_fails_the_table() {
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(
        9,
        vec![0x00, 0x01],
    )]));
    let data = build_test_font(FontSpec {
        gsub,
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Format);
    assert_eq!(error.fatal.table, Tag::new(b"GSUB"));
}

#[test]
fn unsupported_layout_version() {
    let mut gsub = empty_layout_table();
    gsub[0..2].copy_from_slice(&2u16.to_be_bytes());
    let data = build_test_font(FontSpec {
        gsub,
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Format);
    assert!(error.fatal.detail.contains("version"));
}

#[test]
fn script_tags_must_ascend() {
    let gsub = layout_table(&LayoutSpec {
        scripts: vec![
            ScriptSpec {
                tag: *b"latn",
                default_features: Some(vec![0]),
                langs: Vec::new(),
            },
            ScriptSpec {
                tag: *b"DFLT",
                default_features: Some(vec![0]),
                langs: Vec::new(),
            },
        ],
        features: vec![FeatureSpec {
            tag: *b"test",
            lookups: Vec::new(),
        }],
        lookups: Vec::new(),
    });
    let data = build_test_font(FontSpec {
        gsub,
        ..Default::default()
    });
    let error = Font::parse(&data).unwrap_err();
    assert_eq!(error.fatal.kind, IssueKind::Order);
}

#[test]
fn table_access_and_metrics() {
    let data = build_test_font(FontSpec {
        num_glyphs: 4,
        num_long_metrics: 2,
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    assert_eq!(font.num_glyphs(), 4);
    assert!(font.table(Tag::new(b"head")).is_some());
    assert!(font.table(Tag::new(b"glyf")).is_none());
    // Zeroed metrics decode but carry no widths.
    assert_eq!(font.advance_width(0), Some(0));
    assert_eq!(font.advance_width(3), Some(0));
    assert_eq!(font.advance_width(4), None);
    assert!(font.errors().is_empty());
    assert!(!font.has_critical_errors());
}
