//! End-to-end decoding of synthetic GSUB and GPOS tables.

mod common;

use common::*;
use otlayout::layout::{LookupKind, Payload};
use otlayout::{Font, IssueKind, Tag};
use pretty_assertions::assert_eq;

fn parse_gsub_font(gsub: Vec<u8>) -> Vec<u8> {
    build_test_font(FontSpec {
        gsub,
        ..Default::default()
    })
}

#[test]
fn single_subst_format_1() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x06, // coverage offset: 6
        0x00, 0x03, // delta: 3
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x05, // glyph: 5
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(1, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    let gsub = font.gsub().unwrap();
    let lookup = gsub.lookup(0).unwrap();
    assert_eq!(lookup.kind, LookupKind::SingleSubst);
    let node = lookup.subtable(0).unwrap();
    assert!(node.error.is_none());
    let coverage = node.coverage.as_ref().unwrap();
    assert_eq!(coverage.get(5), Some(0));
    assert_eq!(coverage.get(4), None);
    match &node.payload {
        Payload::SingleSubst1(subst) => {
            assert_eq!(subst.delta, 3);
            assert_eq!(subst.apply(5), 8);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn ligature_subst_format_1() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x08, // coverage offset: 8
        0x00, 0x01, // ligature set count: 1
        0x00, 0x0E, // ligature set offset: 14
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x1E, // glyph: 30
        0x00, 0x01, // ligature count: 1
        0x00, 0x04, // ligature offset: 4
        0x00, 0x32, // ligature glyph: 50
        0x00, 0x02, // component count: 2
        0x00, 0x28, // component[1]: 40
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(4, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    let node = font.gsub().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    match &node.payload {
        Payload::LigatureSubst1(subst) => {
            let set = subst.ligature_set(0).unwrap();
            let ligature = set.get(0).unwrap();
            assert_eq!(ligature.glyph, 50);
            let components: Vec<u16> = ligature.components.iter().collect();
            assert_eq!(components, vec![40]);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn extension_wraps_single_subst() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x01, // extension lookup type: single substitution
        0x00, 0x00, 0x00, 0x08, // extension offset: 8
        // wrapped single substitution format 1
        0x00, 0x01, // format: 1
        0x00, 0x06, // coverage offset: 6
        0x00, 0x05, // delta: 5
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x2A, // glyph: 42
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(7, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    let lookup = font.gsub().unwrap().lookup(0).unwrap();
    assert_eq!(lookup.kind, LookupKind::ExtensionSubst);
    let node = lookup.subtable(0).unwrap();
    assert!(node.error.is_none());
    assert_eq!(node.kind, LookupKind::ExtensionSubst);
    // The extension node mirrors the resolved coverage.
    assert_eq!(node.coverage.as_ref().unwrap().get(42), Some(0));
    match &node.payload {
        Payload::Extension(extension) => {
            let inner = &extension.resolved;
            assert_eq!(inner.kind, LookupKind::SingleSubst);
            match &inner.payload {
                Payload::SingleSubst1(subst) => assert_eq!(subst.delta, 5),
                other => panic!("unexpected inner payload: {:?}", other),
            }
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn extension_self_reference_is_recursion_error() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x07, // extension lookup type: extension (prohibited)
        0x00, 0x00, 0x00, 0x08, // extension offset: 8
        0x00, 0x00, 0x00, 0x00,
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(7, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    // The recursion error is recorded during parse, before any subtable is
    // demanded.
    assert!(font
        .errors()
        .iter()
        .any(|d| d.kind == IssueKind::Recursion));
    let node = font.gsub().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    assert!(node.error.is_some());
    assert!(matches!(node.payload, Payload::None));
    assert!(!font.has_critical_errors());
}

#[test]
fn pair_pos_truncated_class_grid() {
    // 50x50 class grid declared inside a 44-byte subtable.
    let mut subtable = vec![
        0x00, 0x02, // format: 2
        0x00, 0x10, // coverage offset: 16
        0x00, 0x01, // value format 1: X_PLACEMENT
        0x00, 0x01, // value format 2: X_PLACEMENT
        0x00, 0x00, // class def 1 offset: none
        0x00, 0x00, // class def 2 offset: none
        0x00, 0x32, // class1 count: 50
        0x00, 0x32, // class2 count: 50
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x05, // glyph: 5
    ];
    subtable.resize(44, 0);
    let gpos = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(2, subtable)]));
    let data = build_test_font(FontSpec {
        gpos,
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    let node = font.gpos().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    let error = node.error.as_ref().expect("truncated grid must fail");
    assert_eq!(error.kind, IssueKind::Bounds);
    assert!(matches!(node.payload, Payload::None));
}

fn graph_spec() -> LayoutSpec {
    LayoutSpec {
        scripts: vec![
            ScriptSpec {
                tag: *b"DFLT",
                default_features: Some(vec![0]),
                langs: Vec::new(),
            },
            ScriptSpec {
                tag: *b"arab",
                default_features: None,
                langs: vec![(*b"URD ", vec![1])],
            },
            ScriptSpec {
                tag: *b"latn",
                default_features: Some(vec![0, 2]),
                langs: vec![(*b"TRK ", vec![2])],
            },
        ],
        features: vec![
            FeatureSpec {
                tag: *b"liga",
                lookups: vec![0],
            },
            FeatureSpec {
                tag: *b"liga",
                lookups: vec![0],
            },
            FeatureSpec {
                tag: *b"test",
                lookups: vec![0],
            },
        ],
        lookups: vec![LookupSpec::new(
            1,
            vec![
                0x00, 0x01, // format: 1
                0x00, 0x06, // coverage offset: 6
                0x00, 0x01, // delta: 1
                0x00, 0x01, // coverage format: 1
                0x00, 0x01, // coverage count: 1
                0x00, 0x07, // glyph: 7
            ],
        )],
    }
}

#[test]
fn script_graph_order_and_selection() {
    let data = parse_gsub_font(layout_table(&graph_spec()));
    let font = Font::parse(&data).unwrap();
    let gsub = font.gsub().unwrap();

    // Declaration order is preserved.
    let tags: Vec<Tag> = (0..gsub.scripts().len())
        .map(|i| gsub.scripts().tag(i).unwrap())
        .collect();
    assert_eq!(
        tags,
        vec![Tag::new(b"DFLT"), Tag::new(b"arab"), Tag::new(b"latn")]
    );

    // Tag selection by binary search.
    let latn = gsub.script(Tag::new(b"latn")).unwrap();
    assert!(gsub.script(Tag::new(b"grek")).is_none());

    // Default language system and explicit language systems.
    let default = latn.default_language_system().unwrap();
    assert_eq!(default.tag, Tag::new(b"DFLT"));
    let indices: Vec<u16> = default.feature_indices().iter().collect();
    assert_eq!(indices, vec![0, 2]);
    let trk = latn.language_system(Tag::new(b"TRK ")).unwrap();
    let indices: Vec<u16> = trk.feature_indices().iter().collect();
    assert_eq!(indices, vec![2]);
    assert_eq!(trk.required_feature(), None);

    // Duplicate feature tags map one-to-many.
    assert_eq!(
        gsub.features().indices_for_tag(Tag::new(b"liga")),
        vec![0, 1]
    );
    assert_eq!(gsub.features().tag(2), Some(Tag::new(b"test")));

    // Features resolve lookups by index.
    let feature = gsub.feature(2).unwrap();
    let lookups: Vec<u16> = feature.lookup_indices().iter().collect();
    assert_eq!(lookups, vec![0]);
    assert!(gsub.lookup(0).is_some());
}

#[test]
fn reparse_is_idempotent() {
    let data = parse_gsub_font(layout_table(&graph_spec()));
    let first = Font::parse(&data).unwrap();
    let second = Font::parse(&data).unwrap();
    let a = first.gsub().unwrap();
    let b = second.gsub().unwrap();
    assert_eq!(a.scripts().len(), b.scripts().len());
    assert_eq!(a.features().len(), b.features().len());
    assert_eq!(a.lookups().len(), b.lookups().len());
    for index in 0..a.scripts().len() {
        let sa = a.scripts().get(index).unwrap();
        let sb = b.scripts().get(index).unwrap();
        assert_eq!(sa.tag, sb.tag);
        for (la, lb) in sa.language_systems().zip(sb.language_systems()) {
            assert_eq!(la.tag, lb.tag);
            let fa: Vec<u16> = la.feature_indices().iter().collect();
            let fb: Vec<u16> = lb.feature_indices().iter().collect();
            assert_eq!(fa, fb);
        }
    }
    for index in 0..a.features().len() as u16 {
        let fa: Vec<u16> = a.feature(index).unwrap().lookup_indices().iter().collect();
        let fb: Vec<u16> = b.feature(index).unwrap().lookup_indices().iter().collect();
        assert_eq!(fa, fb);
    }
}

#[test]
fn concurrent_script_access_observes_one_instance() {
    let data = parse_gsub_font(layout_table(&graph_spec()));
    let font = Font::parse(&data).unwrap();
    let gsub = font.gsub().unwrap();
    let tag = Tag::new(b"latn");
    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                scope.spawn(|| {
                    let script = gsub.script(tag).unwrap();
                    script as *const _ as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    // Every thread observed the same memoized node.
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn multiple_subst_sequences() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x08, // coverage offset: 8
        0x00, 0x01, // sequence count: 1
        0x00, 0x0E, // sequence offset: 14
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x0A, // glyph: 10
        0x00, 0x02, // glyph count: 2
        0x00, 0x14, // glyph[0]: 20
        0x00, 0x15, // glyph[1]: 21
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(2, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    let node = font.gsub().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    match &node.payload {
        Payload::MultipleSubst1(subst) => {
            let sequence: Vec<u16> = subst.sequence(0).unwrap().iter().collect();
            assert_eq!(sequence, vec![20, 21]);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn context_format_3_has_no_node_coverage() {
    let subtable = vec![
        0x00, 0x03, // format: 3
        0x00, 0x01, // glyph count: 1
        0x00, 0x01, // lookup count: 1
        0x00, 0x0C, // coverage offset: 12
        0x00, 0x00, // sequence index: 0
        0x00, 0x00, // lookup index: 0
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x09, // glyph: 9
    ];
    let gsub = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(5, subtable)]));
    let data = parse_gsub_font(gsub);
    let font = Font::parse(&data).unwrap();
    let node = font.gsub().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    assert!(node.coverage.is_none());
    match &node.payload {
        Payload::SeqContext3(context) => {
            assert_eq!(context.coverages.len(), 1);
            assert_eq!(context.coverages[0].get(9), Some(0));
            let lookup = context.lookups.get(0).unwrap();
            assert_eq!(lookup.sequence_index, 0);
            assert_eq!(lookup.lookup_index, 0);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn single_pos_format_1() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x08, // coverage offset: 8
        0x00, 0x04, // value format: X_ADVANCE
        0xFF, 0xF6, // x advance: -10
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x03, // glyph: 3
    ];
    let gpos = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(1, subtable)]));
    let data = build_test_font(FontSpec {
        gpos,
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    let lookup = font.gpos().unwrap().lookup(0).unwrap();
    assert_eq!(lookup.kind, LookupKind::SinglePos);
    let node = lookup.subtable(0).unwrap();
    match &node.payload {
        Payload::SinglePos1(pos) => {
            assert_eq!(pos.value.x_advance, -10);
            assert_eq!(pos.value.x_placement, 0);
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn pair_pos_format_1_records() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x0C, // coverage offset: 12
        0x00, 0x04, // value format 1: X_ADVANCE
        0x00, 0x00, // value format 2: none
        0x00, 0x01, // pair set count: 1
        0x00, 0x12, // pair set offset: 18
        0x00, 0x01, // coverage format: 1
        0x00, 0x01, // coverage count: 1
        0x00, 0x02, // glyph: 2
        0x00, 0x01, // pair value count: 1
        0x00, 0x07, // second glyph: 7
        0xFF, 0xCE, // x advance: -50
    ];
    let gpos = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(2, subtable)]));
    let data = build_test_font(FontSpec {
        gpos,
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    let node = font.gpos().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    match &node.payload {
        Payload::PairPos1(pos) => {
            let set = pos.pair_set(0).unwrap();
            let pair = set.find(7).unwrap();
            assert_eq!(pair.value1.x_advance, -50);
            assert_eq!(pair.value2.x_advance, 0);
            assert!(set.find(8).is_none());
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn mark_base_pos_anchors() {
    let subtable = vec![
        0x00, 0x01, // format: 1
        0x00, 0x0C, // mark coverage offset: 12
        0x00, 0x12, // base coverage offset: 18
        0x00, 0x01, // mark class count: 1
        0x00, 0x18, // mark array offset: 24
        0x00, 0x24, // base array offset: 36
        // mark coverage
        0x00, 0x01, // format: 1
        0x00, 0x01, // count: 1
        0x00, 0x64, // glyph: 100
        // base coverage
        0x00, 0x01, // format: 1
        0x00, 0x01, // count: 1
        0x00, 0x0A, // glyph: 10
        // mark array
        0x00, 0x01, // mark count: 1
        0x00, 0x00, // class: 0
        0x00, 0x06, // anchor offset: 6
        0x00, 0x01, // anchor format: 1
        0x00, 0x05, // x: 5
        0x00, 0x06, // y: 6
        // base array
        0x00, 0x01, // base count: 1
        0x00, 0x04, // anchor offset: 4
        0x00, 0x01, // anchor format: 1
        0x00, 0x0F, // x: 15
        0x00, 0x10, // y: 16
    ];
    let gpos = layout_table(&LayoutSpec::simple(vec![LookupSpec::new(4, subtable)]));
    let data = build_test_font(FontSpec {
        gpos,
        ..Default::default()
    });
    let font = Font::parse(&data).unwrap();
    let node = font.gpos().unwrap().lookup(0).unwrap().subtable(0).unwrap();
    // Node coverage is the mark coverage.
    assert_eq!(node.coverage.as_ref().unwrap().get(100), Some(0));
    match &node.payload {
        Payload::MarkBasePos1(pos) => {
            assert_eq!(pos.base_coverage.get(10), Some(0));
            let (class, mark_anchor) = pos.mark_anchor(0).unwrap();
            assert_eq!(class, 0);
            assert_eq!((mark_anchor.x, mark_anchor.y), (5, 6));
            let base_anchor = pos.base_anchor(0, 0).unwrap();
            assert_eq!((base_anchor.x, base_anchor.y), (15, 16));
        }
        other => panic!("unexpected payload: {:?}", other),
    }
}
