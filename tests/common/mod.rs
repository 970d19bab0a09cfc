//! Helpers for assembling synthetic fonts.
#![allow(dead_code)]

/// Appends a big-endian u16.
pub fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Appends a big-endian u32.
pub fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// A lookup for the layout table builder.
pub struct LookupSpec {
    pub kind: u16,
    pub flag: u16,
    pub mark_filtering_set: Option<u16>,
    pub subtables: Vec<Vec<u8>>,
}

impl LookupSpec {
    pub fn new(kind: u16, subtable: Vec<u8>) -> Self {
        Self {
            kind,
            flag: 0,
            mark_filtering_set: None,
            subtables: vec![subtable],
        }
    }

    pub fn with_flag(kind: u16, flag: u16, subtable: Vec<u8>) -> Self {
        Self {
            kind,
            flag,
            mark_filtering_set: None,
            subtables: vec![subtable],
        }
    }
}

/// A script for the layout table builder.
pub struct ScriptSpec {
    pub tag: [u8; 4],
    /// Feature indices of the default language system, if present.
    pub default_features: Option<Vec<u16>>,
    /// Explicit language systems as (tag, feature indices).
    pub langs: Vec<([u8; 4], Vec<u16>)>,
}

/// A feature for the layout table builder.
pub struct FeatureSpec {
    pub tag: [u8; 4],
    pub lookups: Vec<u16>,
}

/// Full description of a GSUB or GPOS table.
pub struct LayoutSpec {
    pub scripts: Vec<ScriptSpec>,
    pub features: Vec<FeatureSpec>,
    pub lookups: Vec<LookupSpec>,
}

impl LayoutSpec {
    /// One `DFLT` script with a default language system selecting feature
    /// 0, one `test` feature selecting every lookup.
    pub fn simple(lookups: Vec<LookupSpec>) -> Self {
        let indices: Vec<u16> = (0..lookups.len() as u16).collect();
        Self {
            scripts: vec![ScriptSpec {
                tag: *b"DFLT",
                default_features: Some(vec![0]),
                langs: Vec::new(),
            }],
            features: vec![FeatureSpec {
                tag: *b"test",
                lookups: indices,
            }],
            lookups,
        }
    }
}

fn lang_sys(features: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 0); // lookupOrderOffset (reserved)
    push_u16(&mut out, 0xFFFF); // requiredFeatureIndex: none
    push_u16(&mut out, features.len() as u16);
    for &index in features {
        push_u16(&mut out, index);
    }
    out
}

fn script_table(script: &ScriptSpec) -> Vec<u8> {
    let header_len = 4 + 6 * script.langs.len();
    let mut tables = Vec::new();
    let default_offset = if let Some(features) = &script.default_features {
        let offset = header_len + tables.len();
        tables.extend_from_slice(&lang_sys(features));
        offset as u16
    } else {
        0
    };
    let mut lang_offsets = Vec::new();
    for (_, features) in &script.langs {
        lang_offsets.push((header_len + tables.len()) as u16);
        tables.extend_from_slice(&lang_sys(features));
    }
    let mut out = Vec::new();
    push_u16(&mut out, default_offset);
    push_u16(&mut out, script.langs.len() as u16);
    for ((tag, _), offset) in script.langs.iter().zip(lang_offsets) {
        out.extend_from_slice(tag);
        push_u16(&mut out, offset);
    }
    out.extend_from_slice(&tables);
    out
}

fn script_section(scripts: &[ScriptSpec]) -> Vec<u8> {
    let header_len = 2 + 6 * scripts.len();
    let mut tables = Vec::new();
    let mut offsets = Vec::new();
    for script in scripts {
        offsets.push((header_len + tables.len()) as u16);
        tables.extend_from_slice(&script_table(script));
    }
    let mut out = Vec::new();
    push_u16(&mut out, scripts.len() as u16);
    for (script, offset) in scripts.iter().zip(offsets) {
        out.extend_from_slice(&script.tag);
        push_u16(&mut out, offset);
    }
    out.extend_from_slice(&tables);
    out
}

fn feature_section(features: &[FeatureSpec]) -> Vec<u8> {
    let header_len = 2 + 6 * features.len();
    let mut tables = Vec::new();
    let mut offsets = Vec::new();
    for feature in features {
        offsets.push((header_len + tables.len()) as u16);
        push_u16(&mut tables, 0); // featureParamsOffset
        push_u16(&mut tables, feature.lookups.len() as u16);
        for &index in &feature.lookups {
            push_u16(&mut tables, index);
        }
    }
    let mut out = Vec::new();
    push_u16(&mut out, features.len() as u16);
    for (feature, offset) in features.iter().zip(offsets) {
        out.extend_from_slice(&feature.tag);
        push_u16(&mut out, offset);
    }
    out.extend_from_slice(&tables);
    out
}

fn lookup_table(spec: &LookupSpec) -> Vec<u8> {
    let mut header_len = 6 + 2 * spec.subtables.len();
    if spec.mark_filtering_set.is_some() {
        header_len += 2;
    }
    let mut out = Vec::new();
    push_u16(&mut out, spec.kind);
    push_u16(&mut out, spec.flag);
    push_u16(&mut out, spec.subtables.len() as u16);
    let mut offset = header_len;
    for subtable in &spec.subtables {
        push_u16(&mut out, offset as u16);
        offset += subtable.len();
    }
    if let Some(set) = spec.mark_filtering_set {
        push_u16(&mut out, set);
    }
    for subtable in &spec.subtables {
        out.extend_from_slice(subtable);
    }
    out
}

fn lookup_section(lookups: &[LookupSpec]) -> Vec<u8> {
    let header_len = 2 + 2 * lookups.len();
    let mut tables = Vec::new();
    let mut offsets = Vec::new();
    for lookup in lookups {
        offsets.push((header_len + tables.len()) as u16);
        tables.extend_from_slice(&lookup_table(lookup));
    }
    let mut out = Vec::new();
    push_u16(&mut out, lookups.len() as u16);
    for offset in offsets {
        push_u16(&mut out, offset);
    }
    out.extend_from_slice(&tables);
    out
}

/// Assembles a GSUB or GPOS table from the specification.
pub fn layout_table(spec: &LayoutSpec) -> Vec<u8> {
    let scripts = script_section(&spec.scripts);
    let features = feature_section(&spec.features);
    let lookups = lookup_section(&spec.lookups);
    let script_base = 10u16;
    let feature_base = script_base + scripts.len() as u16;
    let lookup_base = feature_base + features.len() as u16;
    let mut out = Vec::new();
    push_u16(&mut out, 1); // majorVersion
    push_u16(&mut out, 0); // minorVersion
    push_u16(&mut out, script_base);
    push_u16(&mut out, feature_base);
    push_u16(&mut out, lookup_base);
    out.extend_from_slice(&scripts);
    out.extend_from_slice(&features);
    out.extend_from_slice(&lookups);
    out
}

/// An empty but valid layout table: zero scripts, features and lookups.
pub fn empty_layout_table() -> Vec<u8> {
    layout_table(&LayoutSpec {
        scripts: Vec::new(),
        features: Vec::new(),
        lookups: Vec::new(),
    })
}

/// A GDEF table with the specified section offsets patched in. Sections
/// are appended in argument order.
pub fn gdef_table(glyph_classes: Option<Vec<u8>>, mark_attach: Option<Vec<u8>>) -> Vec<u8> {
    let header_len = 12;
    let mut sections = Vec::new();
    let classes_offset = match &glyph_classes {
        Some(bytes) => {
            let offset = header_len + sections.len();
            sections.extend_from_slice(bytes);
            offset as u16
        }
        None => 0,
    };
    let mark_attach_offset = match &mark_attach {
        Some(bytes) => {
            let offset = header_len + sections.len();
            sections.extend_from_slice(bytes);
            offset as u16
        }
        None => 0,
    };
    let mut out = Vec::new();
    push_u16(&mut out, 1); // majorVersion
    push_u16(&mut out, 0); // minorVersion
    push_u16(&mut out, classes_offset);
    push_u16(&mut out, 0); // attachListOffset
    push_u16(&mut out, 0); // ligCaretListOffset
    push_u16(&mut out, mark_attach_offset);
    out.extend_from_slice(&sections);
    out
}

/// A format 2 class definition assigning one class to one glyph range.
pub fn class_def_range(start: u16, end: u16, class: u16) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 2); // format
    push_u16(&mut out, 1); // rangeCount
    push_u16(&mut out, start);
    push_u16(&mut out, end);
    push_u16(&mut out, class);
    out
}

/// Assembles a complete font image from (tag, data) pairs. Tags must be
/// passed in ascending order; tables are padded to 4-byte alignment.
pub fn build_font(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x00010000); // sfnt version
    push_u16(&mut out, tables.len() as u16);
    push_u16(&mut out, 0); // searchRange
    push_u16(&mut out, 0); // entrySelector
    push_u16(&mut out, 0); // rangeShift
    let mut offset = 12 + 16 * tables.len();
    let mut blobs = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0); // checksum (unchecked)
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);
        let mut blob = data.clone();
        while blob.len() % 4 != 0 {
            blob.push(0);
        }
        offset += blob.len();
        blobs.push(blob);
    }
    for blob in blobs {
        out.extend_from_slice(&blob);
    }
    out
}

/// Parameters for a minimal complete font.
pub struct FontSpec {
    pub gsub: Vec<u8>,
    pub gpos: Vec<u8>,
    pub gdef: Option<Vec<u8>>,
    pub num_glyphs: u16,
    pub num_long_metrics: u16,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            gsub: empty_layout_table(),
            gpos: empty_layout_table(),
            gdef: None,
            num_glyphs: 4,
            num_long_metrics: 4,
        }
    }
}

/// Assembles a minimal complete font around the specified layout tables.
pub fn build_test_font(spec: FontSpec) -> Vec<u8> {
    let mut head = vec![0u8; 54];
    head[18..20].copy_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    let mut hhea = vec![0u8; 36];
    hhea[34..36].copy_from_slice(&spec.num_long_metrics.to_be_bytes());
    let hmtx_len = 4 * spec.num_long_metrics as usize
        + 2 * (spec.num_glyphs as usize).saturating_sub(spec.num_long_metrics as usize);
    let hmtx = vec![0u8; hmtx_len];
    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x00005000); // version 0.5
    push_u16(&mut maxp, spec.num_glyphs);
    let mut name = Vec::new();
    push_u16(&mut name, 0); // version
    push_u16(&mut name, 0); // count
    push_u16(&mut name, 6); // storageOffset
    let os2 = vec![0u8; 78];
    let post = vec![0u8; 32];
    let cmap = vec![0u8; 4];

    let mut tables: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    if let Some(gdef) = spec.gdef {
        tables.push((*b"GDEF", gdef));
    }
    tables.push((*b"GPOS", spec.gpos));
    tables.push((*b"GSUB", spec.gsub));
    tables.push((*b"OS/2", os2));
    tables.push((*b"cmap", cmap));
    tables.push((*b"head", head));
    tables.push((*b"hhea", hhea));
    tables.push((*b"hmtx", hmtx));
    tables.push((*b"maxp", maxp));
    tables.push((*b"name", name));
    tables.push((*b"post", post));
    build_font(&tables)
}
