//! Font resources for one PDF document.
//!
//! Built-in faces are Type1 Helvetica with WinAnsiEncoding. Embedded faces are
//! written as Type0 fonts with a CIDFontType2 descendant, Identity-H encoding
//! and glyph IDs as CIDs, so shaped glyph runs can be shown directly. Glyph
//! widths and the ToUnicode map cover exactly the glyphs the document used.

use super::writer::StreamingPdfWriter;
use crate::fonts::metrics::encode_winansi;
use crate::fonts::{FaceId, FontHandle, FontRegistry, LoadedFace, ShapedGlyph};
use lopdf::content::Operation;
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use rustybuzz::ttf_parser::GlyphId;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Seek, Write};

#[derive(Debug, Default)]
struct GlyphUse {
    width: i64,
    text: String,
}

#[derive(Debug)]
struct UsedFont {
    resource: String,
    glyphs: BTreeMap<u16, GlyphUse>,
}

pub struct PdfFontSet<'r> {
    registry: &'r FontRegistry,
    used: BTreeMap<FontHandle, UsedFont>,
}

impl<'r> PdfFontSet<'r> {
    pub fn new(registry: &'r FontRegistry) -> Self {
        Self {
            registry,
            used: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &'r FontRegistry {
        self.registry
    }

    /// The resource name (`F1`, `F2`, ...) for `font`, registering it on first use.
    pub fn resource(&mut self, font: FontHandle) -> String {
        let next = self.used.len() + 1;
        self.used
            .entry(font)
            .or_insert_with(|| UsedFont {
                resource: format!("F{}", next),
                glyphs: BTreeMap::new(),
            })
            .resource
            .clone()
    }

    /// The text-showing operations for `text` in `font` at `size`.
    pub fn show_text(&mut self, font: FontHandle, text: &str, size: f32) -> Vec<Operation> {
        let resource = self.resource(font);
        match font {
            FontHandle::Embedded(id) => match self.show_shaped(id, text, size) {
                Some(ops) => ops,
                None => {
                    log::warn!("Shaping failed for font '{}'; drawing nothing.", resource);
                    Vec::new()
                }
            },
            FontHandle::Builtin { .. } => vec![Operation::new(
                "Tj",
                vec![Object::String(encode_winansi(text), StringFormat::Literal)],
            )],
        }
    }

    fn show_shaped(&mut self, id: FaceId, text: &str, size: f32) -> Option<Vec<Operation>> {
        let registry = self.registry;
        let loaded = registry.face(id)?;
        let face = loaded.as_face()?;
        let glyphs = registry.shape(id, text)?;
        let upem = loaded.units_per_em.max(1) as f32;
        let used = &mut self.used.get_mut(&FontHandle::Embedded(id))?.glyphs;

        let mut clusters: Vec<u32> = glyphs.iter().map(|g| g.cluster).collect();
        clusters.sort_unstable();
        clusters.dedup();
        let cluster_end = |start: u32| -> usize {
            clusters
                .iter()
                .find(|&&c| c > start)
                .map(|&c| c as usize)
                .unwrap_or(text.len())
        };

        let mut placed = Vec::with_capacity(glyphs.len());
        let mut seen_clusters = Vec::new();
        for glyph in glyphs {
            let natural = face.glyph_hor_advance(GlyphId(glyph.id)).unwrap_or(0) as f32;
            let entry = used.entry(glyph.id).or_insert_with(|| GlyphUse {
                width: (natural * 1000.0 / upem).round() as i64,
                text: String::new(),
            });
            if !seen_clusters.contains(&glyph.cluster) {
                seen_clusters.push(glyph.cluster);
                if entry.text.is_empty() {
                    let start = glyph.cluster as usize;
                    entry.text = text.get(start..cluster_end(glyph.cluster)).unwrap_or("").to_string();
                }
            }

            placed.push((glyph, natural));
        }
        Some(glyph_run_operations(&placed, upem, size))
    }

    /// Writes every used font and returns the `/Font` resource dictionary.
    pub fn finish<W: Write + Seek>(self, writer: &mut StreamingPdfWriter<W>) -> Dictionary {
        let mut resources = Dictionary::new();
        for (font, used) in self.used {
            let object: Object = match font {
                FontHandle::Builtin { bold } => builtin_font(bold).into(),
                FontHandle::Embedded(id) => match self.registry.face(id) {
                    Some(face) => Object::Reference(embed_font(writer, face, &used.glyphs)),
                    None => builtin_font(false).into(),
                },
            };
            resources.set(used.resource.as_bytes().to_vec(), object);
        }
        resources
    }
}

/// Operations showing a shaped run, each glyph paired with its natural
/// advance. `TJ` adjustments move the pen from the natural advance to the
/// shaped one and apply horizontal offsets; a vertical offset closes the
/// current `TJ` and sets a text rise until the offset changes.
fn glyph_run_operations(glyphs: &[(ShapedGlyph, f32)], upem: f32, size: f32) -> Vec<Operation> {
    fn flush(ops: &mut Vec<Operation>, array: &mut Vec<Object>) {
        if !array.is_empty() {
            ops.push(Operation::new("TJ", vec![Object::Array(std::mem::take(array))]));
        }
    }

    let mut ops = Vec::new();
    let mut array = Vec::with_capacity(glyphs.len() * 2);
    let mut rise = 0.0f32;
    for (glyph, natural) in glyphs {
        let glyph_rise = glyph.y_offset as f32 * size / upem;
        if (glyph_rise - rise).abs() > 0.001 {
            flush(&mut ops, &mut array);
            ops.push(Operation::new("Ts", vec![glyph_rise.into()]));
            rise = glyph_rise;
        }

        // TJ numbers are thousandths of an em, subtracted from the pen position.
        let shift = glyph.x_offset as f32 * 1000.0 / upem;
        if shift.abs() > 0.01 {
            array.push((-shift).into());
        }
        array.push(Object::String(glyph.id.to_be_bytes().to_vec(), StringFormat::Hexadecimal));
        let adjust = (natural - glyph.advance as f32) * 1000.0 / upem + shift;
        if adjust.abs() > 0.01 {
            array.push(adjust.into());
        }
    }
    flush(&mut ops, &mut array);
    if rise != 0.0 {
        ops.push(Operation::new("Ts", vec![0.into()]));
    }
    ops
}

fn builtin_font(bold: bool) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => if bold { "Helvetica-Bold" } else { "Helvetica" },
        "Encoding" => "WinAnsiEncoding",
    }
}

fn embed_font<W: Write + Seek>(
    writer: &mut StreamingPdfWriter<W>,
    loaded: &LoadedFace,
    glyphs: &BTreeMap<u16, GlyphUse>,
) -> ObjectId {
    let base_font = loaded.postscript_name.replace(' ', "");
    let scale = 1000.0 / loaded.units_per_em.max(1) as f32;
    let (bbox, ascent, descent, cap_height) = match loaded.as_face() {
        Some(face) => {
            let b = face.global_bounding_box();
            let scaled = |v: i16| (v as f32 * scale).round() as i64;
            (
                vec![scaled(b.x_min), scaled(b.y_min), scaled(b.x_max), scaled(b.y_max)],
                scaled(face.ascender()),
                scaled(face.descender()),
                scaled(face.capital_height().unwrap_or(face.ascender())),
            )
        }
        None => (vec![0, -250, 1000, 1000], 1000, -250, 700),
    };

    let file = Stream::new(
        dictionary! { "Length1" => loaded.data.len() as i64 },
        loaded.data.as_ref().clone(),
    );
    let file_id = writer.buffer_object(file.into());

    let descriptor_id = writer.buffer_object(
        dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(base_font.as_bytes().to_vec()),
            "Flags" => 32,
            "FontBBox" => bbox.into_iter().map(Object::Integer).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => cap_height,
            "StemV" => 80,
            "FontFile2" => file_id,
        }
        .into(),
    );

    let widths: Vec<Object> = glyphs
        .iter()
        .flat_map(|(gid, g)| {
            [
                Object::Integer(*gid as i64),
                Object::Array(vec![Object::Integer(g.width)]),
            ]
        })
        .collect();

    let cid_font_id = writer.buffer_object(
        dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "CIDToGIDMap" => "Identity",
            "DW" => 1000,
            "W" => widths,
        }
        .into(),
    );

    let to_unicode_id = writer.buffer_object(
        Stream::new(dictionary! {}, to_unicode_cmap(glyphs).into_bytes()).into(),
    );

    writer.buffer_object(
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }
        .into(),
    )
}

fn to_unicode_cmap(glyphs: &BTreeMap<u16, GlyphUse>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    let mapped: Vec<(&u16, &GlyphUse)> = glyphs.iter().filter(|(_, g)| !g.text.is_empty()).collect();
    for chunk in mapped.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, g) in chunk {
            let utf16: String = g.text.encode_utf16().map(|u| format!("{:04X}", u)).collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, utf16);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resources_are_numbered_in_first_use_order() {
        let registry = FontRegistry::builtin();
        let mut fonts = PdfFontSet::new(&registry);
        assert_eq!(fonts.resource(FontHandle::BOLD), "F1");
        assert_eq!(fonts.resource(FontHandle::REGULAR), "F2");
        assert_eq!(fonts.resource(FontHandle::BOLD), "F1");
    }

    #[test]
    fn builtin_text_is_winansi_literal() {
        let registry = FontRegistry::builtin();
        let mut fonts = PdfFontSet::new(&registry);
        let ops = fonts.show_text(FontHandle::REGULAR, "₹ 10", 10.0);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operator, "Tj");
        assert!(matches!(&ops[0].operands[..], [Object::String(bytes, StringFormat::Literal)] if bytes == b"? 10"));
    }

    fn glyph(id: u16, advance: i32, x_offset: i32, y_offset: i32) -> ShapedGlyph {
        ShapedGlyph {
            id,
            advance,
            x_offset,
            y_offset,
            cluster: 0,
        }
    }

    fn numbers(op: &Operation) -> Vec<f32> {
        let Some(Object::Array(items)) = op.operands.first() else {
            panic!("{} has no array operand", op.operator);
        };
        items.iter().filter_map(|item| item.as_float().ok()).collect()
    }

    #[test]
    fn unpositioned_run_is_one_tj() {
        let glyphs = [(glyph(3, 500, 0, 0), 500.0), (glyph(4, 600, 0, 0), 600.0)];
        let ops = glyph_run_operations(&glyphs, 1000.0, 10.0);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operator, "TJ");
        assert!(numbers(&ops[0]).is_empty());
    }

    #[test]
    fn zero_advance_mark_is_pulled_back_over_its_base() {
        // Base glyph, then a combining mark whose natural width is 300 but
        // which the shaper places with no advance and 120 units to the left.
        let glyphs = [(glyph(10, 500, 0, 0), 500.0), (glyph(11, 0, -120, 0), 300.0)];
        let ops = glyph_run_operations(&glyphs, 1000.0, 10.0);
        assert_eq!(ops.len(), 1);
        // Move 120 left before the mark, then undo its 300 width and the shift.
        assert_eq!(numbers(&ops[0]), vec![120.0, 180.0]);
    }

    #[test]
    fn vertical_offsets_set_and_reset_text_rise() {
        let glyphs = [
            (glyph(10, 500, 0, 0), 500.0),
            (glyph(12, 0, 0, 200), 0.0),
            (glyph(13, 400, 0, 0), 400.0),
        ];
        let ops = glyph_run_operations(&glyphs, 1000.0, 10.0);
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["TJ", "Ts", "TJ", "Ts", "TJ"]);
        assert_eq!(ops[1].operands[0].as_float().unwrap(), 2.0);
        assert_eq!(ops[3].operands[0].as_float().unwrap(), 0.0);
    }

    #[test]
    fn cmap_maps_glyphs_to_utf16() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert(
            7,
            GlyphUse {
                width: 500,
                text: "கி".into(),
            },
        );
        glyphs.insert(9, GlyphUse::default());
        let cmap = to_unicode_cmap(&glyphs);
        assert!(cmap.contains("1 beginbfchar"));
        assert!(cmap.contains("<0007> <0B950BBF>"));
    }
}
