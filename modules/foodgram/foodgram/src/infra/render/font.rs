//! Embedded `TrueType` font addressed by glyph id (`Identity-H`).

use std::collections::BTreeMap;
use std::fmt::Write as _;

use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use ttf_parser::{Face, GlyphId};

use crate::domain::error::DomainError;

static DEJAVU_SANS: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");
const DEJAVU_SANS_NAME: &str = "DejaVuSans";

/// `beginbfchar` blocks hold at most 100 entries.
const BFCHAR_BLOCK: usize = 100;

/// Encodes text as big-endian glyph ids and records every glyph it used,
/// so the embedded font can carry their widths and a `ToUnicode` map.
pub(super) struct GlyphEncoder<'a> {
    name: &'a str,
    data: &'a [u8],
    face: Face<'a>,
    fallback: u16,
    used: BTreeMap<u16, char>,
}

impl GlyphEncoder<'static> {
    pub(super) fn dejavu_sans() -> Result<Self, DomainError> {
        Self::new(DEJAVU_SANS_NAME, DEJAVU_SANS)
    }
}

impl<'a> GlyphEncoder<'a> {
    pub(super) fn new(name: &'a str, data: &'a [u8]) -> Result<Self, DomainError> {
        let face = Face::parse(data, 0)
            .map_err(|e| DomainError::internal(format!("embedded font {name} is unreadable: {e}")))?;
        let fallback = face.glyph_index('?').map_or(0, |GlyphId(gid)| gid);
        Ok(Self {
            name,
            data,
            face,
            fallback,
            used: BTreeMap::new(),
        })
    }

    fn glyph(&self, c: char) -> (u16, char) {
        match self.face.glyph_index(c) {
            Some(GlyphId(gid)) if gid != 0 && !c.is_control() => (gid, c),
            _ => (self.fallback, '?'),
        }
    }

    /// Hex string operand for `Tj`. Characters the font lacks show as `?`.
    pub(super) fn encode(&mut self, text: &str) -> Object {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for c in text.chars() {
            let (gid, shown) = self.glyph(c);
            self.used.entry(gid).or_insert(shown);
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    /// Advance width in text space units (1/1000 em).
    fn width(&self, gid: u16) -> i64 {
        let em = i64::from(self.face.units_per_em().max(1));
        let advance = i64::from(self.face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0));
        advance * 1000 / em
    }

    fn descriptor(&self, font_file_id: ObjectId) -> Object {
        let bbox = self.face.global_bounding_box();
        let ascent = self.face.ascender();
        let cap_height = self.face.capital_height().unwrap_or(ascent);
        // Flags: nonsymbolic.
        Object::Dictionary(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.name.as_bytes().to_vec()),
            "Flags" => Object::Integer(32),
            "FontBBox" => vec![
                Object::Integer(bbox.x_min.into()),
                Object::Integer(bbox.y_min.into()),
                Object::Integer(bbox.x_max.into()),
                Object::Integer(bbox.y_max.into()),
            ],
            "ItalicAngle" => Object::Integer(0),
            "Ascent" => Object::Integer(ascent.into()),
            "Descent" => Object::Integer(self.face.descender().into()),
            "CapHeight" => Object::Integer(cap_height.into()),
            "StemV" => Object::Integer(80),
            "FontFile2" => font_file_id,
        })
    }

    /// Add the font program and its dictionaries to `doc` and return the
    /// id of the `Type0` font dictionary.
    pub(super) fn embed(self, doc: &mut Document) -> Result<ObjectId, DomainError> {
        let length = i64::try_from(self.data.len())
            .map_err(|_| DomainError::internal("embedded font is too large"))?;
        let mut font_file = Stream::new(dictionary! { "Length1" => length }, self.data.to_vec());
        font_file
            .compress()
            .map_err(|e| DomainError::internal(format!("font compression failed: {e}")))?;
        let font_file_id = doc.add_object(font_file);
        let descriptor_id = doc.add_object(self.descriptor(font_file_id));

        let widths: Vec<Object> = self
            .used
            .keys()
            .flat_map(|&gid| {
                [
                    Object::Integer(gid.into()),
                    Object::Array(vec![Object::Integer(self.width(gid))]),
                ]
            })
            .collect();
        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.name.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => Object::Integer(0),
            },
            "FontDescriptor" => descriptor_id,
            "DW" => Object::Integer(1000),
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let cmap = to_unicode_cmap(&self.used)
            .map_err(|e| DomainError::internal(format!("ToUnicode map encoding failed: {e}")))?;
        let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));

        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.name.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }))
    }
}

/// `ToUnicode` `CMap` mapping each used glyph id back to its character.
fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> Result<String, std::fmt::Error> {
    let mut out = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for block in entries.chunks(BFCHAR_BLOCK) {
        writeln!(out, "{} beginbfchar", block.len())?;
        for (gid, c) in block {
            write!(out, "<{gid:04X}> <")?;
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(out, "{unit:04X}")?;
            }
            out.push_str(">\n");
        }
        out.push_str("endbfchar\n");
    }
    out.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    Ok(out)
}
