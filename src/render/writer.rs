//! A PDF writer that streams objects to the sink as soon as they are final.
//!
//! Page content streams are written immediately; page dictionaries, fonts,
//! the page tree and the catalog are buffered and written by [`finish`].
//!
//! [`finish`]: StreamingPdfWriter::finish

use crate::error::RenderError;
use lopdf::content::Content;
use lopdf::xref::{Xref, XrefEntry, XrefType};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

pub struct StreamingPdfWriter<W: Write + Seek> {
    writer: W,
    xref: Xref,
    max_id: u32,
    pages_id: ObjectId,
    resources_id: ObjectId,
    catalog_id: ObjectId,
    page_ids: Vec<ObjectId>,
    buffered: BTreeMap<ObjectId, Object>,
    /// Reused between objects so encoding does not allocate per object.
    scratch: Vec<u8>,
}

impl<W: Write + Seek> StreamingPdfWriter<W> {
    pub fn new(mut writer: W, version: &str) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", version).as_bytes())?;
        Ok(Self {
            writer,
            xref: Xref::new(0, XrefType::CrossReferenceTable),
            max_id: 3,
            pages_id: (1, 0),
            resources_id: (2, 0),
            catalog_id: (3, 0),
            page_ids: Vec::new(),
            buffered: BTreeMap::new(),
            scratch: Vec::new(),
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    /// Writes `object` to the sink now.
    pub fn write_object(&mut self, id: ObjectId, object: &Object) -> io::Result<()> {
        let offset = u32::try_from(self.writer.stream_position()?)
            .map_err(|_| io::Error::other("document exceeds the cross-reference offset range"))?;
        self.xref.insert(
            id.0,
            XrefEntry::Normal {
                offset,
                generation: id.1,
            },
        );
        self.scratch.clear();
        self.scratch
            .extend_from_slice(format!("{} {} obj\n", id.0, id.1).as_bytes());
        encode::object(&mut self.scratch, object);
        self.scratch.extend_from_slice(b"\nendobj\n");
        self.writer.write_all(&self.scratch)
    }

    /// Holds `object` until [`finish`](Self::finish).
    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered.insert(id, object);
        id
    }

    /// Writes a page's content stream and queues its page dictionary.
    pub fn add_page(&mut self, content: Content, width: f32, height: f32) -> Result<ObjectId, RenderError> {
        let stream = Stream::new(dictionary! {}, content.encode()?);
        let content_id = self.new_object_id();
        self.write_object(content_id, &Object::Stream(stream))?;

        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.buffer_object(page.into());
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Writes the buffered objects, the page tree and the trailer.
    pub fn finish(mut self, fonts: Dictionary, info: Option<Dictionary>) -> io::Result<W> {
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.buffered.insert(self.pages_id, pages.into());
        self.buffered
            .insert(self.resources_id, dictionary! { "Font" => fonts }.into());
        self.buffered.insert(
            self.catalog_id,
            dictionary! { "Type" => "Catalog", "Pages" => self.pages_id }.into(),
        );
        let info_id = info.map(|dict| self.buffer_object(dict.into()));

        for (id, object) in std::mem::take(&mut self.buffered) {
            self.write_object(id, &object)?;
        }

        let xref_start = self.writer.stream_position()?;
        self.xref.size = self.max_id + 1;
        self.write_xref_table()?;

        let mut trailer = dictionary! { "Size" => self.xref.size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = info_id {
            trailer.set("Info", info_id);
        }
        self.scratch.clear();
        self.scratch.extend_from_slice(b"trailer\n");
        encode::dictionary(&mut self.scratch, &trailer);
        self.scratch
            .extend_from_slice(format!("\nstartxref\n{}\n%%EOF", xref_start).as_bytes());
        self.writer.write_all(&self.scratch)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// One subsection covering every object number; numbers never written
    /// are listed as free.
    fn write_xref_table(&mut self) -> io::Result<()> {
        let mut table = format!("xref\n0 {}\n", self.xref.size);
        for number in 0..self.xref.size {
            match self.xref.get(number) {
                Some(XrefEntry::Normal { offset, generation }) if number > 0 => {
                    table.push_str(&format!("{:010} {:05} n \n", offset, generation));
                }
                _ => table.push_str("0000000000 65535 f \n"),
            }
        }
        self.writer.write_all(table.as_bytes())
    }
}

/// Byte encoding of `lopdf` objects written outside a `Document`.
mod encode {
    use super::*;

    fn is_delimiter(byte: u8) -> bool {
        matches!(byte, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
    }

    pub fn object(out: &mut Vec<u8>, object: &Object) {
        match object {
            Object::Null => out.extend_from_slice(b"null"),
            Object::Boolean(value) => out.extend_from_slice(if *value { b"true" } else { b"false" }),
            Object::Integer(value) => out.extend_from_slice(value.to_string().as_bytes()),
            Object::Real(value) => real(out, *value),
            Object::Name(bytes) => name(out, bytes),
            Object::String(bytes, StringFormat::Literal) => literal(out, bytes),
            Object::String(bytes, StringFormat::Hexadecimal) => hex(out, bytes),
            Object::Array(items) => {
                out.push(b'[');
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        out.push(b' ');
                    }
                    self::object(out, item);
                }
                out.push(b']');
            }
            Object::Dictionary(dict) => dictionary(out, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                dictionary(out, &dict);
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(&stream.content);
                out.extend_from_slice(b"\nendstream");
            }
            Object::Reference((number, generation)) => {
                out.extend_from_slice(format!("{} {} R", number, generation).as_bytes())
            }
        }
    }

    pub fn dictionary(out: &mut Vec<u8>, dict: &Dictionary) {
        out.extend_from_slice(b"<<");
        for (key, value) in dict.iter() {
            name(out, key);
            out.push(b' ');
            object(out, value);
            out.push(b' ');
        }
        out.extend_from_slice(b">>");
    }

    /// Three decimals with trailing zeros dropped; PDF has no exponent form.
    fn real(out: &mut Vec<u8>, value: f32) {
        let text = format!("{:.3}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        match text {
            "" | "-" | "-0" => out.push(b'0'),
            text => out.extend_from_slice(text.as_bytes()),
        }
    }

    fn name(out: &mut Vec<u8>, bytes: &[u8]) {
        out.push(b'/');
        for &byte in bytes {
            if byte.is_ascii_graphic() && byte != b'#' && !is_delimiter(byte) {
                out.push(byte);
            } else {
                out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
            }
        }
    }

    fn literal(out: &mut Vec<u8>, bytes: &[u8]) {
        out.push(b'(');
        for &byte in bytes {
            match byte {
                b'(' | b')' | b'\\' => out.extend_from_slice(&[b'\\', byte]),
                b'\r' => out.extend_from_slice(b"\\r"),
                b'\n' => out.extend_from_slice(b"\\n"),
                _ => out.push(byte),
            }
        }
        out.push(b')');
    }

    fn hex(out: &mut Vec<u8>, bytes: &[u8]) {
        out.push(b'<');
        for byte in bytes {
            out.extend_from_slice(format!("{:02X}", byte).as_bytes());
        }
        out.push(b'>');
    }

}
