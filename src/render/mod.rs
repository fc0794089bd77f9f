//! Document assembly: pagination, drawing, and PDF serialization.

pub mod canvas;
pub mod fonts;
pub mod footer;
pub mod paginate;
pub mod writer;

use crate::error::RenderError;
use crate::fonts::FontRegistry;
use crate::layout::block::PageBlock;
use crate::perf::PerfMonitor;
use canvas::PageCanvas;
use chrono::{DateTime, Local};
use fonts::PdfFontSet;
use lopdf::{Object, dictionary};
use paginate::{PageGeometry, Paginator};
use serde::Serialize;
use std::io::{Seek, Write};
use writer::StreamingPdfWriter;

pub use footer::StatementFooter;

/// What a footer callback knows about the page it is drawing on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageContext {
    pub page_number: usize,
    pub total_pages: usize,
    pub page_size: (f32, f32),
}

/// Called once per page after the body has been drawn.
pub type FooterFn<'f> = dyn Fn(&PageContext, &mut PageCanvas<'_, '_>) + 'f;

/// Document-level metadata written to the info dictionary.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    /// Omitted when `None`, so identical inputs produce identical bytes.
    pub created: Option<DateTime<Local>>,
}

impl DocumentInfo {
    fn to_dictionary(&self) -> lopdf::Dictionary {
        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("statement-render ", env!("CARGO_PKG_VERSION"))),
            "Title" => text_string(&self.title),
        };
        if let Some(created) = self.created {
            let offset = created.format("%z").to_string();
            let (hours, minutes) = offset.split_at(offset.len().saturating_sub(2));
            let date = format!("D:{}{}'{}'", created.format("%Y%m%d%H%M%S"), hours, minutes);
            info.set("CreationDate", Object::string_literal(date));
        }
        info
    }
}

/// A PDF text string: literal when ASCII, UTF-16BE with a byte-order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub page_count: usize,
    pub byte_len: u64,
}

/// Counts the pages `blocks` occupy without drawing anything.
pub fn count_pages(blocks: &[PageBlock], registry: &FontRegistry, geometry: PageGeometry) -> usize {
    Paginator::new(blocks, registry, geometry).count()
}

/// Assembles `blocks` into a PDF on `sink`.
///
/// The first pass counts pages so every footer call knows the total; the
/// second pass re-paginates and streams each page to the writer.
pub fn assemble<W: Write + Seek>(
    blocks: &[PageBlock],
    geometry: PageGeometry,
    registry: &FontRegistry,
    footer: &FooterFn<'_>,
    info: &DocumentInfo,
    monitor: Option<&PerfMonitor>,
    sink: W,
) -> Result<(W, AssemblyReport), RenderError> {
    let total_pages = {
        let _span = monitor.map(|m| m.span("pagination"));
        count_pages(blocks, registry, geometry)
    };
    log::info!("Assembling {} page(s).", total_pages);

    let _span = monitor.map(|m| m.span("build_document"));
    let mut writer = StreamingPdfWriter::new(sink, "1.7")
        .map_err(|e| RenderError::assembly("begin_document", e))?;
    let mut fonts = PdfFontSet::new(registry);

    for page in Paginator::new(blocks, registry, geometry) {
        let ctx = PageContext {
            page_number: page.number,
            total_pages,
            page_size: (geometry.width, geometry.height),
        };
        let mut canvas = PageCanvas::new(&mut fonts, geometry.width, geometry.height);
        for item in &page.items {
            canvas.draw_item(item);
        }
        footer(&ctx, &mut canvas);
        writer.add_page(canvas.finish(), geometry.width, geometry.height)?;
    }

    if writer.page_count() != total_pages {
        return Err(RenderError::Pdf(format!(
            "page count changed between passes ({} then {})",
            total_pages,
            writer.page_count()
        )));
    }

    let font_dict = fonts.finish(&mut writer);
    let mut sink = writer
        .finish(font_dict, Some(info.to_dictionary()))
        .map_err(|e| RenderError::assembly("finish_document", e))?;
    let byte_len = sink
        .stream_position()
        .map_err(|e| RenderError::assembly("finish_document", e))?;

    Ok((
        sink,
        AssemblyReport {
            page_count: total_pages,
            byte_len,
        },
    ))
}
