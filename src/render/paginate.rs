//! Flows a block stream onto fixed-size pages.
//!
//! The paginator is a deterministic iterator: running it twice over the same
//! blocks yields identical pages, which is what lets the assembler count pages
//! in a first pass and print "Page N of M" in the second.

use crate::fonts::{FontHandle, FontRegistry};
use crate::layout::block::{
    Align, Cell, Color, FontPair, PageBlock, Padding, ParagraphBlock, TableBlock,
};
use crate::layout::text::wrap;

/// Line height as a multiple of the font size.
pub const LEADING: f32 = 1.2;
/// Baseline offset from the top of a line, as a multiple of the font size.
const BASELINE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin_top: margin,
            margin_right: margin,
            margin_bottom: margin,
            margin_left: margin,
        }
    }

    pub fn a4() -> Self {
        Self::new(595.0, 842.0, 72.0)
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    fn frame_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

/// A drawing instruction in PDF coordinates (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedItem {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: FontHandle,
        size: f32,
        color: Color,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    /// 1-based.
    pub number: usize,
    pub items: Vec<PlacedItem>,
}

impl LaidOutPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            PlacedItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Page being filled. `cursor` runs top-down from the top margin.
struct PageState {
    items: Vec<PlacedItem>,
    cursor: f32,
}

impl PageState {
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct MeasuredRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

pub struct Paginator<'a> {
    blocks: &'a [PageBlock],
    registry: &'a FontRegistry,
    geometry: PageGeometry,
    next_block: usize,
    /// Next body row of a table split across pages.
    next_row: usize,
    pages_emitted: usize,
    finished: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(blocks: &'a [PageBlock], registry: &'a FontRegistry, geometry: PageGeometry) -> Self {
        Self {
            blocks,
            registry,
            geometry,
            next_block: 0,
            next_row: 0,
            pages_emitted: 0,
            finished: false,
        }
    }

    fn wrap_cell(&self, cell: &Cell, fonts: &FontPair, width: f32) -> Vec<String> {
        let font = cell.font(fonts);
        let size = cell.size();
        wrap(cell.text(), width.max(1.0), cell.wrap(), |s| {
            self.registry.measure(font, s, size)
        })
    }

    fn measure_row(&self, cells: &[Cell], table: &TableBlock, padding: Padding) -> MeasuredRow {
        let mut content_height: f32 = 0.0;
        let wrapped = cells
            .iter()
            .zip(&table.style.column_widths)
            .map(|(cell, width)| {
                let lines = self.wrap_cell(cell, &table.style.fonts, width - padding.left - padding.right);
                content_height = content_height.max(lines.len() as f32 * cell.size() * LEADING);
                lines
            })
            .collect();
        MeasuredRow {
            cells: wrapped,
            height: content_height + padding.top + padding.bottom,
        }
    }

    fn place_row(&self, page: &mut PageState, table: &TableBlock, cells: &[Cell], row: &MeasuredRow, header: bool) {
        let style = &table.style;
        let (padding, text_color) = if header {
            (style.header_padding, style.header_text)
        } else {
            (style.body_padding, style.body_text)
        };
        let left = self.geometry.margin_left + (self.geometry.frame_width() - style.width()) / 2.0;
        let top = page.cursor;
        let pdf_bottom = self.geometry.height - (top + row.height);

        if header {
            page.items.push(PlacedItem::FillRect {
                x: left,
                y: pdf_bottom,
                width: style.width(),
                height: row.height,
                color: style.header_background,
            });
        }

        let mut x = left;
        for ((cell, lines), width) in cells.iter().zip(&row.cells).zip(&style.column_widths) {
            let size = cell.size();
            let font = cell.font(&style.fonts);
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let line_top = top + padding.top + i as f32 * size * LEADING;
                page.items.push(PlacedItem::Text {
                    x: x + padding.left,
                    baseline: self.geometry.height - (line_top + size * BASELINE),
                    text: line.clone(),
                    font,
                    size,
                    color: text_color,
                });
            }
            page.items.push(PlacedItem::StrokeRect {
                x,
                y: pdf_bottom,
                width: *width,
                height: row.height,
                line_width: style.grid_width,
                color: style.grid_color,
            });
            x += width;
        }
        page.cursor += row.height;
    }

    /// Places rows of `table` starting at `self.next_row`. Returns `true` when
    /// the table is complete, `false` when the page filled up first.
    fn place_table(&mut self, page: &mut PageState, table: &TableBlock) -> bool {
        let bottom = self.geometry.frame_bottom();
        let continuing = self.next_row > 0;
        let header = self.measure_row(&table.header, table, table.style.header_padding);

        if !continuing || table.repeat_header {
            // Keep the header with at least the first row it introduces.
            let first_row = table
                .rows
                .get(self.next_row)
                .map(|r| self.measure_row(r, table, table.style.body_padding).height)
                .unwrap_or(0.0);
            if !page.is_empty() && page.cursor + header.height + first_row > bottom {
                return false;
            }
            self.place_row(page, table, &table.header, &header, true);
        }

        let mut placed_on_page = 0;
        while let Some(cells) = table.rows.get(self.next_row) {
            let row = self.measure_row(cells, table, table.style.body_padding);
            if page.cursor + row.height > bottom {
                if placed_on_page > 0 {
                    return false;
                }
                // Only reachable on a fresh page: the row can never fit.
                log::debug!("Row {} overflows the page frame; placing anyway.", self.next_row);
            }
            self.place_row(page, table, cells, &row, false);
            placed_on_page += 1;
            self.next_row += 1;
        }
        self.next_row = 0;
        true
    }

    fn place_paragraph(&self, page: &mut PageState, p: &ParagraphBlock) -> bool {
        let frame_width = self.geometry.frame_width();
        let lines = self.wrap_cell(&p.cell, &p.fonts, frame_width);
        let size = p.cell.size();
        let text_height = lines.len() as f32 * size * LEADING;
        if !page.is_empty() && page.cursor + text_height > self.geometry.frame_bottom() {
            return false;
        }
        let font = p.cell.font(&p.fonts);
        for (i, line) in lines.iter().enumerate() {
            let width = self.registry.measure(font, line, size);
            let x = match p.align {
                Align::Left => self.geometry.margin_left,
                Align::Center => self.geometry.margin_left + (frame_width - width) / 2.0,
                Align::Right => self.geometry.margin_left + frame_width - width,
            };
            let line_top = page.cursor + i as f32 * size * LEADING;
            page.items.push(PlacedItem::Text {
                x,
                baseline: self.geometry.height - (line_top + size * BASELINE),
                text: line.clone(),
                font,
                size,
                color: p.color,
            });
        }
        page.cursor += text_height + p.space_after;
        true
    }
}

impl Iterator for Paginator<'_> {
    type Item = LaidOutPage;

    fn next(&mut self) -> Option<LaidOutPage> {
        if self.finished {
            return None;
        }
        let mut page = PageState {
            items: Vec::new(),
            cursor: self.geometry.margin_top,
        };
        let bottom = self.geometry.frame_bottom();

        while let Some(block) = self.blocks.get(self.next_block) {
            match block {
                PageBlock::Spacer(height) => {
                    self.next_block += 1;
                    if page.cursor + height > bottom {
                        // Spacers are dropped at page boundaries.
                        if !page.is_empty() {
                            break;
                        }
                    } else {
                        page.cursor += height;
                    }
                }
                PageBlock::PageBreak => {
                    self.next_block += 1;
                    if !page.is_empty() {
                        break;
                    }
                }
                PageBlock::Paragraph(p) => {
                    if !self.place_paragraph(&mut page, p) {
                        break;
                    }
                    self.next_block += 1;
                }
                PageBlock::Table(t) => {
                    if !self.place_table(&mut page, t) {
                        break;
                    }
                    self.next_block += 1;
                }
            }
        }

        if self.next_block >= self.blocks.len() {
            self.finished = true;
            if page.is_empty() && self.pages_emitted > 0 {
                return None;
            }
        }
        self.pages_emitted += 1;
        Some(LaidOutPage {
            number: self.pages_emitted,
            items: page.items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::block::{ParagraphRole, TableKind, TableStyle, Weight, WrapMode};

    fn plain(text: &str, size: f32) -> Cell {
        Cell::Plain {
            text: text.into(),
            weight: Weight::Regular,
            size,
        }
    }

    fn table(rows: usize, repeat_header: bool) -> PageBlock {
        PageBlock::Table(TableBlock {
            kind: TableKind::Transactions { batch: 0 },
            header: vec![plain("Date", 14.0), plain("Description", 14.0)],
            rows: (0..rows)
                .map(|i| vec![plain(&format!("r{}", i), 10.0), plain("x", 10.0)])
                .collect(),
            repeat_header,
            style: TableStyle {
                column_widths: vec![100.0, 200.0],
                fonts: FontPair::BUILTIN,
                header_background: Color::BRAND_RED,
                header_text: Color::WHITE,
                body_text: Color::BLACK,
                header_padding: Padding::new(3.0, 6.0, 12.0, 6.0),
                body_padding: Padding::new(3.0, 6.0, 3.0, 6.0),
                grid_width: 1.0,
                grid_color: Color::BLACK,
            },
        })
    }

    fn paginate(blocks: &[PageBlock]) -> Vec<LaidOutPage> {
        let registry = FontRegistry::builtin();
        Paginator::new(blocks, &registry, PageGeometry::a4()).collect()
    }

    #[test]
    fn empty_stream_still_yields_one_page() {
        let pages = paginate(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.is_empty());
    }

    #[test]
    fn page_breaks_are_honored_and_not_doubled() {
        let blocks = vec![
            table(1, true),
            PageBlock::PageBreak,
            PageBlock::PageBreak,
            table(1, true),
        ];
        let pages = paginate(&blocks);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].number, 2);
    }

    #[test]
    fn trailing_page_break_adds_no_blank_page() {
        let pages = paginate(&[table(2, true), PageBlock::PageBreak]);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn long_table_splits_and_repeats_header() {
        // 18pt body rows, 31.8pt header: 698pt frame holds about 37 rows.
        let pages = paginate(&[table(100, true)]);
        assert!(pages.len() >= 3);
        for page in &pages {
            assert_eq!(page.texts().filter(|t| *t == "Date").count(), 1);
        }
        let rows: usize = pages
            .iter()
            .map(|p| p.texts().filter(|t| t.starts_with('r')).count())
            .sum();
        assert_eq!(rows, 100);
    }

    #[test]
    fn header_not_repeated_when_disabled() {
        let pages = paginate(&[table(100, false)]);
        let headers: usize = pages
            .iter()
            .map(|p| p.texts().filter(|t| *t == "Date").count())
            .sum();
        assert_eq!(headers, 1);
    }

    #[test]
    fn oversize_row_is_placed_anyway() {
        let huge = "word ".repeat(2000);
        let blocks = vec![PageBlock::Table(TableBlock {
            rows: vec![vec![plain("a", 10.0), plain(&huge, 10.0)], vec![plain("b", 10.0), plain("c", 10.0)]],
            ..match table(0, true) {
                PageBlock::Table(t) => t,
                _ => unreachable!(),
            }
        })];
        let pages = paginate(&blocks);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].texts().any(|t| t == "a"));
        assert!(pages[1].texts().any(|t| t == "b"));
    }

    #[test]
    fn paragraphs_center_within_frame() {
        let blocks = vec![PageBlock::Paragraph(ParagraphBlock {
            role: ParagraphRole::Title,
            cell: Cell::Shaped {
                text: "Title".into(),
                font: FontHandle::BOLD,
                size: 16.0,
                wrap: WrapMode::Clusters,
            },
            fonts: FontPair::BUILTIN,
            color: Color::BRAND_RED,
            align: Align::Center,
            space_after: 30.0,
        })];
        let pages = paginate(&blocks);
        let PlacedItem::Text { x, .. } = &pages[0].items[0] else {
            panic!("expected text");
        };
        let width = FontRegistry::builtin().measure(FontHandle::BOLD, "Title", 16.0);
        assert!((x + width / 2.0 - 595.0 / 2.0).abs() < 0.01);
    }

    #[test]
    fn pagination_is_deterministic() {
        let blocks = vec![table(60, true), PageBlock::PageBreak, table(5, true)];
        assert_eq!(paginate(&blocks), paginate(&blocks));
    }
}
