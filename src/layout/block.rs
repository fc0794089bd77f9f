//! The block stream produced by the layout engine and consumed by the paginator.

use crate::fonts::FontHandle;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    /// The statement's brand red.
    pub const BRAND_RED: Color = Color { r: 204, g: 26, b: 26 };

    pub(crate) fn components(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Weight {
    Regular,
    Bold,
}

/// Where a line may be broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WrapMode {
    /// At whitespace; over-long words fall back to cluster breaks.
    Words,
    /// Between any two grapheme clusters.
    Clusters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// The regular/bold pair a block resolves plain cells against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPair {
    pub regular: FontHandle,
    pub bold: FontHandle,
}

impl FontPair {
    pub const BUILTIN: FontPair = FontPair {
        regular: FontHandle::REGULAR,
        bold: FontHandle::BOLD,
    };

    pub fn select(&self, weight: Weight) -> FontHandle {
        match weight {
            Weight::Regular => self.regular,
            Weight::Bold => self.bold,
        }
    }
}

/// One run of text in a table cell or paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Latin text; the font comes from the enclosing block's style.
    Plain { text: String, weight: Weight, size: f32 },
    /// Complex-script text bound to its language font and cluster wrapping.
    Shaped {
        text: String,
        font: FontHandle,
        size: f32,
        wrap: WrapMode,
    },
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Plain { text, .. } | Cell::Shaped { text, .. } => text,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            Cell::Plain { size, .. } | Cell::Shaped { size, .. } => *size,
        }
    }

    pub fn font(&self, fonts: &FontPair) -> FontHandle {
        match self {
            Cell::Plain { weight, .. } => fonts.select(*weight),
            Cell::Shaped { font, .. } => *font,
        }
    }

    pub fn wrap(&self) -> WrapMode {
        match self {
            Cell::Plain { .. } => WrapMode::Words,
            Cell::Shaped { wrap, .. } => *wrap,
        }
    }

    pub fn is_shaped(&self) -> bool {
        matches!(self, Cell::Shaped { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub column_widths: Vec<f32>,
    pub fonts: FontPair,
    pub header_background: Color,
    pub header_text: Color,
    pub body_text: Color,
    pub header_padding: Padding,
    pub body_padding: Padding,
    pub grid_width: f32,
    pub grid_color: Color,
}

impl TableStyle {
    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum TableKind {
    Cardholder,
    Summary,
    Transactions { batch: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub kind: TableKind,
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
    /// Repeat the header row at the top of each continuation page.
    pub repeat_header: bool,
    pub style: TableStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    Title,
    Heading,
    Caption,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphBlock {
    pub role: ParagraphRole,
    pub cell: Cell,
    pub fonts: FontPair,
    pub color: Color,
    pub align: Align,
    pub space_after: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBlock {
    Paragraph(ParagraphBlock),
    Table(TableBlock),
    Spacer(f32),
    PageBreak,
}

/// Counts of what a block stream contains; carried in the render report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub titles: usize,
    pub headings: usize,
    pub captions: usize,
    pub cardholder_tables: usize,
    pub summary_tables: usize,
    pub transaction_tables: usize,
    pub transaction_rows: usize,
    pub page_breaks: usize,
    pub shaped_cells: usize,
}

impl BlockSummary {
    pub fn of(blocks: &[PageBlock]) -> Self {
        let mut s = BlockSummary::default();
        for block in blocks {
            match block {
                PageBlock::Paragraph(p) => {
                    match p.role {
                        ParagraphRole::Title => s.titles += 1,
                        ParagraphRole::Heading => s.headings += 1,
                        ParagraphRole::Caption => s.captions += 1,
                    }
                    s.shaped_cells += p.cell.is_shaped() as usize;
                }
                PageBlock::Table(t) => {
                    match t.kind {
                        TableKind::Cardholder => s.cardholder_tables += 1,
                        TableKind::Summary => s.summary_tables += 1,
                        TableKind::Transactions { .. } => {
                            s.transaction_tables += 1;
                            s.transaction_rows += t.rows.len();
                        }
                    }
                    s.shaped_cells += t
                        .header
                        .iter()
                        .chain(t.rows.iter().flatten())
                        .filter(|c| c.is_shaped())
                        .count();
                }
                PageBlock::Spacer(_) => {}
                PageBlock::PageBreak => s.page_breaks += 1,
            }
        }
        s
    }
}
