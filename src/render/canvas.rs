//! Per-page drawing surface that emits PDF content operations.

use super::fonts::PdfFontSet;
use super::paginate::PlacedItem;
use crate::fonts::FontHandle;
use crate::layout::block::{Align, Color};
use lopdf::content::{Content, Operation};
use lopdf::Object;

#[derive(Default)]
struct GraphicsState {
    font: Option<(FontHandle, f32)>,
    fill: Option<Color>,
    stroke: Option<Color>,
    line_width: Option<f32>,
}

/// Drawing surface for one page. Coordinates are PDF points from the
/// bottom-left corner.
pub struct PageCanvas<'a, 'r> {
    fonts: &'a mut PdfFontSet<'r>,
    width: f32,
    height: f32,
    operations: Vec<Operation>,
    state: GraphicsState,
}

impl<'a, 'r> PageCanvas<'a, 'r> {
    pub fn new(fonts: &'a mut PdfFontSet<'r>, width: f32, height: f32) -> Self {
        Self {
            fonts,
            width,
            height,
            operations: Vec::new(),
            state: GraphicsState::default(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn measure(&self, font: FontHandle, text: &str, size: f32) -> f32 {
        self.fonts.registry().measure(font, text, size)
    }

    fn set_fill(&mut self, color: Color) {
        if self.state.fill != Some(color) {
            let [r, g, b] = color.components();
            self.operations
                .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            self.state.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.state.stroke != Some(color) {
            let [r, g, b] = color.components();
            self.operations
                .push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
            self.state.stroke = Some(color);
        }
        if self.state.line_width != Some(width) {
            self.operations.push(Operation::new("w", vec![width.into()]));
            self.state.line_width = Some(width);
        }
    }

    /// Draws `text` with its baseline starting at `(x, y)`.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, font: FontHandle, size: f32, color: Color) {
        if text.trim().is_empty() {
            return;
        }
        self.operations.push(Operation::new("BT", vec![]));
        if self.state.font != Some((font, size)) {
            let resource = self.fonts.resource(font);
            self.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(resource.into_bytes()), size.into()],
            ));
            self.state.font = Some((font, size));
        }
        self.set_fill(color);
        self.operations
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        let show = self.fonts.show_text(font, text, size);
        self.operations.extend(show);
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Draws `text` aligned against `anchor_x`: its left edge, center, or right edge.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_aligned(
        &mut self,
        align: Align,
        anchor_x: f32,
        y: f32,
        text: &str,
        font: FontHandle,
        size: f32,
        color: Color,
    ) {
        let width = self.measure(font, text, size);
        let x = match align {
            Align::Left => anchor_x,
            Align::Center => anchor_x - width / 2.0,
            Align::Right => anchor_x - width,
        };
        self.draw_text(x, y, text, font, size, color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.set_fill(color);
        self.operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.operations.push(Operation::new("f", vec![]));
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, color: Color) {
        self.set_stroke(color, line_width);
        self.operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.operations.push(Operation::new("S", vec![]));
    }

    pub fn draw_item(&mut self, item: &PlacedItem) {
        match item {
            PlacedItem::Text {
                x,
                baseline,
                text,
                font,
                size,
                color,
            } => self.draw_text(*x, *baseline, text, *font, *size, *color),
            PlacedItem::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => self.fill_rect(*x, *y, *width, *height, *color),
            PlacedItem::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                color,
            } => self.stroke_rect(*x, *y, *width, *height, *line_width, *color),
        }
    }

    pub fn finish(self) -> Content {
        Content {
            operations: self.operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontRegistry;

    #[test]
    fn font_and_color_are_set_once_per_run() {
        let registry = FontRegistry::builtin();
        let mut fonts = PdfFontSet::new(&registry);
        let mut canvas = PageCanvas::new(&mut fonts, 595.0, 842.0);
        canvas.draw_text(10.0, 10.0, "a", FontHandle::REGULAR, 10.0, Color::BLACK);
        canvas.draw_text(10.0, 30.0, "b", FontHandle::REGULAR, 10.0, Color::BLACK);
        let ops: Vec<String> = canvas.finish().operations.into_iter().map(|o| o.operator).collect();
        assert_eq!(ops.iter().filter(|o| *o == "Tf").count(), 1);
        assert_eq!(ops.iter().filter(|o| *o == "rg").count(), 1);
        assert_eq!(ops.iter().filter(|o| *o == "Tj").count(), 2);
    }

    #[test]
    fn blank_text_draws_nothing() {
        let registry = FontRegistry::builtin();
        let mut fonts = PdfFontSet::new(&registry);
        let mut canvas = PageCanvas::new(&mut fonts, 595.0, 842.0);
        canvas.draw_text(0.0, 0.0, "   ", FontHandle::BOLD, 12.0, Color::WHITE);
        assert!(canvas.finish().operations.is_empty());
    }
}
