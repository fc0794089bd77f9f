use super::PageContext;
use super::canvas::PageCanvas;
use crate::fonts::FontHandle;
use crate::language::LabelKey;
use crate::layout::block::{Align, Color, WrapMode};
use crate::layout::format::{format_long_date, page_of};
use crate::layout::profile::LanguageProfile;
use crate::layout::text::wrap;
use chrono::NaiveDate;

const DISCLAIMER_SIZE: f32 = 8.0;
const FOOTER_SIZE: f32 = 9.0;
/// Baseline of the disclaimer's last line and of the page number.
const FOOTER_BASELINE: f32 = 36.0;
const DATE_BASELINE: f32 = 54.0;
/// Distance of the page number's right edge from the page's right edge.
const PAGE_NUMBER_INSET: f32 = 36.0;
/// Narrowest column the disclaimer is wrapped to, whatever the page geometry.
const MIN_DISCLAIMER_WIDTH: f32 = 144.0;

/// The running footer drawn on every page of a statement.
#[derive(Debug, Clone)]
pub struct StatementFooter {
    disclaimer: String,
    page_label: String,
    of_label: String,
    date_text: String,
    font: FontHandle,
    wrap: WrapMode,
    margin: f32,
}

impl StatementFooter {
    pub fn new(profile: &LanguageProfile<'_>, statement_date: NaiveDate, margin: f32) -> Self {
        Self {
            disclaimer: profile.label(LabelKey::StatementFooter).to_string(),
            page_label: profile.label(LabelKey::Page).to_string(),
            of_label: profile.label(LabelKey::Of).to_string(),
            date_text: format!(
                "{}: {}",
                profile.label(LabelKey::StatementDate),
                format_long_date(statement_date)
            ),
            font: profile.fonts.regular,
            wrap: if profile.complex {
                WrapMode::Clusters
            } else {
                WrapMode::Words
            },
            margin,
        }
    }

    pub fn page_text(&self, ctx: &PageContext) -> String {
        page_of(&self.page_label, ctx.page_number, &self.of_label, ctx.total_pages)
    }

    /// Wrap width for the centered disclaimer: clear of the page number on
    /// both sides where the page allows it, never below
    /// [`MIN_DISCLAIMER_WIDTH`].
    fn disclaimer_width(&self, page_width: f32, page_number_width: f32) -> f32 {
        let right = page_width - PAGE_NUMBER_INSET;
        let clear = 2.0 * (right - page_number_width - page_width / 2.0) - 8.0;
        (page_width - 2.0 * self.margin)
            .min(clear)
            .max(MIN_DISCLAIMER_WIDTH)
    }

    pub fn draw(&self, ctx: &PageContext, canvas: &mut PageCanvas<'_, '_>) {
        let page_text = self.page_text(ctx);
        let page_width = canvas.measure(self.font, &page_text, FOOTER_SIZE);
        let right = canvas.width() - PAGE_NUMBER_INSET;
        canvas.draw_text_aligned(Align::Right, right, FOOTER_BASELINE, &page_text, self.font, FOOTER_SIZE, Color::BLACK);

        let center = canvas.width() / 2.0;
        let max_width = self.disclaimer_width(canvas.width(), page_width);
        let lines = wrap(&self.disclaimer, max_width, self.wrap, |s| {
            canvas.measure(self.font, s, DISCLAIMER_SIZE)
        });
        let leading = DISCLAIMER_SIZE * super::paginate::LEADING;
        for (i, line) in lines.iter().enumerate() {
            let y = FOOTER_BASELINE + (lines.len() - 1 - i) as f32 * leading;
            canvas.draw_text_aligned(Align::Center, center, y, line, self.font, DISCLAIMER_SIZE, Color::BLACK);
        }

        canvas.draw_text(self.margin, DATE_BASELINE, &self.date_text, self.font, FOOTER_SIZE, Color::BLACK);
    }
}
