//! Builds the ordered block stream for one statement.

use super::block::{
    Align, Cell, Color, PageBlock, Padding, ParagraphBlock, ParagraphRole, TableBlock, TableKind,
    TableStyle, Weight,
};
use super::format::{format_currency, format_row_date, page_of};
use super::planner::BatchPlan;
use super::profile::LanguageProfile;
use crate::error::RenderError;
use crate::language::LabelKey;
use crate::model::{CardholderProfile, StatementSummary, TransactionRecord};
use crate::perf::PerfMonitor;

const TITLE_SIZE: f32 = 16.0;
const TITLE_SPACE_AFTER: f32 = 30.0;
const TABLE_HEADER_SIZE: f32 = 14.0;
const COMPLEX_TRANSACTION_HEADER_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const CARDHOLDER_BODY_SIZE: f32 = 11.0;
const CAPTION_SIZE: f32 = 8.0;
const SECTION_GAP: f32 = 20.0;
const HEADING_GAP: f32 = 10.0;

const CARDHOLDER_COLUMNS: [f32; 2] = [180.0, 288.0];
const SUMMARY_COLUMNS: [f32; 2] = [216.0, 216.0];
const TRANSACTION_COLUMNS: [f32; 3] = [108.0, 288.0, 108.0];

pub struct LayoutEngine<'p, 'm> {
    profile: &'p LanguageProfile<'p>,
    plan: BatchPlan,
    monitor: Option<&'m PerfMonitor>,
}

impl<'p, 'm> LayoutEngine<'p, 'm> {
    pub fn new(profile: &'p LanguageProfile<'p>, plan: BatchPlan) -> Self {
        Self {
            profile,
            plan,
            monitor: None,
        }
    }

    /// Times each section and checks memory after every batch.
    pub fn with_monitor(mut self, monitor: &'m PerfMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    fn span(&self, operation: String) -> Option<crate::perf::PerfSpan<'m>> {
        self.monitor.map(|m| m.span(operation))
    }

    pub fn run(
        &self,
        cardholder: &CardholderProfile,
        summary: &StatementSummary,
        transactions: &[TransactionRecord],
    ) -> Result<Vec<PageBlock>, RenderError> {
        self.plan
            .check_covers(transactions.len())
            .map_err(|message| RenderError::layout("transactions_section", None, message))?;

        let mut blocks = Vec::new();
        {
            let _span = self.span("title_section".into());
            blocks.push(self.title(LabelKey::Title, ParagraphRole::Title));
        }
        {
            let _span = self.span("cardholder_section".into());
            blocks.push(PageBlock::Table(self.cardholder_table(cardholder)));
            blocks.push(PageBlock::Spacer(SECTION_GAP));
        }
        {
            let _span = self.span("summary_section".into());
            blocks.push(PageBlock::Table(self.summary_table(summary)?));
            blocks.push(PageBlock::Spacer(SECTION_GAP));
        }
        {
            let _span = self.span("transactions_section".into());
            blocks.push(self.title(LabelKey::Transactions, ParagraphRole::Heading));
            blocks.push(PageBlock::Spacer(HEADING_GAP));
            self.transaction_tables(transactions, &mut blocks)?;
        }
        Ok(blocks)
    }

    fn title(&self, key: LabelKey, role: ParagraphRole) -> PageBlock {
        PageBlock::Paragraph(ParagraphBlock {
            role,
            cell: self.profile.label_cell(key, Weight::Bold, TITLE_SIZE),
            fonts: self.profile.fonts,
            color: Color::BRAND_RED,
            align: Align::Center,
            space_after: TITLE_SPACE_AFTER,
        })
    }

    fn style(&self, columns: &[f32], header_padding: Padding, body_padding: Padding) -> TableStyle {
        TableStyle {
            column_widths: columns.to_vec(),
            fonts: self.profile.fonts,
            header_background: Color::BRAND_RED,
            header_text: Color::WHITE,
            body_text: Color::BLACK,
            header_padding,
            body_padding,
            grid_width: 1.0,
            grid_color: Color::BLACK,
        }
    }

    fn labelled_row(&self, key: LabelKey, value: impl Into<String>, size: f32) -> Vec<Cell> {
        vec![
            self.profile.label_cell(key, Weight::Bold, size),
            self.profile.cell(value, Weight::Regular, size),
        ]
    }

    fn cardholder_table(&self, cardholder: &CardholderProfile) -> TableBlock {
        let p = self.profile;
        let size = if p.complex { BODY_SIZE } else { CARDHOLDER_BODY_SIZE };
        TableBlock {
            kind: TableKind::Cardholder,
            header: vec![
                p.label_cell(LabelKey::CardholderInfo, Weight::Bold, TABLE_HEADER_SIZE),
                p.cell("", Weight::Bold, TABLE_HEADER_SIZE),
            ],
            rows: vec![
                self.labelled_row(LabelKey::Name, cardholder.name.as_str(), size),
                self.labelled_row(LabelKey::CardNumber, cardholder.masked_card(), size),
                self.labelled_row(LabelKey::BillingAddress, cardholder.billing_address.as_str(), size),
                self.labelled_row(LabelKey::Email, cardholder.email.as_str(), size),
                self.labelled_row(LabelKey::Phone, cardholder.phone.as_str(), size),
            ],
            repeat_header: false,
            style: self.style(
                &CARDHOLDER_COLUMNS,
                Padding::new(3.0, 10.0, 12.0, 10.0),
                Padding::new(8.0, 10.0, 8.0, 10.0),
            ),
        }
    }

    fn summary_table(&self, summary: &StatementSummary) -> Result<TableBlock, RenderError> {
        let p = self.profile;
        const LABELS: [LabelKey; 7] = [
            LabelKey::PreviousBalance,
            LabelKey::PaymentsReceived,
            LabelKey::PurchasesCharges,
            LabelKey::FinanceCharges,
            LabelKey::NewBalance,
            LabelKey::CreditLimit,
            LabelKey::AvailableCredit,
        ];

        let mut rows = Vec::with_capacity(LABELS.len());
        for (key, (field, amount)) in LABELS.into_iter().zip(summary.amounts()) {
            if !amount.is_finite() {
                return Err(RenderError::layout(
                    "summary_section",
                    None,
                    format!("{} is not a finite amount ({})", field, amount),
                ));
            }
            rows.push(self.labelled_row(key, format_currency(amount, p.currency()), BODY_SIZE));
        }

        Ok(TableBlock {
            kind: TableKind::Summary,
            header: vec![
                p.label_cell(LabelKey::StatementSummary, Weight::Bold, TABLE_HEADER_SIZE),
                p.label_cell(LabelKey::Amount, Weight::Bold, TABLE_HEADER_SIZE),
            ],
            rows,
            repeat_header: false,
            style: self.style(
                &SUMMARY_COLUMNS,
                Padding::new(3.0, 6.0, 12.0, 6.0),
                Padding::new(3.0, 6.0, 3.0, 6.0),
            ),
        })
    }

    fn transaction_tables(
        &self,
        transactions: &[TransactionRecord],
        blocks: &mut Vec<PageBlock>,
    ) -> Result<(), RenderError> {
        let p = self.profile;
        let header_size = if p.complex {
            COMPLEX_TRANSACTION_HEADER_SIZE
        } else {
            TABLE_HEADER_SIZE
        };
        let last = self.plan.batch_count - 1;

        for (index, range) in self.plan.batches().enumerate() {
            let _span = self.span(format!("transaction_batch_{}", index));
            log::debug!("Laying out transaction batch {} ({:?}).", index, range);

            let mut rows = Vec::with_capacity(range.len());
            for (offset, record) in transactions[range.clone()].iter().enumerate() {
                if !record.amount.is_finite() {
                    return Err(RenderError::layout(
                        "transactions_section",
                        Some(range.start + offset),
                        format!("amount is not finite ({})", record.amount),
                    ));
                }
                rows.push(vec![
                    p.cell(format_row_date(record.date), Weight::Regular, BODY_SIZE),
                    p.cell(record.description.as_str(), Weight::Regular, BODY_SIZE),
                    p.cell(format_currency(record.amount, p.currency()), Weight::Regular, BODY_SIZE),
                ]);
            }

            blocks.push(PageBlock::Table(TableBlock {
                kind: TableKind::Transactions { batch: index },
                header: vec![
                    p.label_cell(LabelKey::Date, Weight::Bold, header_size),
                    p.label_cell(LabelKey::Description, Weight::Bold, header_size),
                    p.label_cell(LabelKey::Amount, Weight::Bold, header_size),
                ],
                rows,
                repeat_header: true,
                style: self.style(
                    &TRANSACTION_COLUMNS,
                    Padding::new(3.0, 6.0, 12.0, 6.0),
                    Padding::new(3.0, 6.0, 3.0, 6.0),
                ),
            }));

            if self.plan.is_multi_batch() {
                let caption = page_of(
                    p.label(LabelKey::Page),
                    index + 1,
                    p.label(LabelKey::Of),
                    self.plan.batch_count,
                );
                blocks.push(PageBlock::Paragraph(ParagraphBlock {
                    role: ParagraphRole::Caption,
                    cell: p.cell(caption, Weight::Regular, CAPTION_SIZE),
                    fonts: p.fonts,
                    color: Color::BLACK,
                    align: Align::Center,
                    space_after: 10.0,
                }));
            }
            if index < last {
                blocks.push(PageBlock::PageBreak);
            }

            if let Some(monitor) = self.monitor {
                monitor.check_pressure(self.plan.memory_ceiling_mb);
            }
        }
        Ok(())
    }
}

/// Lays out a statement without timing.
pub fn layout(
    cardholder: &CardholderProfile,
    summary: &StatementSummary,
    transactions: &[TransactionRecord],
    profile: &LanguageProfile<'_>,
    plan: BatchPlan,
) -> Result<Vec<PageBlock>, RenderError> {
    LayoutEngine::new(profile, plan).run(cardholder, summary, transactions)
}
