//! Renders credit card statements to PDF in English, Tamil and Hindi.
//!
//! A render resolves the request's language to a label pack and typefaces,
//! plans transaction batches, lays the statement out as a stream of blocks,
//! and assembles the blocks into a PDF with a localized footer on every page.

pub mod error;
pub mod fonts;
pub mod language;
pub mod layout;
pub mod model;
pub mod perf;
pub mod pipeline;
pub mod render;
pub mod sample;

pub use error::{Degradation, RenderError};
pub use fonts::FontRegistry;
pub use language::{LabelKey, LanguagePacks};
pub use model::{CardholderProfile, StatementRequest, StatementSummary, TransactionRecord};
pub use perf::{OperationMetrics, PerfMonitor};
pub use pipeline::{
    LaidOutStatement, PageSize, RenderConfig, RenderReport, RenderedStatement, RendererBuilder,
    StatementRenderer,
};
