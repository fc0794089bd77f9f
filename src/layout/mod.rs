//! Statement layout: batch planning, formatting, and the block stream.

pub mod block;
pub mod engine;
pub mod format;
pub mod planner;
pub mod profile;
pub mod text;

pub use block::{BlockSummary, PageBlock, TableKind};
pub use engine::{layout, LayoutEngine};
pub use format::format_currency;
pub use planner::{plan, BatchPlan};
pub use profile::LanguageProfile;
