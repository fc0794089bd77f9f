//! The statement rendering pipeline.
//!
//! - [`RendererBuilder`]: fluent builder for a [`StatementRenderer`]
//! - [`RenderConfig`]: page size, batching, fonts and output options
//!
//! # Example
//!
//! ```ignore
//! use statement_render::{RendererBuilder, StatementRequest};
//!
//! let renderer = RendererBuilder::new()
//!     .with_font_dir("assets/fonts")
//!     .build()?;
//!
//! let request = StatementRequest::from_json(&json)?;
//! let report = renderer.render_to_path(&request, "out/statement.pdf")?;
//! ```

mod builder;
pub mod config;
mod renderer;

pub use builder::RendererBuilder;
pub use config::{FontSource, PageSize, RenderConfig};
pub use renderer::{LaidOutStatement, RenderReport, RenderedStatement, StatementRenderer};
