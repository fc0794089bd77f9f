pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use statement_render::{
    RenderError, RenderReport, RendererBuilder, StatementRenderer, StatementRequest,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub report: RenderReport,
}

impl GeneratedPdf {
    pub fn new(bytes: Vec<u8>, report: RenderReport) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc, report })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of one page, 1-based
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// A renderer with built-in fonts and no timestamps
pub fn test_renderer() -> StatementRenderer {
    let _ = env_logger::builder().is_test(true).try_init();
    RendererBuilder::new()
        .with_deterministic(true)
        .build()
        .expect("default renderer builds")
}

pub fn render_pdf(
    renderer: &StatementRenderer,
    request: &StatementRequest,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let rendered = renderer.render(request)?;
    GeneratedPdf::new(rendered.bytes, rendered.report)
}

/// Render with the default test renderer
pub fn generate_pdf(request: &StatementRequest) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    render_pdf(&test_renderer(), request)
}

#[allow(dead_code)]
pub fn expect_layout_error(result: Result<GeneratedPdf, Box<dyn std::error::Error>>) -> RenderError {
    match result {
        Ok(_) => panic!("render should have failed"),
        Err(e) => *e.downcast::<RenderError>().expect("a RenderError"),
    }
}
