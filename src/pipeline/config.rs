use crate::layout::planner::{DEFAULT_BATCH_SIZE, DEFAULT_MEMORY_CEILING_MB};
use crate::render::paginate::PageGeometry;
use std::path::PathBuf;

/// Page margins on every side, in points.
pub const DEFAULT_MARGIN_PT: f32 = 72.0;

/// Paper sizes a statement can be rendered on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    /// Width and height in points.
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// `(width, height)` in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "letter" => Some(PageSize::Letter),
            "legal" => Some(PageSize::Legal),
            _ => None,
        }
    }
}

/// Where the font registry gets its typefaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Helvetica only; nothing is scanned.
    #[default]
    Builtin,
    Directory(PathBuf),
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub page_size: PageSize,
    pub margin_pt: f32,
    pub base_batch_size: usize,
    pub memory_ceiling_mb: usize,
    pub fonts: FontSource,
    pub language_overrides: Option<PathBuf>,
    /// Leave out the creation timestamp so identical inputs give identical bytes.
    pub deterministic: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margin_pt: DEFAULT_MARGIN_PT,
            base_batch_size: DEFAULT_BATCH_SIZE,
            memory_ceiling_mb: DEFAULT_MEMORY_CEILING_MB,
            fonts: FontSource::default(),
            language_overrides: None,
            deterministic: false,
        }
    }
}

impl RenderConfig {
    pub fn geometry(&self) -> PageGeometry {
        let (width, height) = self.page_size.dimensions_pt();
        PageGeometry::new(width, height, self.margin_pt)
    }
}
