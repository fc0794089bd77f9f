use super::config::{FontSource, PageSize, RenderConfig};
use super::renderer::StatementRenderer;
use crate::error::RenderError;
use crate::fonts::FontRegistry;
use crate::language::LanguagePacks;
use crate::perf::PerfMonitor;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a [`StatementRenderer`].
#[derive(Default)]
pub struct RendererBuilder {
    config: RenderConfig,
    registry: Option<Arc<FontRegistry>>,
    monitor: Option<Arc<PerfMonitor>>,
    override_json: Option<String>,
}

impl RendererBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from an existing configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Scans a directory for the language typefaces (`.ttf`, `.otf`, ...).
    pub fn with_font_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.fonts = FontSource::Directory(path.as_ref().to_path_buf());
        self
    }

    /// Looks the language typefaces up among the installed system fonts.
    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        if system_fonts {
            self.config.fonts = FontSource::System;
        }
        self
    }

    /// Shares an already-built registry instead of scanning for fonts.
    pub fn with_font_registry(mut self, registry: Arc<FontRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn with_margin(mut self, margin_pt: f32) -> Self {
        self.config.margin_pt = margin_pt;
        self
    }

    /// The batch size used before volume-based shrinking.
    pub fn with_batch_size(mut self, base_batch_size: usize) -> Self {
        self.config.base_batch_size = base_batch_size;
        self
    }

    pub fn with_memory_ceiling_mb(mut self, memory_ceiling_mb: usize) -> Self {
        self.config.memory_ceiling_mb = memory_ceiling_mb;
        self
    }

    /// Loads label overrides from a JSON file at build time.
    pub fn with_language_overrides<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.language_overrides = Some(path.as_ref().to_path_buf());
        self
    }

    /// Label overrides as an inline JSON document.
    pub fn with_language_overrides_json(mut self, json: impl Into<String>) -> Self {
        self.override_json = Some(json.into());
        self
    }

    /// Shares a performance monitor between renderers.
    pub fn with_monitor(mut self, monitor: Arc<PerfMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.config.deterministic = deterministic;
        self
    }

    /// Consumes the builder and creates the renderer.
    pub fn build(self) -> Result<StatementRenderer, RenderError> {
        let config = self.config;
        let (width, height) = config.page_size.dimensions_pt();
        if !(width > 2.0 * config.margin_pt && height > 2.0 * config.margin_pt) {
            return Err(RenderError::Config(format!(
                "Page {}x{}pt leaves no room inside {}pt margins",
                width, height, config.margin_pt
            )));
        }
        if config.base_batch_size == 0 {
            return Err(RenderError::Config("Batch size must be at least 1".to_string()));
        }

        let mut packs = LanguagePacks::new();
        if let Some(path) = &config.language_overrides {
            packs = packs.with_overrides_file(path)?;
        }
        if let Some(json) = &self.override_json {
            packs = packs.with_overrides_json(json)?;
        }

        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(match &config.fonts {
                FontSource::Builtin => FontRegistry::builtin(),
                FontSource::Directory(dir) => {
                    if !dir.is_dir() {
                        return Err(RenderError::Config(format!(
                            "Font directory '{}' does not exist",
                            dir.display()
                        )));
                    }
                    FontRegistry::from_dir(dir)
                }
                FontSource::System => FontRegistry::from_system(),
            }),
        };
        let monitor = self.monitor.unwrap_or_default();

        log::info!(
            "Built statement renderer ({:?}, {} embedded face(s), {} font degradation(s)).",
            config.page_size,
            registry.faces().count(),
            registry.degradations().len()
        );
        Ok(StatementRenderer::new(config, Arc::new(packs), registry, monitor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let renderer = RendererBuilder::new().build().unwrap();
        assert_eq!(renderer.config().page_size, PageSize::A4);
        assert!(!renderer.config().deterministic);
    }

    #[test]
    fn missing_font_dir_is_a_config_error() {
        let err = RendererBuilder::new()
            .with_font_dir("/definitely/not/here")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn margins_must_leave_a_frame() {
        let err = RendererBuilder::new()
            .with_page_size(PageSize::Custom {
                width: 100.0,
                height: 100.0,
            })
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("margins"));
    }

    #[test]
    fn bad_override_json_fails_the_build() {
        assert!(
            RendererBuilder::new()
                .with_language_overrides_json("{not json")
                .build()
                .is_err()
        );
    }
}
