use super::block::{Cell, FontPair, Weight, WrapMode};
use crate::error::Degradation;
use crate::fonts::FontRegistry;
use crate::language::{LabelKey, LanguagePack, LanguagePacks};

/// Everything language-specific a render needs, resolved once up front.
#[derive(Debug, Clone)]
pub struct LanguageProfile<'a> {
    pub pack: &'a LanguagePack,
    pub fonts: FontPair,
    /// Whether cells must be shaped and wrapped by cluster.
    pub complex: bool,
    pub degradations: Vec<Degradation>,
}

impl<'a> LanguageProfile<'a> {
    /// Resolves `code` against the packs and the font registry. Never fails;
    /// fallbacks are recorded in `degradations`.
    pub fn resolve(packs: &'a LanguagePacks, registry: &FontRegistry, code: &str) -> Self {
        let (pack, unsupported) = packs.resolve_reporting(code);
        let mut degradations: Vec<Degradation> = unsupported.into_iter().collect();
        if let Some(font_failure) = registry.degradation_for(&pack.code) {
            degradations.push(font_failure.clone());
        }
        Self {
            pack,
            fonts: FontPair {
                regular: registry.font_for(&pack.code, false),
                bold: registry.font_for(&pack.code, true),
            },
            complex: pack.script.is_complex(),
            degradations,
        }
    }

    pub fn code(&self) -> &str {
        &self.pack.code
    }

    pub fn currency(&self) -> &str {
        &self.pack.currency_symbol
    }

    pub fn label(&self, key: LabelKey) -> &str {
        self.pack.label_or_default(key)
    }

    /// Builds a text cell. This is the only place cells are created, so every
    /// piece of statement text goes through the same shaping decision.
    pub fn cell(&self, text: impl Into<String>, weight: Weight, size: f32) -> Cell {
        let text = text.into();
        if self.complex {
            Cell::Shaped {
                text,
                font: self.fonts.select(weight),
                size,
                wrap: WrapMode::Clusters,
            }
        } else {
            Cell::Plain { text, weight, size }
        }
    }

    pub fn label_cell(&self, key: LabelKey, weight: Weight, size: f32) -> Cell {
        self.cell(self.label(key), weight, size)
    }
}
