//! Localized label bundles and language resolution.
//!
//! The supported set is closed (`en`, `ta`, `hi`). Resolution never fails: an
//! unknown code resolves to the default pack and is reported as a
//! [`Degradation`].

mod packs;

use crate::error::{Degradation, RenderError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// The code of the pack used when a requested language is unsupported.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The closed set of localized label keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKey {
    Title,
    CardholderInfo,
    Name,
    CardNumber,
    BillingAddress,
    Email,
    Phone,
    StatementSummary,
    Amount,
    PreviousBalance,
    PaymentsReceived,
    PurchasesCharges,
    FinanceCharges,
    NewBalance,
    CreditLimit,
    AvailableCredit,
    Transactions,
    Date,
    Description,
    Page,
    Of,
    StatementFooter,
    StatementDate,
    InvalidLanguage,
    MissingFields,
    InvalidEmail,
    InvalidCard,
    InvalidPhone,
}

impl LabelKey {
    /// The literal used when a pack has no entry for this key.
    pub fn fallback_text(self) -> &'static str {
        packs::EN
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, text)| *text)
            .unwrap_or("")
    }
}

/// The writing system a language is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Tamil,
    Devanagari,
}

impl Script {
    /// Whether text in this script needs shaping and cluster-aware wrapping.
    pub fn is_complex(self) -> bool {
        !matches!(self, Script::Latin)
    }
}

/// Localized labels, currency symbol and script for one language.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    pub code: String,
    pub name: String,
    pub currency_symbol: String,
    pub script: Script,
    labels: HashMap<LabelKey, String>,
}

impl LanguagePack {
    fn builtin(code: &str, name: &str, script: Script, table: &[(LabelKey, &str)]) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            currency_symbol: "₹".to_string(),
            script,
            labels: table
                .iter()
                .map(|(key, text)| (*key, text.to_string()))
                .collect(),
        }
    }

    pub fn label(&self, key: LabelKey) -> Option<&str> {
        self.labels.get(&key).map(String::as_str)
    }

    /// The localized label, or the English literal when the pack lacks the key.
    pub fn label_or_default(&self, key: LabelKey) -> &str {
        match self.label(key) {
            Some(text) => text,
            None => {
                log::debug!(
                    "Language pack '{}' has no '{:?}' label, using default.",
                    self.code,
                    key
                );
                key.fallback_text()
            }
        }
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

/// The outcome of resolving a language code.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub pack: &'a LanguagePack,
    pub fell_back: bool,
}

/// The process-wide set of language packs, loaded once and read-only after.
#[derive(Debug, Clone)]
pub struct LanguagePacks {
    packs: BTreeMap<String, LanguagePack>,
}

#[derive(Deserialize)]
struct PackOverride {
    name: Option<String>,
    currency_symbol: Option<String>,
    #[serde(default)]
    labels: HashMap<LabelKey, String>,
}

impl Default for LanguagePacks {
    fn default() -> Self {
        let mut packs = BTreeMap::new();
        for pack in [
            LanguagePack::builtin("en", "English", Script::Latin, packs::EN),
            LanguagePack::builtin("ta", "தமிழ்", Script::Tamil, packs::TA),
            LanguagePack::builtin("hi", "हिन्दी", Script::Devanagari, packs::HI),
        ] {
            packs.insert(pack.code.clone(), pack);
        }
        Self { packs }
    }
}

impl LanguagePacks {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces label tables (and optionally name/currency) from a JSON document
    /// of the form `{ "ta": { "currency_symbol": "₹", "labels": { "title": "…" } } }`.
    ///
    /// An override's `labels` replace the pack's whole table; keys it omits fall
    /// back to the English literals at layout time.
    pub fn with_overrides_json(mut self, json: &str) -> Result<Self, RenderError> {
        let overrides: BTreeMap<String, PackOverride> = serde_json::from_str(json)?;
        for (code, o) in overrides {
            let pack = self.packs.get_mut(&code).ok_or_else(|| {
                RenderError::Config(format!(
                    "Cannot override language '{}': not in the supported set",
                    code
                ))
            })?;
            if let Some(name) = o.name {
                pack.name = name;
            }
            if let Some(symbol) = o.currency_symbol {
                pack.currency_symbol = symbol;
            }
            pack.labels = o.labels;
            log::info!(
                "Loaded label override for '{}' ({} labels).",
                code,
                pack.labels.len()
            );
        }
        Ok(self)
    }

    pub fn with_overrides_file<P: AsRef<Path>>(self, path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!(
                "Failed to read language overrides from '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.with_overrides_json(&json)
    }

    pub fn get(&self, code: &str) -> Option<&LanguagePack> {
        self.packs.get(code)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.packs.contains_key(code)
    }

    /// `(code, display name)` for every supported language.
    pub fn supported(&self) -> Vec<(&str, &str)> {
        self.packs
            .values()
            .map(|p| (p.code.as_str(), p.name.as_str()))
            .collect()
    }

    /// Resolves a code to its pack, falling back to the default pack.
    pub fn resolve(&self, code: &str) -> Resolved<'_> {
        if let Some(pack) = self.packs.get(code) {
            return Resolved {
                pack,
                fell_back: false,
            };
        }
        log::warn!(
            "Unsupported language '{}', falling back to '{}'.",
            code,
            DEFAULT_LANGUAGE
        );
        Resolved {
            pack: self.default_pack(),
            fell_back: true,
        }
    }

    /// Like [`resolve`](Self::resolve), but reports the fallback as a degradation.
    pub fn resolve_reporting(&self, code: &str) -> (&LanguagePack, Option<Degradation>) {
        let resolved = self.resolve(code);
        let degradation = resolved.fell_back.then(|| Degradation::UnsupportedLanguage {
            requested: code.to_string(),
        });
        (resolved.pack, degradation)
    }

    fn default_pack(&self) -> &LanguagePack {
        // Built from the EN table in `Default`, and overrides cannot remove packs.
        &self.packs[DEFAULT_LANGUAGE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_packs_are_complete() {
        let packs = LanguagePacks::new();
        for (code, _) in packs.supported() {
            let pack = packs.get(code).unwrap();
            assert_eq!(pack.label_count(), 28, "pack '{}' is incomplete", code);
            assert_eq!(pack.currency_symbol, "₹");
        }
    }

    #[test]
    fn unsupported_code_falls_back_to_english() {
        let packs = LanguagePacks::new();
        let resolved = packs.resolve("fr");
        assert!(resolved.fell_back);
        assert_eq!(resolved.pack.code, "en");

        let (pack, degradation) = packs.resolve_reporting("");
        assert_eq!(pack.code, "en");
        assert_eq!(
            degradation,
            Some(Degradation::UnsupportedLanguage {
                requested: String::new()
            })
        );
    }

    #[test]
    fn supported_codes_resolve_to_themselves() {
        let packs = LanguagePacks::new();
        for code in ["en", "ta", "hi"] {
            let resolved = packs.resolve(code);
            assert!(!resolved.fell_back);
            assert_eq!(resolved.pack.code, code);
        }
        assert_eq!(packs.resolve("ta").pack.label(LabelKey::Page), Some("பக்கம்"));
    }

    #[test]
    fn override_with_missing_keys_uses_literal_defaults() {
        let packs = LanguagePacks::new()
            .with_overrides_json(r#"{"hi": {"currency_symbol": "Rs.", "labels": {"title": "कथन"}}}"#)
            .unwrap();
        let hi = packs.get("hi").unwrap();
        assert_eq!(hi.currency_symbol, "Rs.");
        assert_eq!(hi.label_or_default(LabelKey::Title), "कथन");
        assert_eq!(hi.label_or_default(LabelKey::Page), "Page");
        assert_eq!(hi.label_or_default(LabelKey::Of), "of");
    }

    #[test]
    fn override_for_unknown_language_is_rejected() {
        let err = LanguagePacks::new()
            .with_overrides_json(r#"{"fr": {"labels": {}}}"#)
            .unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }
}
