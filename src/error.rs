// src/error.rs
//! Error and degradation types shared by every stage of the render pipeline.

use std::fmt;
use thiserror::Error;

/// The error type for a single statement render.
///
/// Only data-shape problems and I/O failures surface here. Language and
/// typeface problems are absorbed as [`Degradation`]s and never abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Layout failed during '{operation}'{}: {message}", RecordIndex(.record_index))]
    Layout {
        operation: &'static str,
        record_index: Option<usize>,
        message: String,
    },

    #[error("Assembly failed during '{operation}': {source}")]
    Assembly {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF encoding error: {0}")]
    Pdf(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn layout(
        operation: &'static str,
        record_index: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        RenderError::Layout {
            operation,
            record_index,
            message: message.into(),
        }
    }

    pub fn assembly(operation: &'static str, source: std::io::Error) -> Self {
        RenderError::Assembly { operation, source }
    }

    /// The offending transaction index, when the failure is tied to one record.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            RenderError::Layout { record_index, .. } => *record_index,
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::assembly("write", e)
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

struct RecordIndex<'a>(&'a Option<usize>);

impl fmt::Display for RecordIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, " (transaction #{})", index),
            None => Ok(()),
        }
    }
}

/// A non-fatal problem that was absorbed by falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The requested language code is not supported; the default pack was used.
    UnsupportedLanguage { requested: String },
    /// A localized typeface could not be loaded; the built-in typeface was used.
    ResourceLoadFailure { language: String, reason: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::UnsupportedLanguage { requested } => {
                write!(f, "unsupported language '{}', using default pack", requested)
            }
            Degradation::ResourceLoadFailure { language, reason } => {
                write!(
                    f,
                    "typeface for '{}' unavailable ({}), using built-in fallback",
                    language, reason
                )
            }
        }
    }
}
