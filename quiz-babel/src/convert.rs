//! Conversion dispatcher
//!
//! Selects the codec pair for a `(from, to)` format pair and runs
//! decode → [`QuestionSet`] → encode. Self-pairs are rejected before any text is
//! looked at.

use crate::error::QuizError;
use crate::format::{QuizFormat, SerializedQuiz};
use crate::model::QuestionSet;
use crate::registry::FormatRegistry;
use std::collections::HashMap;

/// How a pair is wired. Both routes run on the in-memory model; the distinction only
/// records whether JSON is one end of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// JSON ↔ XML, JSON ↔ MD
    Direct,
    /// XML ↔ MD, composed through the canonical model
    ViaCanonical,
}

/// Settings applied to the target codec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// MXML category override, `/`-separated. Ignored for other targets.
    pub category: Option<String>,
    /// Codec options passed through unchanged (`--extra-<key> value`)
    pub extra: HashMap<String, String>,
}

impl ConvertOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Options map handed to the target codec.
    fn codec_options(&self, target: QuizFormat) -> HashMap<String, String> {
        let mut options = self.extra.clone();
        match (&self.category, target) {
            (Some(category), QuizFormat::Xml) => {
                options.insert("category".to_string(), category.clone());
            }
            (Some(category), _) => {
                tracing::debug!(%category, %target, "category override ignored for non-XML output");
            }
            (None, _) => {}
        }
        options
    }
}

/// A validated `(from, to)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    from: QuizFormat,
    to: QuizFormat,
}

impl Conversion {
    pub fn new(from: QuizFormat, to: QuizFormat) -> Result<Self, QuizError> {
        if from == to {
            return Err(QuizError::UnsupportedConversion { from, to });
        }
        Ok(Conversion { from, to })
    }

    pub fn from(&self) -> QuizFormat {
        self.from
    }

    pub fn to(&self) -> QuizFormat {
        self.to
    }

    pub fn route(&self) -> Route {
        match (self.from, self.to) {
            (QuizFormat::Json, _) | (_, QuizFormat::Json) => Route::Direct,
            _ => Route::ViaCanonical,
        }
    }

    /// Decode `source` with the built-in codecs and encode it for the target format.
    pub fn run(&self, source: &str, options: &ConvertOptions) -> Result<SerializedQuiz, QuizError> {
        self.run_with(&FormatRegistry::default(), source, options)
    }

    /// Same as [`Conversion::run`] with codecs taken from `registry`.
    pub fn run_with(
        &self,
        registry: &FormatRegistry,
        source: &str,
        options: &ConvertOptions,
    ) -> Result<SerializedQuiz, QuizError> {
        let set = self.decode(registry, source)?;
        self.encode(registry, &set, options)
    }

    /// Decode half of the conversion
    pub fn decode(&self, registry: &FormatRegistry, source: &str) -> Result<QuestionSet, QuizError> {
        tracing::info!(from = %self.from, to = %self.to, route = ?self.route(), "converting");
        let set = registry.parse(source, self.from)?;
        tracing::debug!(questions = set.len(), "decoded {}", self.from);
        Ok(set)
    }

    /// Encode half of the conversion, for a set already decoded (or merged from several
    /// inputs).
    pub fn encode(
        &self,
        registry: &FormatRegistry,
        set: &QuestionSet,
        options: &ConvertOptions,
    ) -> Result<SerializedQuiz, QuizError> {
        registry.serialize_with_options(set, self.to, &options.codec_options(self.to))
    }
}

/// Convert `source` from one format to another with the built-in codecs.
pub fn convert(
    source: &str,
    from: QuizFormat,
    to: QuizFormat,
    options: &ConvertOptions,
) -> Result<SerializedQuiz, QuizError> {
    Conversion::new(from, to)?.run(source, options)
}
