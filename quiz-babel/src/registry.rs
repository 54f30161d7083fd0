//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for the available codecs.
//! Codecs are registered and retrieved by their [`QuizFormat`] tag.

use crate::error::QuizError;
use crate::format::{Format, QuizFormat, SerializedQuiz};
use crate::model::QuestionSet;
use std::collections::HashMap;

/// Registry of quiz formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
///
/// let set = registry.parse("[]", QuizFormat::Json)?;
/// let xml = registry.serialize(&set, QuizFormat::Xml)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<QuizFormat, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a codec for the same tag already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats.insert(format.format(), Box::new(format));
    }

    /// Get a format by tag
    pub fn get(&self, format: QuizFormat) -> Result<&dyn Format, QuizError> {
        self.formats
            .get(&format)
            .map(|f| f.as_ref())
            .ok_or(QuizError::FormatNotFound(format))
    }

    /// Check if a format exists
    pub fn has(&self, format: QuizFormat) -> bool {
        self.formats.contains_key(&format)
    }

    /// List all registered formats (sorted)
    pub fn list_formats(&self) -> Vec<&dyn Format> {
        let mut formats: Vec<_> = self.formats.values().map(|f| f.as_ref()).collect();
        formats.sort_by_key(|f| f.format());
        formats
    }

    /// Detect format from filename based on file extension
    ///
    /// Extensions are compared case-insensitively against every registered codec.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<QuizFormat> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.list_formats()
            .into_iter()
            .find(|format| {
                format
                    .file_extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(extension))
            })
            .map(|format| format.format())
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: QuizFormat) -> Result<QuestionSet, QuizError> {
        self.get(format)?.parse(source)
    }

    /// Serialize a question set to a single document
    pub fn serialize(&self, set: &QuestionSet, format: QuizFormat) -> Result<String, QuizError> {
        self.get(format)?.serialize(set)
    }

    /// Serialize a question set using the specified format and options
    pub fn serialize_with_options(
        &self,
        set: &QuestionSet,
        format: QuizFormat,
        options: &HashMap<String, String>,
    ) -> Result<SerializedQuiz, QuizError> {
        self.get(format)?.serialize_with_options(set, options)
    }

    /// Create a registry with the built-in codecs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::JsonFormat);
        registry.register(crate::formats::MarkdownFormat);
        registry.register(crate::formats::MxmlFormat::default());

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
