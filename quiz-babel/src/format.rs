//! Format trait definition
//!
//! This module defines the closed set of quiz formats and the Format trait every codec
//! implements. The trait provides a uniform interface for decoding text into a
//! [`QuestionSet`] and encoding a set back to text.

use crate::error::QuizError;
use crate::model::QuestionSet;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Declared format tag for an input or output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum QuizFormat {
    Json,
    Xml,
    Md,
}

impl QuizFormat {
    pub const ALL: [QuizFormat; 3] = [QuizFormat::Json, QuizFormat::Xml, QuizFormat::Md];

    /// Upper-case tag as used on the command line (`JSON`, `XML`, `MD`)
    pub fn tag(&self) -> &'static str {
        match self {
            QuizFormat::Json => "JSON",
            QuizFormat::Xml => "XML",
            QuizFormat::Md => "MD",
        }
    }

    /// Extension used when writing files of this format
    pub fn extension(&self) -> &'static str {
        match self {
            QuizFormat::Json => "json",
            QuizFormat::Xml => "xml",
            QuizFormat::Md => "md",
        }
    }

    /// Infer a format from a path's extension (case-insensitive).
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Option<QuizFormat> {
        let extension = path.as_ref().extension()?.to_str()?;
        QuizFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for QuizFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for QuizFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JSON" => Ok(QuizFormat::Json),
            "XML" | "MXML" => Ok(QuizFormat::Xml),
            "MD" | "MARKDOWN" => Ok(QuizFormat::Md),
            _ => Err(format!("unknown format '{s}' (expected JSON, XML or MD)")),
        }
    }
}

impl TryFrom<String> for QuizFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedQuiz {
    /// One text document (JSON, XML)
    Text(String),
    /// One text block per question, in set order (Markdown)
    Blocks(Vec<String>),
}

impl SerializedQuiz {
    /// Consume the output and return it as a single document. Blocks are separated by one
    /// blank line.
    pub fn into_text(self) -> String {
        match self {
            SerializedQuiz::Text(text) => text,
            SerializedQuiz::Blocks(blocks) => blocks.join("\n"),
        }
    }
}

/// Trait for quiz formats
///
/// Implementors provide bidirectional conversion between a string representation and the
/// canonical [`QuestionSet`].
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn format(&self) -> QuizFormat {
///         QuizFormat::Json
///     }
///
///     fn parse(&self, source: &str) -> Result<QuestionSet, QuizError> {
///         todo!()
///     }
///
///     fn serialize(&self, set: &QuestionSet) -> Result<String, QuizError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The tag this codec handles
    fn format(&self) -> QuizFormat;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse source text into a question set
    fn parse(&self, source: &str) -> Result<QuestionSet, QuizError>;

    /// Serialize a question set into source text
    fn serialize(&self, set: &QuestionSet) -> Result<String, QuizError>;

    /// Serialize a question set, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which delegates to
    /// [`Format::serialize`]. Formats producing per-question blocks or accepting options
    /// override it.
    fn serialize_with_options(
        &self,
        set: &QuestionSet,
        options: &HashMap<String, String>,
    ) -> Result<SerializedQuiz, QuizError> {
        if let Some(key) = options.keys().next() {
            return Err(QuizError::NotSupported(format!(
                "Format '{}' does not support option '{key}'",
                self.format()
            )));
        }
        self.serialize(set).map(SerializedQuiz::Text)
    }
}
