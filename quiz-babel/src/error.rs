//! Error types for quiz conversion

use crate::QuizFormat;
use std::fmt;
use thiserror::Error;

/// Where in the source text a parse error was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// 1-based line and column (JSON, XML)
    Position { line: usize, column: usize },
    /// 0-based question block and the 1-based source line inside the whole input (Markdown)
    Block { index: usize, line: usize },
    /// 0-based `<question>` element index, with the element or question name
    Element { index: usize, name: String },
    /// The whole document (e.g. a wrong root element)
    Document,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Position { line, column } => write!(f, "line {line}, column {column}"),
            Location::Block { index, line } => write!(f, "block {index} (line {line})"),
            Location::Element { index, name } => write!(f, "element {index} ({name})"),
            Location::Document => write!(f, "document"),
        }
    }
}

/// Errors that can occur while converting quiz banks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    /// Format not registered
    #[error("Format '{0}' not found")]
    FormatNotFound(QuizFormat),

    /// Source text is malformed for its declared format
    #[error("{format} parse error at {location}: {message}")]
    Parse {
        format: QuizFormat,
        location: Location,
        message: String,
    },

    /// Question data parsed but breaks a model invariant
    #[error("Invalid question #{index} '{title}': {reason}")]
    Validation {
        index: usize,
        title: String,
        reason: String,
    },

    /// No conversion path for the requested pair
    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: QuizFormat, to: QuizFormat },

    /// Two questions would be written to the same file in one run
    #[error("Output file '{stem}' would be written twice (questions #{first} and #{second})")]
    NamingCollision {
        stem: String,
        first: usize,
        second: usize,
    },

    /// Serializer option with a value the codec cannot use
    #[error("Invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    /// Codec asked to do something it cannot (e.g. unknown serializer option)
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl QuizError {
    pub fn parse(format: QuizFormat, location: Location, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            location,
            message: message.into(),
        }
    }

    pub fn validation(index: usize, title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            index,
            title: title.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// True for the error kinds caused by bad input text rather than bad usage.
    pub fn is_input_error(&self) -> bool {
        matches!(self, QuizError::Parse { .. } | QuizError::Validation { .. })
    }
}
