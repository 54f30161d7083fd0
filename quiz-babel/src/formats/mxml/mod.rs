//! Moodle XML (MXML) format implementation
//!
//! # Structure
//!
//! ```text
//! <quiz>
//!   <question type="category">
//!     <category><text>$course$/top/Math/Algebra</text></category>
//!   </question>
//!   <question type="multichoice">
//!     <name><text>Title</text></name>
//!     <questiontext format="markdown"><text>Body</text></questiontext>
//!     <generalfeedback format="markdown"><text>Feedback</text></generalfeedback>
//!     <single>true</single>
//!     <shuffleanswers>true</shuffleanswers>
//!     <answernumbering>abc</answernumbering>
//!     <answer fraction="100" format="markdown">
//!       <text>Choice</text>
//!       <feedback format="markdown"><text>Answer feedback</text></feedback>
//!     </answer>
//!   </question>
//! </quiz>
//! ```
//!
//! Categories are Moodle category markers: every question after a marker belongs to it,
//! and each `/` segment of the path is one nested category level under `top`. A choice is
//! correct when its `fraction` is positive.
//!
//! # Options
//!
//! | key                | values                             | default |
//! |--------------------|------------------------------------|---------|
//! | `category`         | `/` path replacing every category  | none    |
//! | `shuffle-answers`  | `true`/`false`                     | `true`  |
//! | `answer-numbering` | `abc`, `ABCD`, `123`, `iii`, `IIII`, `none` | `abc` |
//!
//! `single`, `shuffleanswers` and `answernumbering` are presentation settings and are not
//! read back on import.

mod parser;
mod serializer;

pub use parser::parse_from_mxml;
pub use serializer::serialize_to_mxml;

use crate::error::QuizError;
use crate::format::{Format, QuizFormat, SerializedQuiz};
use crate::model::{CategoryPath, QuestionKind, QuestionSet};
use std::collections::HashMap;

pub(crate) const CATEGORY_CONTEXT: &str = "$course$";
pub(crate) const CATEGORY_CONTEXT_TOP: &str = "top";

/// Moodle `type` attribute for each question kind
pub(crate) const QUESTION_TYPES: &[(&str, QuestionKind)] = &[
    ("multichoice", QuestionKind::MultipleChoice),
    ("truefalse", QuestionKind::TrueFalse),
    ("shortanswer", QuestionKind::ShortAnswer),
    ("essay", QuestionKind::Essay),
];

pub const ANSWER_NUMBERING_STYLES: &[&str] = &["abc", "ABCD", "123", "iii", "IIII", "none"];

/// Serializer settings for MXML output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxmlOptions {
    pub category: Option<CategoryPath>,
    pub shuffle_answers: bool,
    pub answer_numbering: String,
}

impl Default for MxmlOptions {
    fn default() -> Self {
        MxmlOptions {
            category: None,
            shuffle_answers: true,
            answer_numbering: "abc".to_string(),
        }
    }
}

impl MxmlOptions {
    /// Layer string options (as passed through [`Format::serialize_with_options`]) over
    /// these settings.
    pub fn merged(&self, options: &HashMap<String, String>) -> Result<MxmlOptions, QuizError> {
        let mut merged = self.clone();
        for (key, value) in options {
            match key.as_str() {
                "category" => {
                    let path = CategoryPath::parse(value)
                        .map_err(|reason| QuizError::invalid_option(key, reason))?;
                    merged.category = Some(path);
                }
                "shuffle-answers" => {
                    merged.shuffle_answers = parse_bool(value)
                        .ok_or_else(|| QuizError::invalid_option(key, "expected true or false"))?;
                }
                "answer-numbering" => {
                    merged.answer_numbering = parse_numbering(value)?;
                }
                other => {
                    return Err(QuizError::NotSupported(format!(
                        "Format 'XML' does not support option '{other}'"
                    )))
                }
            }
        }
        Ok(merged)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn parse_numbering(raw: &str) -> Result<String, QuizError> {
    ANSWER_NUMBERING_STYLES
        .iter()
        .find(|style| **style == raw)
        .map(|style| style.to_string())
        .ok_or_else(|| {
            QuizError::invalid_option(
                "answer-numbering",
                format!("expected one of {}", ANSWER_NUMBERING_STYLES.join(", ")),
            )
        })
}

/// Format implementation for Moodle XML
#[derive(Default)]
pub struct MxmlFormat {
    options: MxmlOptions,
}

impl MxmlFormat {
    pub fn new(options: MxmlOptions) -> Self {
        Self { options }
    }
}

impl Format for MxmlFormat {
    fn format(&self) -> QuizFormat {
        QuizFormat::Xml
    }

    fn description(&self) -> &str {
        "Moodle XML quiz format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn parse(&self, source: &str) -> Result<QuestionSet, QuizError> {
        parse_from_mxml(source)
    }

    fn serialize(&self, set: &QuestionSet) -> Result<String, QuizError> {
        serialize_to_mxml(set, &self.options)
    }

    fn serialize_with_options(
        &self,
        set: &QuestionSet,
        options: &HashMap<String, String>,
    ) -> Result<SerializedQuiz, QuizError> {
        let options = self.options.merged(options)?;
        serialize_to_mxml(set, &options).map(SerializedQuiz::Text)
    }
}
