//! JSON format implementation
//!
//! The JSON form is a plain array of question objects and is the lossless reference format:
//! every field of the canonical model round-trips exactly.
//!
//! ```text
//! [
//!   {
//!     "title": "Addition",
//!     "kind": "multiple_choice",
//!     "body": "What is **2 + 2**?",
//!     "choices": [
//!       { "text": "4", "is_correct": true, "feedback": "Yes" },
//!       { "text": "5", "is_correct": false }
//!     ],
//!     "category": "Math/Arithmetic"
//!   }
//! ]
//! ```
//!
//! Field order on output is fixed (`title, kind, body, choices, category, feedback`) so that
//! regenerated files produce stable diffs. `title` and `kind` are required on input; an
//! unknown `kind` parses but fails validation, naming the offending question.

use crate::error::{Location, QuizError};
use crate::format::{Format, QuizFormat};
use crate::model::{Choice, Question, QuestionSet};
use serde::Deserialize;

/// Wire shape of a question before its kind is checked
#[derive(Debug, Deserialize)]
struct RawQuestion {
    title: String,
    kind: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    feedback: Option<String>,
}

impl RawQuestion {
    fn into_question(self, index: usize) -> Result<Question, QuizError> {
        let kind = self
            .kind
            .parse()
            .map_err(|reason: String| QuizError::validation(index, &self.title, reason))?;
        Ok(Question {
            title: self.title,
            kind,
            body: self.body,
            choices: self.choices,
            category: self.category,
            feedback: self.feedback,
        })
    }
}

/// Decode a JSON array of questions.
pub fn decode(source: &str) -> Result<QuestionSet, QuizError> {
    let raw: Vec<RawQuestion> = serde_json::from_str(source).map_err(|e| {
        QuizError::parse(
            QuizFormat::Json,
            Location::Position {
                line: e.line(),
                column: e.column(),
            },
            strip_position_suffix(&e.to_string()),
        )
    })?;

    let questions = raw
        .into_iter()
        .enumerate()
        .map(|(index, q)| q.into_question(index))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(questions = questions.len(), "decoded JSON question set");
    QuestionSet::new(questions)
}

/// Encode a question set as a pretty-printed JSON array with a trailing newline.
pub fn encode(set: &QuestionSet) -> String {
    // Serializing plain strings/bools/vecs into a String cannot fail.
    let mut text = serde_json::to_string_pretty(set.questions()).unwrap_or_else(|_| "[]".into());
    text.push('\n');
    text
}

/// serde_json appends " at line X column Y" to its messages; the location already carries it.
fn strip_position_suffix(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

/// Format implementation for the JSON question array
pub struct JsonFormat;

impl Format for JsonFormat {
    fn format(&self) -> QuizFormat {
        QuizFormat::Json
    }

    fn description(&self) -> &str {
        "JSON question array (lossless reference format)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, source: &str) -> Result<QuestionSet, QuizError> {
        decode(source)
    }

    fn serialize(&self, set: &QuestionSet) -> Result<String, QuizError> {
        Ok(encode(set))
    }
}
