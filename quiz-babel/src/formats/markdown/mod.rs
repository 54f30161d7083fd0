//! Markdown format implementation
//!
//! A constrained Markdown dialect where each `# ` heading starts one question.
//!
//! # Layout
//!
//! ```text
//! # Addition
//!
//! ## Question Text
//!
//! What is **2 + 2**?
//!
//! ## Question Answers
//!
//! - 3
//! + 4
//!
//! ## Feedback
//!
//! Count on your fingers.
//! ```
//!
//! The compact layout (heading, body, answer list, no `## ` sections) is also accepted on
//! import. Serialization always produces the sectioned layout above.
//!
//! # Element Mapping Table
//!
//! | Model field        | Markdown                          | Notes                                  |
//! |--------------------|-----------------------------------|----------------------------------------|
//! | title              | `# Title`                         | Whitespace collapsed on export         |
//! | body               | `## Question Text` section        | Outer blank lines trimmed; see below   |
//! | correct choice     | `+ text`                          |                                        |
//! | incorrect choice   | `- text`                          |                                        |
//! | short-answer entry | `= text`                          | Cannot be mixed with `+`/`-`           |
//! | rejected short ans.| not representable                 | Dropped on export                      |
//! | multi-line choice  | continuation indented two spaces  | Blank lines inside a choice are lost   |
//! | feedback           | `## Feedback` section             | Same escaping as the body              |
//! | choice feedback    | not representable                 | Dropped on export, `None` on import    |
//! | category           | not representable                 | Dropped on export, `None` on import    |
//! | kind               | inferred, see below               | A multiple choice made of one correct  |
//! |                    |                                   | `True` and one `False` reads back as   |
//! |                    |                                   | true/false                             |
//!
//! # Kind Inference
//!
//! The question kind is not written down; it is inferred from the answer list (see
//! `parser::infer_kind`): no answers is an essay, `=` answers are a short answer, a
//! `True`/`False` pair with one correct answer is true/false, and anything else with at
//! least one `+` answer is multiple choice. An answer list with no `+` is a parse error.
//!
//! Every export loss is logged at `debug`.
//!
//! # Headings in text
//!
//! `# ` and `## ` lines outside fenced code blocks are structural. On export such lines in a
//! body or feedback get a leading `\`, and on import one leading `\` is removed from any
//! line that would otherwise be a heading, so text round-trips unchanged. A body or feedback
//! that leaves a code fence open cannot be exported, since the fence would swallow the rest
//! of the document.
//!
//! # Limitations
//!
//! Bullet lists in a compact-layout body are read as answers; use the sectioned layout for
//! bodies containing lists.

pub mod parser;
pub mod serializer;

use crate::error::QuizError;
use crate::format::{Format, QuizFormat, SerializedQuiz};
use crate::model::QuestionSet;
use std::collections::HashMap;

/// Format implementation for Markdown quizzes
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn format(&self) -> QuizFormat {
        QuizFormat::Md
    }

    fn description(&self) -> &str {
        "Markdown quiz dialect, one '# ' heading per question"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str) -> Result<QuestionSet, QuizError> {
        parser::parse_from_markdown(source)
    }

    fn serialize(&self, set: &QuestionSet) -> Result<String, QuizError> {
        serializer::serialize_to_markdown(set)
    }

    fn serialize_with_options(
        &self,
        set: &QuestionSet,
        options: &HashMap<String, String>,
    ) -> Result<SerializedQuiz, QuizError> {
        if let Some(key) = options.keys().next() {
            return Err(QuizError::NotSupported(format!(
                "Format 'MD' does not support option '{key}'"
            )));
        }
        serializer::serialize_to_blocks(set).map(SerializedQuiz::Blocks)
    }
}
