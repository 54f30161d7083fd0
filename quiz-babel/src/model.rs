//! Canonical question model
//!
//! Every codec decodes into and encodes from these types. Nothing here knows about any
//! particular text format; the JSON codec derives its schema from the serde attributes
//! below, so field declaration order is also the JSON field order.

use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Labels a `true_false` question's two choices must carry (compared case-insensitively).
pub const TRUE_LABEL: &str = "True";
pub const FALSE_LABEL: &str = "False";

/// Question variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::ShortAnswer,
        QuestionKind::Essay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::Essay => "essay",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = QuestionKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown question kind '{s}' (expected one of {})", known.join(", "))
            })
    }
}

/// One answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Choice {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Choice {
            text: text.into(),
            is_correct,
            feedback: None,
        }
    }

    pub fn correct(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn incorrect(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// A single quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub title: String,
    pub kind: QuestionKind,
    pub body: String,
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// General feedback, shown once the question has been answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Question {
    pub fn new(title: impl Into<String>, kind: QuestionKind) -> Self {
        Question {
            title: title.into(),
            kind,
            body: String::new(),
            choices: Vec::new(),
            category: None,
            feedback: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn correct_count(&self) -> usize {
        self.choices.iter().filter(|c| c.is_correct).count()
    }

    /// Check the per-kind choice invariants. `index` is the question's position in its set and
    /// is only used to locate the error.
    pub fn validate(&self, index: usize) -> Result<(), QuizError> {
        let fail = |reason: String| Err(QuizError::validation(index, &self.title, reason));

        if self.title.trim().is_empty() {
            return fail("title is empty".to_string());
        }

        match self.kind {
            QuestionKind::MultipleChoice => {
                if self.correct_count() == 0 {
                    return fail("multiple_choice question has no correct choice".to_string());
                }
            }
            QuestionKind::TrueFalse => {
                if self.choices.len() != 2 {
                    return fail(format!(
                        "true_false question needs exactly 2 choices, found {}",
                        self.choices.len()
                    ));
                }
                if !has_boolean_labels(&self.choices) {
                    return fail(format!(
                        "true_false choices must be labelled '{TRUE_LABEL}' and '{FALSE_LABEL}'"
                    ));
                }
                if self.correct_count() != 1 {
                    return fail("true_false question needs exactly one correct choice".to_string());
                }
            }
            QuestionKind::ShortAnswer => {
                if self.correct_count() == 0 {
                    return fail("short_answer question has no accepted answer".to_string());
                }
            }
            QuestionKind::Essay => {
                if !self.choices.is_empty() {
                    return fail(format!(
                        "essay question cannot have choices, found {}",
                        self.choices.len()
                    ));
                }
            }
        }

        if let Some(category) = &self.category {
            CategoryPath::parse(category)
                .map_err(|reason| QuizError::validation(index, &self.title, reason))?;
        }

        Ok(())
    }
}

/// True when `choices` are exactly one `True` and one `False` label, in either order.
pub fn has_boolean_labels(choices: &[Choice]) -> bool {
    let [a, b] = choices else {
        return false;
    };
    let is = |c: &Choice, label: &str| c.text.trim().eq_ignore_ascii_case(label);
    (is(a, TRUE_LABEL) && is(b, FALSE_LABEL)) || (is(a, FALSE_LABEL) && is(b, TRUE_LABEL))
}

/// Ordered, validated collection of questions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Build a set, validating every question in order.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(QuestionSet { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    /// Append another (already validated) set, keeping order.
    pub fn extend(&mut self, other: QuestionSet) {
        self.questions.extend(other.questions);
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// A `/`-separated category path with no empty segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    pub const SEPARATOR: char = '/';

    /// Parse `Math/Algebra` style paths. Segments are trimmed; an empty segment anywhere
    /// (including a leading or trailing separator) is rejected.
    pub fn parse(path: &str) -> Result<Self, String> {
        let segments: Vec<String> = path
            .split(Self::SEPARATOR)
            .map(|s| s.trim().to_string())
            .collect();
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(format!("category '{path}' has an empty segment at position {pos}"));
        }
        Ok(CategoryPath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
