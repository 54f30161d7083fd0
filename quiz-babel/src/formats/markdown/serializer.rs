//! Markdown serialization (QuestionSet → Markdown)
//!
//! Always emits the sectioned layout, one block per question. Each block ends with exactly
//! one newline so blocks can be written to separate files or joined with a blank line.

use super::parser::{is_heading, FenceTracker, HEADING_ESCAPE};
use crate::error::QuizError;
use crate::model::{has_boolean_labels, Choice, Question, QuestionKind, QuestionSet};

pub const TEXT_SECTION: &str = "## Question Text";
pub const ANSWERS_SECTION: &str = "## Question Answers";
pub const FEEDBACK_SECTION: &str = "## Feedback";

/// Serialize every question to its own Markdown block, in set order.
pub fn serialize_to_blocks(set: &QuestionSet) -> Result<Vec<String>, QuizError> {
    set.iter()
        .enumerate()
        .map(|(index, question)| serialize_question(index, question))
        .collect()
}

/// Serialize a set to a single document (blocks separated by a blank line).
pub fn serialize_to_markdown(set: &QuestionSet) -> Result<String, QuizError> {
    Ok(serialize_to_blocks(set)?.join("\n"))
}

fn serialize_question(index: usize, question: &Question) -> Result<String, QuizError> {
    report_dropped_fields(question);

    let mut sections = vec![format!("# {}", single_line(&question.title))];

    let unclosed_fence = |part: &str| {
        QuizError::validation(
            index,
            &question.title,
            format!("{part} leaves a code fence open, which would swallow the rest of the document"),
        )
    };

    let body = escape_headings(question.body.trim_matches('\n'));
    if leaves_fence_open(&body) {
        return Err(unclosed_fence("body"));
    }
    if body.is_empty() {
        sections.push(TEXT_SECTION.to_string());
    } else {
        sections.push(format!("{TEXT_SECTION}\n\n{body}"));
    }

    // `=` cannot mark a wrong entry, so only accepted short answers are written.
    let choices: Vec<&Choice> = question
        .choices
        .iter()
        .filter(|c| question.kind != QuestionKind::ShortAnswer || c.is_correct)
        .collect();
    if !choices.is_empty() {
        let marker_for = |choice: &Choice| match (question.kind, choice.is_correct) {
            (QuestionKind::ShortAnswer, _) => '=',
            (_, true) => '+',
            (_, false) => '-',
        };
        let answers: Vec<String> = choices
            .iter()
            .map(|&choice| format!("{} {}", marker_for(choice), indent_continuation(&choice.text)))
            .collect();
        let answers = answers.join("\n");
        if leaves_fence_open(&answers) {
            return Err(unclosed_fence("an answer"));
        }
        sections.push(format!("{ANSWERS_SECTION}\n\n{answers}"));
    }

    if let Some(feedback) = question.feedback.as_deref() {
        let feedback = escape_headings(feedback.trim_matches('\n'));
        if leaves_fence_open(&feedback) {
            return Err(unclosed_fence("feedback"));
        }
        if !feedback.is_empty() {
            sections.push(format!("{FEEDBACK_SECTION}\n\n{feedback}"));
        }
    }

    let mut block = sections.join("\n\n");
    block.push('\n');
    Ok(block)
}

fn leaves_fence_open(text: &str) -> bool {
    let mut fences = FenceTracker::default();
    for line in text.lines() {
        fences.fenced(line);
    }
    fences.is_open()
}

/// Prefix `# ` and `## ` lines outside fences with a backslash so they stay body text.
/// Lines already starting with backslashes get one more, which the parser removes again.
fn escape_headings(text: &str) -> String {
    let mut fences = FenceTracker::default();
    text.lines()
        .map(|line| {
            let fenced = fences.fenced(line);
            if !fenced && is_heading(line.trim_start_matches(HEADING_ESCAPE)) {
                format!("{HEADING_ESCAPE}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line answers continue on lines indented by two spaces.
fn indent_continuation(text: &str) -> String {
    text.trim().lines().collect::<Vec<_>>().join("\n  ")
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn report_dropped_fields(question: &Question) {
    if question.kind == QuestionKind::MultipleChoice
        && question.correct_count() == 1
        && has_boolean_labels(&question.choices)
    {
        tracing::debug!(
            title = %question.title,
            "multiple_choice with a True/False pair reads back from markdown as true_false"
        );
    }
    if question.kind == QuestionKind::ShortAnswer {
        let rejected = question.choices.iter().filter(|c| !c.is_correct).count();
        if rejected > 0 {
            tracing::debug!(
                title = %question.title,
                choices = rejected,
                "markdown lists accepted short answers only; incorrect entries dropped"
            );
        }
    }
    if let Some(category) = &question.category {
        tracing::debug!(
            title = %question.title,
            %category,
            "markdown has no category field; category dropped"
        );
    }
    let with_feedback = question.choices.iter().filter(|c| c.feedback.is_some()).count();
    if with_feedback > 0 {
        tracing::debug!(
            title = %question.title,
            choices = with_feedback,
            "markdown has no per-answer feedback; answer feedback dropped"
        );
    }
}
