//! Output naming for directory-split Markdown output
//!
//! Each question is written to `<stem>.md`, where the stem is its sanitized title.

use crate::error::QuizError;
use crate::model::QuestionSet;
use std::collections::HashMap;

/// Characters removed from titles before they become file stems
pub const FORBIDDEN_CHARS: &[char] = &['`', '(', ')', '.', ',', ';', ':', '?', '"', '/', '+'];

/// `Is 2+2=4?` → `Is_22=4`
///
/// Forbidden characters are deleted, surrounding whitespace is trimmed and every
/// remaining whitespace run becomes a single `_`.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// A serialized question paired with the file stem it is written under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlock {
    pub stem: String,
    pub text: String,
}

/// Pair every block with its question's stem, rejecting empty and duplicate stems.
/// `blocks` must be in set order, one per question.
pub fn split_outputs(set: &QuestionSet, blocks: Vec<String>) -> Result<Vec<NamedBlock>, QuizError> {
    if blocks.len() != set.len() {
        return Err(QuizError::NotSupported(format!(
            "{} blocks for {} questions",
            blocks.len(),
            set.len()
        )));
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut named = Vec::with_capacity(blocks.len());

    for (index, (question, text)) in set.iter().zip(blocks).enumerate() {
        let stem = sanitize_title(&question.title);
        if stem.is_empty() {
            return Err(QuizError::validation(
                index,
                &question.title,
                "title is empty once sanitized for use as a file name",
            ));
        }
        if let Some(&first) = seen.get(&stem) {
            return Err(QuizError::NamingCollision {
                stem,
                first,
                second: index,
            });
        }
        seen.insert(stem.clone(), index);
        tracing::trace!(index, %stem, "named output block");
        named.push(NamedBlock { stem, text });
    }

    Ok(named)
}
