use super::{CATEGORY_CONTEXT_TOP, QUESTION_TYPES};
use crate::error::{Location, QuizError};
use crate::format::QuizFormat;
use crate::model::{Choice, Question, QuestionKind, QuestionSet};
use roxmltree::{Node, NodeType};

pub fn parse_from_mxml(source: &str) -> Result<QuestionSet, QuizError> {
    let doc = roxmltree::Document::parse(source).map_err(|e| {
        let pos = e.pos();
        QuizError::parse(
            QuizFormat::Xml,
            Location::Position {
                line: pos.row as usize,
                column: pos.col as usize,
            },
            format!("XML parsing error: {e}"),
        )
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "quiz" {
        return Err(QuizError::parse(
            QuizFormat::Xml,
            Location::Document,
            format!("Root element is <{}>, expected <quiz>", root.tag_name().name()),
        ));
    }

    let mut questions = Vec::new();
    let mut category: Option<String> = None;

    for (index, node) in root.children().filter(|n| n.is_element()).enumerate() {
        let name = node.tag_name().name();
        if name != "question" {
            return Err(element_error(index, name, format!("unexpected element <{name}>")));
        }

        let question_type = node
            .attribute("type")
            .ok_or_else(|| element_error(index, "question", "missing 'type' attribute"))?;

        if question_type == "category" {
            let path = nested_text(node, &["category", "text"]).unwrap_or_default();
            category = strip_category_context(&path);
            tracing::trace!(index, ?category, "entering category");
            continue;
        }

        let kind = QUESTION_TYPES
            .iter()
            .find(|(mxml_type, _)| *mxml_type == question_type)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| {
                element_error(
                    index,
                    "question",
                    format!("unknown question type '{question_type}'"),
                )
            })?;

        let mut question = process_question(node, index, kind)?;
        question.category = category.clone();
        questions.push(question);
    }

    tracing::debug!(questions = questions.len(), "decoded MXML question set");
    QuestionSet::new(questions)
}

fn process_question(node: Node, index: usize, kind: QuestionKind) -> Result<Question, QuizError> {
    let title = nested_text(node, &["name", "text"])
        .ok_or_else(|| element_error(index, "question", "missing <name><text> title"))?;

    let mut question = Question::new(title.trim(), kind)
        .with_body(nested_text(node, &["questiontext", "text"]).unwrap_or_default());
    question.feedback = nested_text(node, &["generalfeedback", "text"]).filter(|f| !f.is_empty());

    // Moodle exports essays with a placeholder answer; essays carry no choices.
    if kind == QuestionKind::Essay {
        return Ok(question);
    }

    for (answer_index, answer) in node
        .children()
        .filter(|n| n.has_tag_name("answer"))
        .enumerate()
    {
        question.choices.push(process_answer(answer, index, answer_index, &question.title)?);
    }

    Ok(question)
}

fn process_answer(
    node: Node,
    index: usize,
    answer_index: usize,
    title: &str,
) -> Result<Choice, QuizError> {
    let fraction = node.attribute("fraction").ok_or_else(|| {
        element_error(
            index,
            title,
            format!("answer {answer_index} is missing its 'fraction' attribute"),
        )
    })?;
    let fraction: f64 = fraction.trim().parse().map_err(|_| {
        element_error(
            index,
            title,
            format!("answer {answer_index} has non-numeric fraction '{fraction}'"),
        )
    })?;

    let mut choice = Choice::new(nested_text(node, &["text"]).unwrap_or_default(), fraction > 0.0);
    choice.feedback = nested_text(node, &["feedback", "text"]).filter(|f| !f.is_empty());
    Ok(choice)
}

/// Follow a path of child elements and return the concatenated text of the last one.
/// Text and CDATA children are both collected.
fn nested_text(node: Node, path: &[&str]) -> Option<String> {
    let mut current = node;
    for name in path {
        current = current.children().find(|n| n.has_tag_name(*name))?;
    }
    Some(
        current
            .children()
            .filter(|n| n.node_type() == NodeType::Text)
            .filter_map(|n| n.text())
            .collect(),
    )
}

/// `$course$/top/Math/Algebra` → `Math/Algebra`. The `$…$` context and the `top` category
/// are Moodle bookkeeping, not part of the path. The remaining segments are kept as written,
/// empty ones included so validation can reject them.
fn strip_category_context(raw: &str) -> Option<String> {
    let mut segments: Vec<&str> = raw.trim().split('/').collect();
    if segments.first().map(|s| s.trim()).is_some_and(|s| {
        s.len() >= 2 && s.starts_with('$') && s.ends_with('$')
    }) {
        segments.remove(0);
    }
    if segments.first().map(|s| s.trim()) == Some(CATEGORY_CONTEXT_TOP) {
        segments.remove(0);
    }
    match segments.as_slice() {
        [] => None,
        [only] if only.trim().is_empty() => None,
        _ => Some(segments.join("/")),
    }
}

fn element_error(index: usize, name: &str, message: impl Into<String>) -> QuizError {
    QuizError::parse(
        QuizFormat::Xml,
        Location::Element {
            index,
            name: name.to_string(),
        },
        message,
    )
}
