use super::{MxmlOptions, CATEGORY_CONTEXT, CATEGORY_CONTEXT_TOP, QUESTION_TYPES};
use crate::error::QuizError;
use crate::model::{CategoryPath, Choice, Question, QuestionKind, QuestionSet};

const INDENT: &str = "  ";

pub fn serialize_to_mxml(set: &QuestionSet, options: &MxmlOptions) -> Result<String, QuizError> {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<quiz>\n");
    let mut current_category: Option<String> = None;

    for (index, question) in set.iter().enumerate() {
        let category = effective_category(question, index, options)?;
        if category != current_category {
            write_category(&mut out, category.as_deref());
            current_category = category;
        }
        write_question(&mut out, question, options);
    }

    out.push_str("</quiz>\n");
    Ok(out)
}

/// The override wins over the stored category; the question itself is left untouched. A
/// stored category is written as given once it validates.
fn effective_category(
    question: &Question,
    index: usize,
    options: &MxmlOptions,
) -> Result<Option<String>, QuizError> {
    if let Some(category) = &options.category {
        return Ok(Some(category.to_string()));
    }
    question
        .category
        .as_deref()
        .map(|raw| {
            CategoryPath::parse(raw)
                .map(|_| raw.to_string())
                .map_err(|reason| QuizError::validation(index, &question.title, reason))
        })
        .transpose()
}

/// Moodle category marker. Each `/` segment becomes one nesting level under `top`; `None`
/// returns following questions to the top category.
fn write_category(out: &mut String, category: Option<&str>) {
    let mut path = format!("{CATEGORY_CONTEXT}/{CATEGORY_CONTEXT_TOP}");
    if let Some(category) = category {
        path.push('/');
        path.push_str(category);
    }
    out.push_str(&format!("{INDENT}<question type=\"category\">\n"));
    out.push_str(&format!("{INDENT}{INDENT}<category>\n"));
    out.push_str(&format!(
        "{INDENT}{INDENT}{INDENT}<text>{}</text>\n",
        escape_xml(&path)
    ));
    out.push_str(&format!("{INDENT}{INDENT}</category>\n"));
    out.push_str(&format!("{INDENT}</question>\n"));
}

fn write_question(out: &mut String, question: &Question, options: &MxmlOptions) {
    let mxml_type = QUESTION_TYPES
        .iter()
        .find(|(_, kind)| *kind == question.kind)
        .map(|(mxml_type, _)| *mxml_type)
        .unwrap_or("multichoice");
    let level = 2;

    out.push_str(&format!("{INDENT}<question type=\"{mxml_type}\">\n"));
    write_text_element(out, level, "name", None, &question.title);
    write_text_element(out, level, "questiontext", Some("markdown"), &question.body);
    if let Some(feedback) = &question.feedback {
        write_text_element(out, level, "generalfeedback", Some("markdown"), feedback);
    }

    if question.kind == QuestionKind::MultipleChoice {
        let single = question.correct_count() == 1;
        write_value(out, level, "single", if single { "true" } else { "false" });
        write_value(
            out,
            level,
            "shuffleanswers",
            if options.shuffle_answers { "true" } else { "false" },
        );
        write_value(out, level, "answernumbering", &options.answer_numbering);
    }

    let correct = question.correct_count();
    for choice in &question.choices {
        write_answer(out, level, question.kind, correct, choice);
    }

    out.push_str(&format!("{INDENT}</question>\n"));
}

fn write_answer(
    out: &mut String,
    level: usize,
    kind: QuestionKind,
    correct: usize,
    choice: &Choice,
) {
    let indent = INDENT.repeat(level);
    let fraction = answer_fraction(kind, correct, choice.is_correct);
    out.push_str(&format!(
        "{indent}<answer fraction=\"{fraction}\" format=\"markdown\">\n"
    ));
    out.push_str(&format!(
        "{indent}{INDENT}<text>{}</text>\n",
        escape_xml(&choice.text)
    ));
    if let Some(feedback) = &choice.feedback {
        write_text_element(out, level + 1, "feedback", Some("markdown"), feedback);
    }
    out.push_str(&format!("{indent}</answer>\n"));
}

/// Moodle grades with percentages. Multiple-choice credit is split across the correct
/// answers; every accepted short answer is worth full credit.
fn answer_fraction(kind: QuestionKind, correct: usize, is_correct: bool) -> String {
    if !is_correct {
        return "0".to_string();
    }
    match kind {
        QuestionKind::MultipleChoice if correct > 1 => format_fraction(100.0 / correct as f64),
        _ => "100".to_string(),
    }
}

fn format_fraction(value: f64) -> String {
    let text = format!("{value:.5}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn write_text_element(
    out: &mut String,
    level: usize,
    tag: &str,
    format: Option<&str>,
    text: &str,
) {
    let indent = INDENT.repeat(level);
    match format {
        Some(format) => out.push_str(&format!("{indent}<{tag} format=\"{format}\">\n")),
        None => out.push_str(&format!("{indent}<{tag}>\n")),
    }
    out.push_str(&format!("{indent}{INDENT}<text>{}</text>\n", escape_xml(text)));
    out.push_str(&format!("{indent}</{tag}>\n"));
}

fn write_value(out: &mut String, level: usize, tag: &str, value: &str) {
    let indent = INDENT.repeat(level);
    out.push_str(&format!("{indent}<{tag}>{}</{tag}>\n", escape_xml(value)));
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}
