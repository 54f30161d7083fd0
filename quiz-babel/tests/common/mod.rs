//! Shared helpers for the integration tests.

use proptest::prelude::*;
use quiz_babel::model::has_boolean_labels;
use quiz_babel::{Choice, Question, QuestionKind, QuestionSet};
use std::path::PathBuf;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// A small set touching every question kind.
pub fn sample_set() -> QuestionSet {
    QuestionSet::new(vec![
        Question::new("Addition", QuestionKind::MultipleChoice)
            .with_body("What is 2 + 2?")
            .with_choices(vec![Choice::incorrect("3"), Choice::correct("4")])
            .with_category("Math/Algebra"),
        Question::new("Zero is even", QuestionKind::TrueFalse)
            .with_body("Zero is an even number.")
            .with_choices(vec![Choice::correct("True"), Choice::incorrect("False")]),
        Question::new("Capital", QuestionKind::ShortAnswer)
            .with_body("Capital of France?")
            .with_choices(vec![Choice::correct("Paris")]),
        Question::new("Proof", QuestionKind::Essay).with_body("Why are there infinitely many primes?"),
    ])
    .unwrap()
}

/// Single-spaced words; nothing a Markdown line could read as structure.
fn line_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}( [A-Za-z0-9,.?]{1,8}){0,3}"
}

/// A body line, sometimes shaped like a heading (optionally already backslash-escaped).
fn body_line() -> impl Strategy<Value = String> {
    (prop::sample::select(vec!["", "", "# ", "## ", "\\# ", "\\\\## "]), line_text())
        .prop_map(|(prefix, text)| format!("{prefix}{text}"))
}

/// Trimmed body text with no code fences.
fn body_text() -> impl Strategy<Value = String> {
    prop::collection::vec(body_line(), 1..4).prop_map(|lines| lines.join("\n"))
}

fn category() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::collection::vec("[A-Za-z]([A-Za-z0-9 ]{0,6}[A-Za-z0-9])?", 1..4)
            .prop_map(|s| s.join("/")),
    )
}

/// With `rich` unset, only choice lists Markdown reads back unchanged: every short answer is
/// accepted and a multiple choice is never a lone True/False pair.
fn choices_for(kind: QuestionKind, rich: bool) -> BoxedStrategy<Vec<Choice>> {
    match kind {
        QuestionKind::Essay => Just(Vec::new()).boxed(),
        QuestionKind::TrueFalse => any::<bool>()
            .prop_map(|first_true| {
                vec![
                    Choice::new("True", first_true),
                    Choice::new("False", !first_true),
                ]
            })
            .boxed(),
        QuestionKind::ShortAnswer => {
            (line_text(), prop::collection::vec((line_text(), any::<bool>()), 0..3))
                .prop_map(move |(first, rest)| {
                    let mut choices = vec![Choice::correct(first)];
                    choices.extend(rest.into_iter().map(|(t, c)| Choice::new(t, c || !rich)));
                    choices
                })
                .boxed()
        }
        QuestionKind::MultipleChoice => {
            let texts = prop_oneof![
                line_text(),
                Just("True".to_string()),
                Just("False".to_string()),
            ]
            .boxed();
            (texts.clone(), prop::collection::vec((texts, any::<bool>()), 1..5))
                .prop_map(|(first, rest)| {
                    let mut choices = vec![Choice::correct(first)];
                    choices.extend(rest.into_iter().map(|(t, c)| Choice::new(t, c)));
                    choices
                })
                .prop_filter("markdown reads a True/False pair as true_false", move |choices| {
                    rich || !(choices.iter().filter(|c| c.is_correct).count() == 1
                        && has_boolean_labels(choices))
                })
                .boxed()
        }
    }
}

/// Any valid question. With `rich` set, data Markdown cannot carry (categories, per-choice
/// feedback, rejected short answers, multiple-choice True/False pairs) is generated too.
pub fn question(rich: bool) -> impl Strategy<Value = Question> {
    prop::sample::select(QuestionKind::ALL.to_vec())
        .prop_flat_map(move |kind| {
            (
                line_text(),
                Just(kind),
                body_text(),
                choices_for(kind, rich),
                category(),
                prop::option::of(body_text()),
                prop::option::of(line_text()),
            )
        })
        .prop_map(move |(title, kind, body, mut choices, category, feedback, choice_fb)| {
            let mut question = Question::new(title, kind).with_body(body);
            if rich {
                if let (Some(fb), Some(first)) = (choice_fb, choices.first_mut()) {
                    first.feedback = Some(fb);
                }
                question.category = category;
            }
            question.choices = choices;
            question.feedback = feedback;
            question
        })
}

pub fn question_set(rich: bool) -> impl Strategy<Value = QuestionSet> {
    prop::collection::vec(question(rich), 0..6)
        .prop_map(|questions| QuestionSet::new(questions).expect("generated questions are valid"))
}
