//! Export tests for Markdown format (QuestionSet → Markdown)

use crate::common::{question_set, sample_set};
use insta::assert_snapshot;
use proptest::prelude::*;
use quiz_babel::format::{Format, SerializedQuiz};
use quiz_babel::formats::markdown::MarkdownFormat;
use quiz_babel::{Choice, Question, QuestionKind, QuestionSet, QuizError};
use std::collections::HashMap;

#[test]
fn sample_set_serializes_to_sectioned_layout() {
    let md = MarkdownFormat.serialize(&sample_set()).unwrap();
    assert_snapshot!(md, @r"
    # Addition

    ## Question Text

    What is 2 + 2?

    ## Question Answers

    - 3
    + 4

    # Zero is even

    ## Question Text

    Zero is an even number.

    ## Question Answers

    + True
    - False

    # Capital

    ## Question Text

    Capital of France?

    ## Question Answers

    = Paris

    # Proof

    ## Question Text

    Why are there infinitely many primes?
    ");
}

#[test]
fn options_call_yields_one_block_per_question() {
    let out = MarkdownFormat
        .serialize_with_options(&sample_set(), &HashMap::new())
        .unwrap();
    let SerializedQuiz::Blocks(blocks) = out else {
        panic!("markdown output should be split into blocks");
    };
    assert_eq!(blocks.len(), 4);
    assert!(blocks[0].starts_with("# Addition\n"));
    assert!(blocks.iter().all(|b| b.ends_with('\n') && !b.ends_with("\n\n")));
}

#[test]
fn per_choice_feedback_and_category_are_dropped_not_invented() {
    let set = QuestionSet::new(vec![Question::new("Pick", QuestionKind::MultipleChoice)
        .with_body("Pick one.")
        .with_choices(vec![Choice::correct("a").with_feedback("Right"), Choice::incorrect("b")])
        .with_category("Math")])
    .unwrap();

    let md = MarkdownFormat.serialize(&set).unwrap();
    assert!(!md.contains("Right"));
    assert!(!md.contains("Math"));

    let back = MarkdownFormat.parse(&md).unwrap();
    assert_eq!(back.questions()[0].choices[0].feedback, None);
    assert_eq!(back.questions()[0].category, None);
}

#[test]
fn rejected_short_answers_never_come_back_accepted() {
    let set = QuestionSet::new(vec![Question::new("Capital", QuestionKind::ShortAnswer)
        .with_body("Capital of France?")
        .with_choices(vec![Choice::correct("Paris"), Choice::incorrect("Lyon")])])
    .unwrap();

    let back = MarkdownFormat
        .parse(&MarkdownFormat.serialize(&set).unwrap())
        .unwrap();
    assert_eq!(back.questions()[0].choices, vec![Choice::correct("Paris")]);
}

#[test]
fn heading_lines_in_body_and_feedback_stay_in_their_question() {
    let set = QuestionSet::new(vec![
        Question::new("Q", QuestionKind::Essay)
            .with_body("Intro\n# Note\nmore")
            .with_feedback("## Question Answers\n\\# literal"),
        Question::new("Next", QuestionKind::Essay).with_body("After."),
    ])
    .unwrap();

    let md = MarkdownFormat.serialize(&set).unwrap();
    assert!(md.contains("\n\\# Note\n"));
    assert_eq!(MarkdownFormat.parse(&md).unwrap(), set);
}

#[test]
fn unclosed_fence_in_body_fails_to_serialize() {
    let set = QuestionSet::new(vec![
        Question::new("Code", QuestionKind::Essay).with_body("```rust\nfn main() {}")
    ])
    .unwrap();
    let err = MarkdownFormat.serialize(&set).unwrap_err();
    assert!(matches!(err, QuizError::Validation { index: 0, .. }));
}

#[test]
fn true_false_shaped_multiple_choice_reads_back_as_true_false() {
    let set = QuestionSet::new(vec![Question::new("Sky", QuestionKind::MultipleChoice)
        .with_body("The sky is blue.")
        .with_choices(vec![Choice::correct("True"), Choice::incorrect("False")])])
    .unwrap();

    let back = MarkdownFormat
        .parse(&MarkdownFormat.serialize(&set).unwrap())
        .unwrap();
    assert_eq!(back.questions()[0].kind, QuestionKind::TrueFalse);
    assert_eq!(back.questions()[0].choices, set.questions()[0].choices);
}

proptest! {
    #[test]
    fn decode_inverts_encode_for_plain_sets(set in question_set(false)) {
        let md = MarkdownFormat.serialize(&set).unwrap();
        let decoded = MarkdownFormat.parse(&md).unwrap();
        prop_assert_eq!(decoded, set);
    }
}
