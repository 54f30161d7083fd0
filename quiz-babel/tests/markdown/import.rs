//! Import tests for Markdown format (Markdown → QuestionSet)

use crate::common::fixture;
use quiz_babel::format::Format;
use quiz_babel::formats::markdown::MarkdownFormat;
use quiz_babel::{Choice, Location, QuestionKind, QuizError};

#[test]
fn kitchensink_infers_every_kind() {
    let set = MarkdownFormat.parse(&fixture("kitchensink.md")).unwrap();

    let summary: Vec<(&str, QuestionKind)> =
        set.iter().map(|q| (q.title.as_str(), q.kind)).collect();
    assert_eq!(
        summary,
        [
            ("Addition", QuestionKind::MultipleChoice),
            ("Primary colours", QuestionKind::MultipleChoice),
            ("The sky is blue", QuestionKind::TrueFalse),
            ("Capital of France", QuestionKind::ShortAnswer),
            ("Describe a proof", QuestionKind::Essay),
        ]
    );
}

#[test]
fn kitchensink_keeps_bodies_and_answers() {
    let set = MarkdownFormat.parse(&fixture("kitchensink.md")).unwrap();
    let questions = set.questions();

    assert_eq!(questions[0].feedback.as_deref(), Some("Count on your fingers."));
    assert_eq!(
        questions[1].body,
        "Which of these are primary colours?\n\n```text\n# not a heading, this is inside a fence\n```"
    );
    assert_eq!(
        questions[1].choices,
        vec![
            Choice::correct("Red"),
            Choice::correct("Blue"),
            Choice::incorrect("Green, which is\na secondary colour"),
        ]
    );
    assert_eq!(questions[3].body, "Name the capital city.");
    assert_eq!(questions[3].choices.len(), 2);
    assert!(questions.iter().all(|q| q.category.is_none()));
}

#[test]
fn concatenated_files_parse_as_one_document() {
    let a = "# First\n\nOne?\n\n+ yes\n- no\n";
    let b = "# Second\n\n## Question Text\n\nTwo?\n";
    let joined = [a, b].join("\n\n\n");
    let set = MarkdownFormat.parse(joined.trim_end_matches('\n')).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.questions()[1].kind, QuestionKind::Essay);
}

#[test]
fn errors_carry_block_index() {
    let md = "# Fine\n\nBody\n\n+ a\n\n# Broken\n\nBody\n\n- a\n- b\n";
    match MarkdownFormat.parse(md).unwrap_err() {
        QuizError::Parse {
            location: Location::Block { index, line },
            ..
        } => {
            assert_eq!(index, 1);
            assert_eq!(line, 7);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn mixed_short_answer_markers_are_rejected() {
    let err = MarkdownFormat
        .parse("# Mixed\n\nBody\n\n= a\n+ b\n")
        .unwrap_err();
    assert!(matches!(err, QuizError::Parse { .. }));
}
