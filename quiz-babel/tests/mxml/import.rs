//! Import tests for Moodle XML (MXML → QuestionSet)

use crate::common::fixture;
use quiz_babel::format::Format;
use quiz_babel::formats::mxml::{parse_from_mxml, MxmlFormat};
use quiz_babel::{Choice, Location, QuestionKind, QuizError, QuizFormat};

#[test]
fn kitchensink_decodes_every_kind_with_categories() {
    let set = MxmlFormat::default()
        .parse(&fixture("kitchensink.xml"))
        .unwrap();

    let summary: Vec<(&str, QuestionKind, Option<&str>)> = set
        .iter()
        .map(|q| (q.title.as_str(), q.kind, q.category.as_deref()))
        .collect();
    assert_eq!(
        summary,
        [
            ("Roots of x^2 = 4", QuestionKind::MultipleChoice, Some("Math/Algebra")),
            ("Zero is even", QuestionKind::TrueFalse, Some("Math/Algebra")),
            ("Capital of Italy", QuestionKind::ShortAnswer, Some("Geography")),
            ("Rivers", QuestionKind::Essay, Some("Geography")),
        ]
    );
}

#[test]
fn kitchensink_keeps_text_feedback_and_correctness() {
    let set = parse_from_mxml(&fixture("kitchensink.xml")).unwrap();
    let roots = &set.questions()[0];

    assert_eq!(roots.body, "<p>Select every root.</p>");
    assert_eq!(roots.feedback.as_deref(), Some("Both signs square to 4."));
    assert_eq!(
        roots.choices,
        vec![
            Choice::correct("2").with_feedback("Correct"),
            Choice::correct("-2"),
            Choice::incorrect("4"),
        ]
    );
    assert!(set.questions()[3].choices.is_empty());
}

fn parse_error(xml: &str) -> (Location, String) {
    match parse_from_mxml(xml).unwrap_err() {
        QuizError::Parse {
            format,
            location,
            message,
        } => {
            assert_eq!(format, QuizFormat::Xml);
            (location, message)
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn unbalanced_tags_report_a_position() {
    let (location, _) = parse_error("<quiz>\n  <question type=\"essay\">\n</quiz>\n");
    assert!(matches!(location, Location::Position { .. }));
}

#[test]
fn unknown_question_type_is_rejected() {
    let (location, message) = parse_error(
        "<quiz><question type=\"matching\"><name><text>M</text></name></question></quiz>",
    );
    assert_eq!(
        location,
        Location::Element {
            index: 0,
            name: "question".to_string()
        }
    );
    assert!(message.contains("matching"));
}

#[test]
fn answer_without_fraction_is_rejected() {
    let xml = "<quiz>\
        <question type=\"category\"><category><text>$course$/top/A</text></category></question>\
        <question type=\"multichoice\"><name><text>Q</text></name>\
        <questiontext><text>Body</text></questiontext>\
        <answer><text>a</text></answer></question></quiz>";
    let (location, message) = parse_error(xml);
    assert_eq!(
        location,
        Location::Element {
            index: 1,
            name: "Q".to_string()
        }
    );
    assert!(message.contains("fraction"));
}

#[test]
fn wrong_root_element_is_rejected() {
    let (location, _) = parse_error("<questions/>");
    assert_eq!(location, Location::Document);
}

#[test]
fn empty_category_segment_fails_validation() {
    let xml = "<quiz>\
        <question type=\"category\"><category><text>$course$/top/Math//Algebra</text></category></question>\
        <question type=\"essay\"><name><text>E</text></name><questiontext><text>x</text></questiontext></question>\
        </quiz>";
    let err = parse_from_mxml(xml).unwrap_err();
    assert!(matches!(err, QuizError::Validation { index: 0, .. }));
}
