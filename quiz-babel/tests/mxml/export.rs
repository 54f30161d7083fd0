//! Export tests for Moodle XML (QuestionSet → MXML)

use crate::common::{question_set, sample_set};
use insta::assert_snapshot;
use proptest::prelude::*;
use quiz_babel::format::Format;
use quiz_babel::formats::mxml::{parse_from_mxml, serialize_to_mxml, MxmlFormat, MxmlOptions};
use quiz_babel::{Choice, Question, QuestionKind, QuestionSet};

#[test]
fn category_path_survives_a_round_trip() {
    let set = QuestionSet::new(vec![Question::new("Roots", QuestionKind::Essay)
        .with_body("Find the roots.")
        .with_category("Math/Algebra")])
    .unwrap();

    let xml = MxmlFormat::default().serialize(&set).unwrap();
    let back = MxmlFormat::default().parse(&xml).unwrap();
    assert_eq!(back.questions()[0].category.as_deref(), Some("Math/Algebra"));
}

#[test]
fn short_answer_question_serializes() {
    let set = QuestionSet::new(vec![Question::new("Capital", QuestionKind::ShortAnswer)
        .with_body("Capital of <France>?")
        .with_choices(vec![Choice::correct("Paris"), Choice::correct("paris")])])
    .unwrap();

    let xml = serialize_to_mxml(&set, &MxmlOptions::default()).unwrap();
    assert_snapshot!(xml, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <quiz>
      <question type="shortanswer">
        <name>
          <text>Capital</text>
        </name>
        <questiontext format="markdown">
          <text>Capital of &lt;France&gt;?</text>
        </questiontext>
        <answer fraction="100" format="markdown">
          <text>Paris</text>
        </answer>
        <answer fraction="100" format="markdown">
          <text>paris</text>
        </answer>
      </question>
    </quiz>
    "#);
}

#[test]
fn categories_are_written_only_when_they_change() {
    let xml = serialize_to_mxml(&sample_set(), &MxmlOptions::default()).unwrap();
    // Math/Algebra for the first question, then back to top for the rest.
    assert_eq!(xml.matches("type=\"category\"").count(), 2);
    assert!(xml.contains("<text>$course$/top/Math/Algebra</text>"));
    assert!(xml.contains("<text>$course$/top</text>"));
    assert_eq!(parse_from_mxml(&xml).unwrap(), sample_set());
}

proptest! {
    #[test]
    fn decode_inverts_encode(set in question_set(true)) {
        let xml = serialize_to_mxml(&set, &MxmlOptions::default()).unwrap();
        let decoded = parse_from_mxml(&xml).unwrap();
        prop_assert_eq!(decoded, set);
    }
}
