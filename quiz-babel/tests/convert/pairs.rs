use crate::common::{fixture, sample_set};
use quiz_babel::formats::json::encode;
use quiz_babel::{
    convert, split_outputs, Conversion, ConvertOptions, FormatRegistry, QuizError, QuizFormat,
    SerializedQuiz,
};

#[test]
fn xml_to_markdown_keeps_titles_in_order() {
    let xml = "<quiz>\
        <question type=\"essay\"><name><text>First question</text></name>\
        <questiontext><text>One</text></questiontext></question>\
        <question type=\"truefalse\"><name><text>Second question</text></name>\
        <questiontext><text>Two</text></questiontext>\
        <answer fraction=\"0\"><text>True</text></answer>\
        <answer fraction=\"100\"><text>False</text></answer></question>\
        </quiz>";

    let out = convert(xml, QuizFormat::Xml, QuizFormat::Md, &ConvertOptions::default()).unwrap();
    let SerializedQuiz::Blocks(blocks) = out else {
        panic!("markdown output should be split into blocks");
    };
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("# First question\n"));
    assert!(blocks[1].starts_with("# Second question\n"));
    assert!(blocks[1].contains("- True\n+ False"));
}

#[test]
fn markdown_to_markdown_fails_before_parsing() {
    let err = convert(
        "this is not valid quiz markdown",
        QuizFormat::Md,
        QuizFormat::Md,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        QuizError::UnsupportedConversion {
            from: QuizFormat::Md,
            to: QuizFormat::Md
        }
    );
}

#[test]
fn markdown_to_xml_uses_category_override() {
    let options = ConvertOptions::default().with_category("Math/Algebra");
    let xml = convert(&fixture("kitchensink.md"), QuizFormat::Md, QuizFormat::Xml, &options)
        .unwrap()
        .into_text();

    assert_eq!(xml.matches("type=\"category\"").count(), 1);
    let back = convert(&xml, QuizFormat::Xml, QuizFormat::Json, &ConvertOptions::default())
        .unwrap()
        .into_text();
    assert!(back.contains("\"category\": \"Math/Algebra\""));
}

#[test]
fn category_override_is_ignored_for_json() {
    let options = ConvertOptions::default().with_category("Ignored");
    let json = convert(&fixture("kitchensink.md"), QuizFormat::Md, QuizFormat::Json, &options)
        .unwrap()
        .into_text();
    assert!(!json.contains("Ignored"));
}

#[test]
fn extra_options_reach_the_target_codec() {
    let options = ConvertOptions::default().with_extra("answer-numbering", "ABCD");
    let xml = convert(&encode(&sample_set()), QuizFormat::Json, QuizFormat::Xml, &options)
        .unwrap()
        .into_text();
    assert!(xml.contains("<answernumbering>ABCD</answernumbering>"));

    let err = convert(&encode(&sample_set()), QuizFormat::Json, QuizFormat::Md, &options)
        .unwrap_err();
    assert!(matches!(err, QuizError::NotSupported(_)));
}

#[test]
fn json_and_markdown_agree_through_xml() {
    let registry = FormatRegistry::default();
    let to_xml = Conversion::new(QuizFormat::Md, QuizFormat::Xml).unwrap();
    let from_xml = Conversion::new(QuizFormat::Xml, QuizFormat::Md).unwrap();

    let source = fixture("kitchensink.md");
    let xml = to_xml
        .run_with(&registry, &source, &ConvertOptions::default())
        .unwrap()
        .into_text();
    let md = from_xml
        .run_with(&registry, &xml, &ConvertOptions::default())
        .unwrap();

    let original = registry.parse(&source, QuizFormat::Md).unwrap();
    let again = registry.parse(&md.into_text(), QuizFormat::Md).unwrap();
    assert_eq!(again, original);
}

#[test]
fn directory_split_names_blocks_after_titles() {
    let set = sample_set();
    let registry = FormatRegistry::default();
    let conversion = Conversion::new(QuizFormat::Json, QuizFormat::Md).unwrap();
    let SerializedQuiz::Blocks(blocks) = conversion
        .encode(&registry, &set, &ConvertOptions::default())
        .unwrap()
    else {
        panic!("markdown output should be split into blocks");
    };

    let stems: Vec<String> = split_outputs(&set, blocks)
        .unwrap()
        .into_iter()
        .map(|b| b.stem)
        .collect();
    assert_eq!(stems, ["Addition", "Zero_is_even", "Capital", "Proof"]);
}

#[test]
fn rejected_xml_short_answer_stays_rejected_through_markdown() {
    let xml = "<quiz><question type=\"shortanswer\"><name><text>Capital</text></name>\
        <questiontext><text>Capital of France?</text></questiontext>\
        <answer fraction=\"100\"><text>Paris</text></answer>\
        <answer fraction=\"0\"><text>Lyon</text></answer></question></quiz>";

    let md = convert(xml, QuizFormat::Xml, QuizFormat::Md, &ConvertOptions::default())
        .unwrap()
        .into_text();
    let json = convert(&md, QuizFormat::Md, QuizFormat::Json, &ConvertOptions::default())
        .unwrap()
        .into_text();
    assert!(json.contains("\"Paris\""));
    assert!(!json.contains("Lyon"));
}
