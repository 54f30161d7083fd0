//! Markdown parsing (Markdown → QuestionSet)
//!
//! Pipeline: source → lines tagged with fence state → question blocks → sections or compact
//! body/answer split → answers → inferred kind → validated set.

use crate::error::{Location, QuizError};
use crate::format::QuizFormat;
use crate::model::{has_boolean_labels, Choice, Question, QuestionKind, QuestionSet};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[ \t]+(.*\S)[ \t]*$").unwrap());
static SECTION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##[ \t]+(.*\S)[ \t]*$").unwrap());
static ANSWER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+=-])[ \t]+(.*\S)[ \t]*$").unwrap());
static BARE_MARKER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+=-][ \t]*$").unwrap());
static CONTINUATION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:  |\t)(.*)$").unwrap());
static FENCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ]{0,3}(```|~~~)").unwrap());

/// Prefix that keeps a body line reading like a heading from being structural.
pub(super) const HEADING_ESCAPE: char = '\\';

/// `# ` and `## ` lines outside fences delimit questions and sections.
pub(super) fn is_heading(text: &str) -> bool {
    TITLE_LINE.is_match(text) || SECTION_LINE.is_match(text)
}

/// The fence delimiter (```` ``` ```` or `~~~`) opening or closing a fenced block on this line.
pub(super) fn fence_delimiter(text: &str) -> Option<&str> {
    FENCE_LINE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Fence state carried line by line; a fence closes only on its own delimiter.
#[derive(Debug, Default)]
pub(super) struct FenceTracker<'a> {
    open: Option<&'a str>,
}

impl<'a> FenceTracker<'a> {
    /// Whether `text` is inside (or delimits) a fenced block.
    pub(super) fn fenced(&mut self, text: &'a str) -> bool {
        match (self.open, fence_delimiter(text)) {
            (None, Some(opening)) => {
                self.open = Some(opening);
                true
            }
            (Some(open), Some(close)) if open == close => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }

    pub(super) fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Parse a Markdown quiz document.
pub fn parse_from_markdown(source: &str) -> Result<QuestionSet, QuizError> {
    let blocks = split_blocks(source)?;
    tracing::debug!(blocks = blocks.len(), "split markdown into question blocks");

    let questions = blocks
        .iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;
    QuestionSet::new(questions)
}

#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    /// 1-based line number in the whole input
    number: usize,
    text: &'a str,
    /// Inside (or delimiting) a fenced code block; such lines are never structural
    fenced: bool,
}

impl<'a> SourceLine<'a> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Text with one heading escape removed, for lines the serializer escaped.
    fn content(&self) -> &'a str {
        match self.text.strip_prefix(HEADING_ESCAPE) {
            Some(rest) if !self.fenced && is_heading(rest.trim_start_matches(HEADING_ESCAPE)) => rest,
            _ => self.text,
        }
    }

    fn section(&self) -> Option<&str> {
        if self.fenced {
            return None;
        }
        SECTION_LINE
            .captures(self.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

#[derive(Debug)]
struct RawBlock<'a> {
    index: usize,
    title: &'a str,
    title_line: usize,
    lines: Vec<SourceLine<'a>>,
}

impl RawBlock<'_> {
    fn error_at(&self, line: usize, message: impl Into<String>) -> QuizError {
        QuizError::parse(
            QuizFormat::Md,
            Location::Block {
                index: self.index,
                line,
            },
            message,
        )
    }
}

fn split_blocks(source: &str) -> Result<Vec<RawBlock<'_>>, QuizError> {
    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut fences = FenceTracker::default();

    for (idx, text) in source.lines().enumerate() {
        let number = idx + 1;
        let fenced = fences.fenced(text);

        if !fenced {
            if let Some(title) = TITLE_LINE.captures(text).and_then(|c| c.get(1)) {
                blocks.push(RawBlock {
                    index: blocks.len(),
                    title: title.as_str(),
                    title_line: number,
                    lines: Vec::new(),
                });
                continue;
            }
        }

        let line = SourceLine {
            number,
            text,
            fenced,
        };
        match blocks.last_mut() {
            Some(block) => block.lines.push(line),
            None if line.is_blank() => {}
            None => {
                return Err(QuizError::parse(
                    QuizFormat::Md,
                    Location::Block { index: 0, line: number },
                    "text before the first '# ' question heading",
                ))
            }
        }
    }

    Ok(blocks)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Correct,
    Incorrect,
    Accepted,
}

impl Marker {
    fn from_char(c: &str) -> Marker {
        match c {
            "+" => Marker::Correct,
            "=" => Marker::Accepted,
            _ => Marker::Incorrect,
        }
    }
}

#[derive(Debug)]
struct Answer {
    marker: Marker,
    text: String,
    line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Text,
    Answers,
    Feedback,
}

impl Section {
    fn from_heading(heading: &str) -> Option<Section> {
        match heading.to_ascii_lowercase().as_str() {
            "question text" => Some(Section::Text),
            "question answers" | "answers" => Some(Section::Answers),
            "feedback" => Some(Section::Feedback),
            _ => None,
        }
    }
}

struct BlockParts {
    body: String,
    answers: Vec<Answer>,
    feedback: Option<String>,
}

fn parse_block(block: &RawBlock) -> Result<Question, QuizError> {
    let has_sections = block.lines.iter().any(|l| l.section().is_some());
    let parts = if has_sections {
        parse_sectioned(block)?
    } else {
        parse_compact(block)?
    };

    let (kind, choices) = infer_kind(block, parts.answers)?;
    tracing::trace!(title = %block.title, %kind, "parsed markdown question");

    let mut question = Question::new(block.title, kind)
        .with_body(parts.body)
        .with_choices(choices);
    question.feedback = parts.feedback;
    Ok(question)
}

/// `## Question Text` / `## Question Answers` / `## Feedback` layout.
fn parse_sectioned(block: &RawBlock) -> Result<BlockParts, QuizError> {
    let mut current: Option<Section> = None;
    let mut seen: Vec<Section> = Vec::new();
    let mut text_lines: Vec<&str> = Vec::new();
    let mut answer_lines: Vec<SourceLine> = Vec::new();
    let mut feedback_lines: Vec<&str> = Vec::new();

    for line in &block.lines {
        if let Some(heading) = line.section() {
            let section = Section::from_heading(heading).ok_or_else(|| {
                block.error_at(line.number, format!("unknown section '## {heading}'"))
            })?;
            if seen.contains(&section) {
                return Err(
                    block.error_at(line.number, format!("repeated section '## {heading}'"))
                );
            }
            if section == Section::Answers && !seen.contains(&Section::Text) {
                return Err(block.error_at(line.number, "answer list before question text"));
            }
            seen.push(section);
            current = Some(section);
            continue;
        }

        match current {
            None if line.is_blank() => {}
            None => {
                return Err(block.error_at(line.number, "text outside of a '## ' section"));
            }
            Some(Section::Text) => text_lines.push(line.content()),
            Some(Section::Answers) => answer_lines.push(*line),
            Some(Section::Feedback) => feedback_lines.push(line.content()),
        }
    }

    let answers = parse_answers(block, &answer_lines)?;
    let feedback = Some(join_trimmed(&feedback_lines)).filter(|f| !f.is_empty());
    Ok(BlockParts {
        body: join_trimmed(&text_lines),
        answers,
        feedback,
    })
}

/// Heading, body lines, then the answer list, with no `## ` sections.
fn parse_compact(block: &RawBlock) -> Result<BlockParts, QuizError> {
    let first_answer = block
        .lines
        .iter()
        .position(|l| !l.fenced && ANSWER_LINE.is_match(l.text));

    let (body, answers) = match first_answer {
        Some(pos) => block.lines.split_at(pos),
        None => (block.lines.as_slice(), &[][..]),
    };

    if !answers.is_empty() && body.iter().all(SourceLine::is_blank) {
        return Err(block.error_at(answers[0].number, "answer list before question text"));
    }

    let body_lines: Vec<&str> = body.iter().map(SourceLine::content).collect();
    Ok(BlockParts {
        body: join_trimmed(&body_lines),
        answers: parse_answers(block, answers)?,
        feedback: None,
    })
}

fn parse_answers(block: &RawBlock, lines: &[SourceLine]) -> Result<Vec<Answer>, QuizError> {
    let mut answers: Vec<Answer> = Vec::new();

    for line in lines {
        if line.is_blank() {
            continue;
        }
        if let Some(caps) = ANSWER_LINE.captures(line.text) {
            answers.push(Answer {
                marker: Marker::from_char(&caps[1]),
                text: caps[2].to_string(),
                line: line.number,
            });
            continue;
        }
        if BARE_MARKER_LINE.is_match(line.text) {
            return Err(block.error_at(line.number, "answer marker without answer text"));
        }
        let continuation = CONTINUATION_LINE.captures(line.text);
        if let (Some(caps), Some(last)) = (continuation, answers.last_mut()) {
            last.text.push('\n');
            last.text.push_str(caps[1].trim_end());
            continue;
        }
        return Err(block.error_at(
            line.number,
            "expected an answer line starting with '+', '-' or '='",
        ));
    }

    Ok(answers)
}

/// Kind inference, applied in order:
///
/// 1. no answers → essay
/// 2. any `=` answer → short_answer, and every answer must use `=`
/// 3. no `+` answer → error
/// 4. exactly two answers `True`/`False` with one correct → true_false
/// 5. otherwise → multiple_choice
fn infer_kind(
    block: &RawBlock,
    answers: Vec<Answer>,
) -> Result<(QuestionKind, Vec<Choice>), QuizError> {
    if answers.is_empty() {
        return Ok((QuestionKind::Essay, Vec::new()));
    }

    if answers.iter().any(|a| a.marker == Marker::Accepted) {
        if let Some(mixed) = answers.iter().find(|a| a.marker != Marker::Accepted) {
            return Err(block.error_at(
                mixed.line,
                "short-answer '=' answers cannot be mixed with '+'/'-' answers",
            ));
        }
        let choices = answers.into_iter().map(|a| Choice::correct(a.text)).collect();
        return Ok((QuestionKind::ShortAnswer, choices));
    }

    if !answers.iter().any(|a| a.marker == Marker::Correct) {
        return Err(block.error_at(block.title_line, "no answer is marked correct with '+'"));
    }

    let choices: Vec<Choice> = answers
        .into_iter()
        .map(|a| Choice::new(a.text, a.marker == Marker::Correct))
        .collect();
    let correct = choices.iter().filter(|c| c.is_correct).count();
    let kind = if has_boolean_labels(&choices) && correct == 1 {
        QuestionKind::TrueFalse
    } else {
        QuestionKind::MultipleChoice
    };
    Ok((kind, choices))
}

/// Join lines, dropping leading and trailing blank lines but keeping inner ones verbatim.
fn join_trimmed(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
