//! Conversion between quiz banks in JSON, Moodle XML and Markdown
//!
//!     This crate provides a uniform interface for converting question banks between three text
//!     formats. Every codec decodes into and encodes from one canonical in-memory model, the
//!     [`QuestionSet`]; no format is privileged as a pivot.
//!
//!     This is a pure lib, that is, it powers quiz-cli but is shell agnostic: no code here
//!     touches stdout, env vars or the file system. Callers hand in text and get text back.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # QuizError and parse locations
//!     ├── model.rs                # Question, Choice, QuestionSet, CategoryPath
//!     ├── format.rs               # QuizFormat tags and the Format trait
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── convert.rs              # (from, to) dispatcher
//!     ├── naming.rs               # file stems for directory-split output
//!     ├── formats
//!     │   ├── json
//!     │   ├── markdown            # parser.rs + serializer.rs
//!     │   └── mxml                # parser.rs + serializer.rs
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── common              # fixture loading and proptest strategies
//!     ├── fixtures            # kitchensink.{json,md,xml}
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs includes them
//!     as modules.
//!
//! Formats
//!
//!     - JSON: the lossless reference format. Every model field round-trips.
//!     - XML: Moodle XML. Categories become Moodle category markers; per-answer feedback and
//!       general feedback are kept.
//!     - MD: a constrained Markdown dialect, one `# ` heading per question. Categories and
//!       per-answer feedback cannot be expressed and are dropped on export.
//!
//!     See the module docs of each codec for the exact mapping.

pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod naming;
pub mod registry;

pub use convert::{convert, Conversion, ConvertOptions, Route};
pub use error::{Location, QuizError};
pub use format::{Format, QuizFormat, SerializedQuiz};
pub use model::{CategoryPath, Choice, Question, QuestionKind, QuestionSet};
pub use naming::{sanitize_title, split_outputs, NamedBlock};
pub use registry::FormatRegistry;
