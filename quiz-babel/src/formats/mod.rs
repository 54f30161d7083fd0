//! Format implementations
//!
//! This module contains the three codecs that convert between the canonical
//! [`QuestionSet`](crate::model::QuestionSet) and their text representations.

pub mod json;
pub mod markdown;
pub mod mxml;

pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
pub use mxml::{MxmlFormat, MxmlOptions};
