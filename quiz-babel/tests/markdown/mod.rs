//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ QuestionSet conversion.

mod export;
mod import;
