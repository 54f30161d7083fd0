//! Shared configuration loader for the quiz converter.
//!
//! `defaults/quiz.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuizConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quiz_babel::formats::mxml::{parse_numbering, MxmlOptions};
use quiz_babel::{QuizError, QuizFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quiz.default.toml");

/// File name looked up in the working directory, when present.
pub const LOCAL_CONFIG_FILE: &str = "quiz.toml";

/// Top-level configuration consumed by quiz applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizConfig {
    pub convert: ConvertConfig,
    pub mxml: MxmlConfig,
}

/// Inputs, outputs and formats for a conversion run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub input_files: Vec<String>,
    #[serde(default)]
    pub input_dirs: Vec<String>,
    pub output_file: Option<String>,
    pub output_dir: Option<String>,
    pub input_format: Option<QuizFormat>,
    pub output_format: Option<QuizFormat>,
    pub category: Option<String>,
}

/// Moodle XML presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MxmlConfig {
    pub shuffle_answers: bool,
    pub answer_numbering: String,
}

impl TryFrom<&MxmlConfig> for MxmlOptions {
    type Error = QuizError;

    fn try_from(config: &MxmlConfig) -> Result<Self, Self::Error> {
        Ok(MxmlOptions {
            category: None,
            shuffle_answers: config.shuffle_answers,
            answer_numbering: parse_numbering(&config.answer_numbering)?,
        })
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuizConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuizConfig, ConfigError> {
    Loader::new().build()
}
