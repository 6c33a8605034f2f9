//! Error types for gapfill-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for question conversion and export
#[derive(Debug, Error)]
pub enum FormatError {
    /// No built-in writer and no plugin for the question type
    #[error("Unsupported question type: {0}")]
    UnsupportedType(String),

    /// Options payload does not belong to the question type
    #[error("Options do not match question type '{qtype}'")]
    OptionsMismatch { qtype: String },

    /// An answer referenced by id is missing
    #[error("Answer {answer_id} not found in question {question_id}")]
    MissingAnswer { question_id: u64, answer_id: u64 },

    /// Unknown export format name
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FormatError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error means the question should be left out of an export
    /// rather than aborting it
    pub fn is_per_question(&self) -> bool {
        match self {
            FormatError::UnsupportedType(_)
            | FormatError::OptionsMismatch { .. }
            | FormatError::MissingAnswer { .. } => true,
            FormatError::WithContext { source, .. } => source.is_per_question(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for FormatError {
    fn from(err: toml::de::Error) -> Self {
        FormatError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for FormatError {
    fn from(err: toml::ser::Error) -> Self {
        FormatError::Toml(err.to_string())
    }
}

/// Result type alias for gapfill-core
pub type Result<T> = std::result::Result<T, FormatError>;
