//! Error types for the note store engine
//!
//! Every error renders the message a caller should see verbatim. Use
//! [`VaultError::kind`] to branch on the class of failure.

use notegraph_config::ConfigError;
use notegraph_parser::ParseError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    NotConfigured,
    NotFound,
    AlreadyExists,
    InvalidInput,
    PolicyViolation,
    StructuralViolation,
    Parse,
    Io,
}

/// Errors raised by the index and the operation engine
#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Note '{0}' not found")]
    NoteNotFound(String),

    #[error("Section '{section}' not found in note '{note}'")]
    SectionNotFound { note: String, section: String },

    #[error("Text '{text}' not found in note '{note}'")]
    TextNotFound { note: String, text: String },

    #[error("Pattern '{pattern}' not found in note '{note}'")]
    PatternNotFound { note: String, pattern: String },

    #[error("Note '{0}' already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    PolicyViolation(String),

    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    InvalidHeading(String),

    /// A link names an existing note but a section it does not have
    #[error("Section '{section}' not found in note '{note}'")]
    BrokenLink { note: String, section: String },

    #[error("Note '{name}' could not be parsed: {source}")]
    Unparsable {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to render note: {0}")]
    Render(#[source] ParseError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::NotConfigured,
            Self::NoteNotFound(_)
            | Self::SectionNotFound { .. }
            | Self::TextNotFound { .. }
            | Self::PatternNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::PolicyViolation(_) => ErrorKind::PolicyViolation,
            Self::InvalidName(_) | Self::InvalidHeading(_) | Self::BrokenLink { .. } => {
                ErrorKind::StructuralViolation
            }
            Self::Unparsable { .. } | Self::Render(_) => ErrorKind::Parse,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NoteNotFound(name.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ParseError> for VaultError {
    fn from(err: ParseError) -> Self {
        Self::Render(err)
    }
}

/// Result type for engine operations
pub type VaultResult<T> = Result<T, VaultError>;
