//! Parser error types

use thiserror::Error;

/// Errors produced while turning raw note text into a structured note
#[derive(Debug, Error)]
pub enum ParseError {
    /// The frontmatter block is not valid YAML
    #[error("Invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The frontmatter block parsed, but is not a key/value mapping
    #[error("Frontmatter must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

impl ParseError {
    pub(crate) fn not_a_mapping(value: &serde_yaml::Value) -> Self {
        let found = match value {
            serde_yaml::Value::Null => "null",
            serde_yaml::Value::Bool(_) => "a boolean",
            serde_yaml::Value::Number(_) => "a number",
            serde_yaml::Value::String(_) => "a string",
            serde_yaml::Value::Sequence(_) => "a list",
            serde_yaml::Value::Mapping(_) => "a mapping",
            serde_yaml::Value::Tagged(_) => "a tagged value",
        };
        Self::NotAMapping { found }
    }
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
