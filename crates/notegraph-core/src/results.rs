//! Values returned by engine operations
//!
//! These are plain serializable records. Nothing here is persisted.

use crate::validation::ValidationWarning;
use notegraph_parser::Heading;
use serde::Serialize;
use serde_yaml::Mapping;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::VaultError;

/// Outcome of a content write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteResult {
    pub name: String,
    pub path: PathBuf,
    pub warnings: Vec<ValidationWarning>,
}

/// Outcome of a rename, real or dry-run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameResult {
    pub old_name: String,
    pub new_name: String,
    /// Notes whose links were (or would be) rewritten
    pub files_updated: Vec<String>,
    pub dry_run: bool,
}

/// Outcome of a delete, real or dry-run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub name: String,
    pub trash_path: PathBuf,
    /// Notes whose links were (or would be) marked as deleted
    pub files_updated: Vec<String>,
    pub dry_run: bool,
}

/// The item a batch stopped at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub item: String,
    pub error: String,
}

/// Results of a sequential batch, up to the first failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult<T> {
    pub completed: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<BatchFailure>,
}

impl<T> BatchResult<T> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub path: PathBuf,
}

/// Link neighbourhood of a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinksResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming: Option<Vec<String>>,
}

/// A link whose target note does not exist
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct BrokenLink {
    pub source: String,
    pub target: String,
}

/// Outcome of a text replacement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaceResult {
    pub name: String,
    pub count: usize,
    pub warnings: Vec<ValidationWarning>,
}

/// Which side of the anchor line text went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::After => "after",
        })
    }
}

/// Outcome of an anchored insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertResult {
    pub name: String,
    pub pattern: String,
    pub position: InsertPosition,
    pub warnings: Vec<ValidationWarning>,
}

/// A page of note names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteList {
    pub notes: Vec<String>,
    pub total: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Everything the index knows about one note, minus its body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteMetadata {
    pub name: String,
    pub path: PathBuf,
    pub frontmatter: Mapping,
    pub tags: Vec<String>,
    pub outgoing: Vec<String>,
    pub incoming: Vec<String>,
    pub headings: Vec<Heading>,
}

/// Outcome of adding or removing a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUpdate {
    pub name: String,
    pub tag: String,
    /// False when the note already had (or lacked) the tag
    pub changed: bool,
    pub tags: Vec<String>,
}

/// Link direction selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkDirection {
    Out,
    In,
    #[default]
    Both,
}

impl FromStr for LinkDirection {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out" => Ok(Self::Out),
            "in" => Ok(Self::In),
            "both" => Ok(Self::Both),
            other => Err(VaultError::invalid_input(format!(
                "Invalid direction: {other}. Valid: in, out, both"
            ))),
        }
    }
}
