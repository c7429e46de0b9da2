//! The operation engine
//!
//! [`Operations`] owns a [`Vault`] and routes every mutation through the same
//! sequence: blocking validation, atomic write, index refresh, then post-write
//! warnings. Operations are grouped by concern in the submodules.

mod crud;
mod edit;
mod metadata;
mod refactor;
mod search;
mod sections;

pub use search::SearchMode;

use crate::error::VaultResult;
use crate::note::Note;
use crate::storage::write_atomic;
use crate::tags::TagPolicy;
use crate::validation::{ValidationWarning, Validator};
use crate::vault::Vault;
use notegraph_parser::{extract_wikilinks, serialize_note};
use serde_yaml::Mapping;
use std::path::Path;

/// Mutation and query operations over a vault
#[derive(Debug)]
pub struct Operations {
    vault: Vault,
    validator: Validator,
    tag_policy: TagPolicy,
}

impl Operations {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            validator: Validator::new(),
            tag_policy: TagPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_tag_policy(mut self, tag_policy: TagPolicy) -> Self {
        self.tag_policy = tag_policy;
        self
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Blocking pre-write checks on new body text. Returns link warnings.
    fn check_content(&self, body: &str) -> VaultResult<Vec<ValidationWarning>> {
        self.validator.validate_headings(body)?;
        let links = extract_wikilinks(body);
        let index = self
            .vault
            .index_covering(links.iter().map(|link| link.target.trim()))?;
        self.validator.validate_links(body, &index)
    }

    /// Write a note file, refresh the index and collect post-write warnings.
    fn commit(
        &self,
        path: &Path,
        frontmatter: &Mapping,
        body: &str,
        mut warnings: Vec<ValidationWarning>,
    ) -> VaultResult<Vec<ValidationWarning>> {
        let content = serialize_note(frontmatter, body)?;
        write_atomic(path, &content)?;
        self.vault.refresh()?;

        let mut all = self.validator.validate(&content);
        all.append(&mut warnings);
        Ok(all)
    }

    /// Validate and write a new body for an existing note, keeping its
    /// frontmatter.
    fn rewrite_body(&self, note: &Note, body: &str) -> VaultResult<Vec<ValidationWarning>> {
        let link_warnings = self.check_content(body)?;
        self.commit(&note.path, &note.frontmatter, body, link_warnings)
    }
}
