use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::results::WriteResult;
use crate::storage::read_text;
use notegraph_parser::extract_tags;
use serde_yaml::Mapping;
use tracing::info;

impl Operations {
    /// Create a note from a body and optional frontmatter.
    ///
    /// Fails if the name is invalid or taken, if the frontmatter introduces
    /// tags outside the vocabulary or breaks a tag rule, or if the body fails
    /// a blocking structural check.
    pub fn create_note(
        &self,
        name: &str,
        content: &str,
        frontmatter: Option<Mapping>,
    ) -> VaultResult<WriteResult> {
        self.validator.validate_name(name)?;

        let path = self.vault.note_path(name);
        if path.exists() || self.vault.index()?.contains(name) {
            return Err(VaultError::AlreadyExists(name.to_string()));
        }

        let frontmatter = frontmatter.unwrap_or_default();
        let tags = extract_tags(&frontmatter);
        if !tags.is_empty() {
            let vocabulary = self.vault.tag_vocabulary()?;
            self.tag_policy.check(&tags, &vocabulary, name, &frontmatter)?;
        }

        let link_warnings = self.check_content(content)?;
        let warnings = self.commit(&path, &frontmatter, content, link_warnings)?;
        info!(note = %name, warnings = warnings.len(), "note created");

        Ok(WriteResult {
            name: name.to_string(),
            path,
            warnings,
        })
    }

    /// Raw file content, frontmatter included.
    pub fn read_note(&self, name: &str) -> VaultResult<String> {
        let path = self.vault.resolve_path(name)?;
        read_text(&path)
    }

    /// Append text to the end of the body, separated by a blank line.
    pub fn append_note(&self, name: &str, text: &str) -> VaultResult<WriteResult> {
        let note = self.vault.get(name)?;
        let body = if note.body.trim().is_empty() {
            text.to_string()
        } else {
            format!("{}\n\n{}", note.body.trim_end_matches('\n'), text)
        };

        let warnings = self.rewrite_body(&note, &body)?;
        info!(note = %name, "note appended");
        Ok(WriteResult {
            name: note.name.clone(),
            path: note.path.clone(),
            warnings,
        })
    }

    /// Replace the whole body, keeping frontmatter.
    pub fn update_note(&self, name: &str, content: &str) -> VaultResult<WriteResult> {
        let note = self.vault.get(name)?;
        let warnings = self.rewrite_body(&note, content)?;
        info!(note = %name, "note updated");
        Ok(WriteResult {
            name: note.name.clone(),
            path: note.path.clone(),
            warnings,
        })
    }
}
