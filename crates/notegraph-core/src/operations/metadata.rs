//! Frontmatter and tag operations

use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::note::Note;
use crate::results::{NoteMetadata, TagUpdate, WriteResult};
use notegraph_parser::frontmatter::TAGS_KEY;
use notegraph_parser::{extract_tags, headings};
use serde_yaml::{Mapping, Value};
use std::sync::Arc;
use tracing::info;

impl Operations {
    /// The parsed frontmatter of a note.
    pub fn get_frontmatter(&self, name: &str) -> VaultResult<Mapping> {
        Ok(self.vault.get(name)?.frontmatter.clone())
    }

    /// Set one frontmatter field.
    ///
    /// `value` is read as JSON when it holds a list, an object, a boolean or
    /// null; anything else is stored as a string. The `tags` field must be a
    /// list and goes through tag governance.
    pub fn set_frontmatter(&self, name: &str, key: &str, value: &str) -> VaultResult<WriteResult> {
        if key.trim().is_empty() {
            return Err(VaultError::invalid_input("Parameter 'key' must not be empty"));
        }
        let note = self.vault.get(name)?;
        let value = parse_field_value(value)?;

        let mut frontmatter = note.frontmatter.clone();
        frontmatter.insert(Value::String(key.to_string()), value);

        if key == TAGS_KEY {
            if !matches!(frontmatter.get(TAGS_KEY), Some(Value::Sequence(_))) {
                return Err(VaultError::invalid_input("Field 'tags' must be a list"));
            }
            let proposed = extract_tags(&frontmatter);
            self.govern_tags(&note, &proposed, &frontmatter)?;
        }

        let warnings = self.commit(&note.path, &frontmatter, &note.body, Vec::new())?;
        info!(note = %name, key = %key, "frontmatter updated");
        Ok(WriteResult {
            name: note.name.clone(),
            path: note.path.clone(),
            warnings,
        })
    }

    /// Add a tag already in use elsewhere in the vault.
    pub fn add_tag(&self, name: &str, tag: &str) -> VaultResult<TagUpdate> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(VaultError::invalid_input("Parameter 'tag' must not be empty"));
        }

        let note = self.vault.get(name)?;
        if note.has_tag(tag) {
            return Ok(unchanged(&note, tag));
        }

        let mut tags = note.tags.clone();
        tags.push(tag.to_string());
        let frontmatter = with_tags(&note.frontmatter, &tags);
        self.govern_tags(&note, &tags, &frontmatter)?;

        self.commit(&note.path, &frontmatter, &note.body, Vec::new())?;
        info!(note = %name, tag = %tag, "tag added");
        Ok(TagUpdate {
            name: note.name.clone(),
            tag: tag.to_string(),
            changed: true,
            tags,
        })
    }

    /// Remove a tag. Never subject to governance.
    pub fn remove_tag(&self, name: &str, tag: &str) -> VaultResult<TagUpdate> {
        let tag = tag.trim();
        let note = self.vault.get(name)?;
        if !note.has_tag(tag) {
            return Ok(unchanged(&note, tag));
        }

        let tags: Vec<String> = note.tags.iter().filter(|t| *t != tag).cloned().collect();
        let frontmatter = with_tags(&note.frontmatter, &tags);
        self.commit(&note.path, &frontmatter, &note.body, Vec::new())?;
        info!(note = %name, tag = %tag, "tag removed");
        Ok(TagUpdate {
            name: note.name.clone(),
            tag: tag.to_string(),
            changed: true,
            tags,
        })
    }

    /// Frontmatter, tags, links and headings of a note.
    pub fn note_metadata(&self, name: &str) -> VaultResult<NoteMetadata> {
        let note = self.vault.get(name)?;
        Ok(NoteMetadata {
            name: note.name.clone(),
            path: note.path.clone(),
            frontmatter: note.frontmatter.clone(),
            tags: note.tags.clone(),
            outgoing: note.outgoing_links.clone(),
            incoming: self.vault.incoming_links(name)?,
            headings: headings(&note.body),
        })
    }

    /// Vocabulary check and structural rules, both limited to the tags the
    /// note does not carry yet.
    fn govern_tags(&self, note: &Note, proposed: &[String], frontmatter: &Mapping) -> VaultResult<()> {
        let introduced: Vec<String> = proposed
            .iter()
            .filter(|tag| !note.has_tag(tag))
            .cloned()
            .collect();
        if introduced.is_empty() {
            return Ok(());
        }

        let vocabulary = self.vault.tag_vocabulary()?;
        self.tag_policy.check_vocabulary(&introduced, &vocabulary)?;
        self.tag_policy.check_rules(&introduced, &note.name, frontmatter)
    }
}

fn unchanged(note: &Arc<Note>, tag: &str) -> TagUpdate {
    TagUpdate {
        name: note.name.clone(),
        tag: tag.to_string(),
        changed: false,
        tags: note.tags.clone(),
    }
}

fn with_tags(frontmatter: &Mapping, tags: &[String]) -> Mapping {
    let mut updated = frontmatter.clone();
    let list = tags.iter().cloned().map(Value::String).collect();
    updated.insert(Value::String(TAGS_KEY.to_string()), Value::Sequence(list));
    updated
}

/// Interpret a frontmatter value given as text.
fn parse_field_value(raw: &str) -> VaultResult<Value> {
    match serde_json::from_str::<serde_json::Value>(raw.trim()) {
        Ok(json)
            if json.is_array() || json.is_object() || json.is_boolean() || json.is_null() =>
        {
            serde_yaml::to_value(json).map_err(|e| VaultError::invalid_input(format!("Invalid value: {e}")))
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}
