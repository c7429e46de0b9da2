use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::note::Note;
use crate::results::WriteResult;
use crate::sections::{
    append_to_section, find_section, remove_section, replace_section, section_text, SectionBounds,
};
use crate::validation::ValidationWarning;
use notegraph_parser::{headings, Heading};
use std::sync::Arc;
use tracing::info;

impl Operations {
    /// Interior text of a section, blank edges trimmed.
    ///
    /// `section` is either the literal heading line (`## Budget`) or the bare
    /// heading text (`Budget`).
    pub fn read_section(&self, name: &str, section: &str) -> VaultResult<String> {
        let note = self.vault.get(name)?;
        let lines: Vec<&str> = note.body.split('\n').collect();
        let bounds = locate(&lines, name, section)?;
        Ok(section_text(&lines, &bounds))
    }

    /// Add text at the end of a section's content.
    pub fn append_section(&self, name: &str, section: &str, text: &str) -> VaultResult<WriteResult> {
        self.edit_section(name, section, |lines, bounds| append_to_section(lines, bounds, text))
    }

    /// Replace a section's content, keeping its heading line.
    pub fn update_section(&self, name: &str, section: &str, content: &str) -> VaultResult<WriteResult> {
        self.edit_section(name, section, |lines, bounds| replace_section(lines, bounds, content))
    }

    /// Remove a section, heading included.
    pub fn delete_section(&self, name: &str, section: &str) -> VaultResult<WriteResult> {
        let note = self.vault.get(name)?;
        let body = {
            let lines: Vec<&str> = note.body.split('\n').collect();
            let bounds = locate(&lines, name, section)?;
            remove_section(&lines, &bounds)
        };

        let warnings = self.commit(&note.path, &note.frontmatter, &body, Vec::new())?;
        info!(note = %name, section = %section, "section deleted");
        Ok(write_result(&note, warnings))
    }

    /// Headings of a note outside code fences.
    pub fn get_headings(&self, name: &str) -> VaultResult<Vec<Heading>> {
        Ok(headings(&self.vault.get(name)?.body))
    }

    fn edit_section<F>(&self, name: &str, section: &str, edit: F) -> VaultResult<WriteResult>
    where
        F: FnOnce(&[&str], &SectionBounds) -> String,
    {
        let note = self.vault.get(name)?;
        let body = {
            let lines: Vec<&str> = note.body.split('\n').collect();
            let bounds = locate(&lines, name, section)?;
            edit(&lines, &bounds)
        };

        let warnings = self.rewrite_body(&note, &body)?;
        info!(note = %name, section = %section, "section edited");
        Ok(write_result(&note, warnings))
    }
}

fn locate(lines: &[&str], name: &str, section: &str) -> VaultResult<SectionBounds> {
    find_section(lines, section).ok_or_else(|| VaultError::SectionNotFound {
        note: name.to_string(),
        section: section.to_string(),
    })
}

fn write_result(note: &Arc<Note>, warnings: Vec<ValidationWarning>) -> WriteResult {
    WriteResult {
        name: note.name.clone(),
        path: note.path.clone(),
        warnings,
    }
}
