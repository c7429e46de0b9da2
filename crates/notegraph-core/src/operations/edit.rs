use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::results::{InsertPosition, InsertResult, ReplaceResult};
use tracing::info;

impl Operations {
    /// Replace literal text in the body.
    ///
    /// Replaces the first occurrence, or all of them with `replace_all`. No
    /// occurrence at all is an error.
    pub fn replace_text(
        &self,
        name: &str,
        old_text: &str,
        new_text: &str,
        replace_all: bool,
    ) -> VaultResult<ReplaceResult> {
        if old_text.is_empty() {
            return Err(VaultError::invalid_input("Parameter 'old_text' must not be empty"));
        }

        let note = self.vault.get(name)?;
        if !note.body.contains(old_text) {
            return Err(VaultError::TextNotFound {
                note: name.to_string(),
                text: old_text.to_string(),
            });
        }

        let (body, count) = if replace_all {
            (
                note.body.replace(old_text, new_text),
                note.body.matches(old_text).count(),
            )
        } else {
            (note.body.replacen(old_text, new_text, 1), 1)
        };

        let warnings = self.rewrite_body(&note, &body)?;
        info!(note = %name, count, "text replaced");
        Ok(ReplaceResult {
            name: note.name.clone(),
            count,
            warnings,
        })
    }

    /// Insert a line before or after the first line matching an anchor.
    ///
    /// Exactly one of `before` and `after` must be given. Anchor and lines are
    /// compared after trimming surrounding whitespace.
    pub fn insert_text(
        &self,
        name: &str,
        text: &str,
        before: Option<&str>,
        after: Option<&str>,
    ) -> VaultResult<InsertResult> {
        let (anchor, position) = match (before, after) {
            (Some(anchor), None) => (anchor, InsertPosition::Before),
            (None, Some(anchor)) => (anchor, InsertPosition::After),
            _ => {
                return Err(VaultError::invalid_input(
                    "Exactly one of 'before' or 'after' must be specified",
                ))
            }
        };

        let note = self.vault.get(name)?;
        let mut lines: Vec<&str> = note.body.split('\n').collect();
        let wanted = anchor.trim();
        let found = lines
            .iter()
            .position(|line| line.trim() == wanted)
            .ok_or_else(|| VaultError::PatternNotFound {
                note: name.to_string(),
                pattern: anchor.to_string(),
            })?;

        let at = match position {
            InsertPosition::Before => found,
            InsertPosition::After => found + 1,
        };
        lines.insert(at, text);
        let body = lines.join("\n");

        let warnings = self.rewrite_body(&note, &body)?;
        info!(note = %name, %position, "text inserted");
        Ok(InsertResult {
            name: note.name.clone(),
            pattern: anchor.to_string(),
            position,
            warnings,
        })
    }
}
