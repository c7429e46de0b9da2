//! Vault context attached to the first result an adapter returns
//!
//! The block lists instruction notes (tagged `claude`) with their
//! descriptions, followed by the tag vocabulary new tags must come from.

use crate::error::VaultResult;
use crate::tags::INSTRUCTIONS_TAG;
use crate::vault::Vault;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Shown for instruction notes without a `description`
pub const MISSING_DESCRIPTION: &str = "⚠️ No description. Please add a 'description' field \
     to this note's frontmatter explaining when to read it.";

const CONTEXT_OPEN: &str = "<!-- NOTEGRAPH CONTEXT (do not copy to notes):";
const CONTEXT_CLOSE: &str = "-->";

/// Instruction notes section of the context block.
pub fn instruction_notes(vault: &Vault) -> VaultResult<String> {
    let mut notes: Vec<_> = vault
        .list_notes()?
        .into_iter()
        .filter(|note| note.has_tag(INSTRUCTIONS_TAG))
        .collect();
    if notes.is_empty() {
        return Ok(format!(
            "Your personal notes:\nNo personal notes found. \
             Create notes with tag '{INSTRUCTIONS_TAG}' to use auto-context."
        ));
    }
    notes.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines = vec!["Your personal notes:".to_string()];
    for note in &notes {
        let description = note.description().unwrap_or(MISSING_DESCRIPTION);
        lines.push(format!("- \"{}\" — {description}", note.name));
    }
    lines.push(String::new());
    lines.push("Use read_note() to access full content when needed.".to_string());
    Ok(lines.join("\n"))
}

/// Allowed tag vocabulary section of the context block.
pub fn allowed_tags(vault: &Vault) -> VaultResult<String> {
    let vocabulary = vault.tag_vocabulary()?;
    if vocabulary.is_empty() {
        return Ok("Allowed tags: No tags in vault yet.".to_string());
    }
    let tags: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
    Ok(format!("Allowed tags: {}", tags.join(", ")))
}

/// Full context block.
pub fn context_block(vault: &Vault) -> VaultResult<String> {
    Ok(format!("{}\n\n{}", instruction_notes(vault)?, allowed_tags(vault)?))
}

/// Attaches the context block to exactly one result per instance.
///
/// Each adapter session owns its own injector; nothing is shared globally.
#[derive(Debug, Default)]
pub struct ContextInjector {
    injected: AtomicBool,
}

impl ContextInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the block has already been attached.
    pub fn has_injected(&self) -> bool {
        self.injected.load(Ordering::Acquire)
    }

    /// Append the context block to `result` on the first call only.
    pub fn wrap(&self, vault: &Vault, result: String) -> VaultResult<String> {
        if self.injected.swap(true, Ordering::AcqRel) {
            return Ok(result);
        }
        let block = match context_block(vault) {
            Ok(block) => block,
            Err(err) => {
                self.injected.store(false, Ordering::Release);
                return Err(err);
            }
        };
        debug!("context block attached");
        Ok(format!("{result}\n\n{CONTEXT_OPEN}\n{block}\n{CONTEXT_CLOSE}"))
    }
}
