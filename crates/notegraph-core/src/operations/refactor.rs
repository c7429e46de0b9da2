//! Rename and delete with link rewriting
//!
//! Both run in the same order: compute the rewrite for every other note,
//! stop there on a dry run, otherwise write the referencing notes, then move
//! the source file, then refresh the index.

use super::Operations;
use crate::error::{VaultError, VaultResult};
use crate::results::{BatchFailure, BatchResult, DeleteResult, RenameResult};
use crate::storage::{move_file, move_to_trash, read_text, trash_destination, write_atomic};
use notegraph_parser::rewrite_links;
use std::path::PathBuf;
use tracing::{info, warn};

/// Suffix appended to link targets of deleted notes
pub const DELETED_SUFFIX: &str = " (deleted)";

/// A pending rewrite of one note's file
struct LinkRewrite {
    name: String,
    path: PathBuf,
    content: String,
}

impl Operations {
    /// Rename a note and retarget every link to it.
    pub fn rename_note(&self, old_name: &str, new_name: &str, dry_run: bool) -> VaultResult<RenameResult> {
        self.validator.validate_name(new_name)?;
        let source = self.vault.get(old_name)?;

        let new_path = self.vault.note_path(new_name);
        if new_path.exists() || self.vault.index()?.contains(new_name) {
            return Err(VaultError::AlreadyExists(new_name.to_string()));
        }

        let rewrites = self.plan_link_rewrites(old_name, new_name, None)?;
        let files_updated = rewrites.iter().map(|r| r.name.clone()).collect();

        if !dry_run {
            self.apply_rewrites(&rewrites)?;
            move_file(&source.path, &new_path)?;
            self.vault.refresh()?;
            info!(from = %old_name, to = %new_name, updated = rewrites.len(), "note renamed");
        }

        Ok(RenameResult {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            files_updated,
            dry_run,
        })
    }

    /// Move a note to the trash and mark every link to it as deleted.
    pub fn delete_note(&self, name: &str, dry_run: bool) -> VaultResult<DeleteResult> {
        let source = self.vault.get(name)?;
        let marker = format!("{name}{DELETED_SUFFIX}");
        let rewrites = self.plan_link_rewrites(name, &marker, Some(name))?;
        let files_updated = rewrites.iter().map(|r| r.name.clone()).collect();

        let trash_dir = self.vault.trash_path();
        let trash_path = if dry_run {
            trash_destination(&trash_dir, name)
        } else {
            self.apply_rewrites(&rewrites)?;
            let destination = move_to_trash(&source.path, &trash_dir, name)?;
            self.vault.refresh()?;
            info!(note = %name, updated = rewrites.len(), trash = %destination.display(), "note deleted");
            destination
        };

        Ok(DeleteResult {
            name: name.to_string(),
            trash_path,
            files_updated,
            dry_run,
        })
    }

    /// Rename several notes in order, stopping at the first failure.
    pub fn batch_rename(&self, pairs: &[(String, String)], dry_run: bool) -> BatchResult<RenameResult> {
        run_batch(pairs, |(old, new)| format!("{old} -> {new}"), |(old, new)| {
            self.rename_note(old, new, dry_run)
        })
    }

    /// Delete several notes in order, stopping at the first failure.
    pub fn batch_delete(&self, names: &[String], dry_run: bool) -> BatchResult<DeleteResult> {
        run_batch(names, String::clone, |name| self.delete_note(name, dry_run))
    }

    /// Rewrites needed across the vault to retarget links from `from` to `to`.
    ///
    /// Every indexed note is read fresh from disk, so links in frontmatter are
    /// covered as well as links in the body. `skip` leaves one note out.
    fn plan_link_rewrites(&self, from: &str, to: &str, skip: Option<&str>) -> VaultResult<Vec<LinkRewrite>> {
        let index = self.vault.index()?;
        let mut candidates: Vec<(String, PathBuf)> = index
            .notes()
            .filter(|note| skip != Some(note.name.as_str()))
            .map(|note| (note.name.clone(), note.path.clone()))
            .collect();
        candidates.sort();

        let mut rewrites = Vec::new();
        for (name, path) in candidates {
            let current = read_text(&path)?;
            if let Some((content, _)) = rewrite_links(&current, from, to) {
                rewrites.push(LinkRewrite { name, path, content });
            }
        }
        Ok(rewrites)
    }

    fn apply_rewrites(&self, rewrites: &[LinkRewrite]) -> VaultResult<()> {
        for rewrite in rewrites {
            write_atomic(&rewrite.path, &rewrite.content)?;
        }
        Ok(())
    }
}

fn run_batch<I, T>(
    items: &[I],
    describe: impl Fn(&I) -> String,
    mut run: impl FnMut(&I) -> VaultResult<T>,
) -> BatchResult<T> {
    let mut completed = Vec::with_capacity(items.len());
    for item in items {
        match run(item) {
            Ok(result) => completed.push(result),
            Err(err) => {
                let item = describe(item);
                warn!(item = %item, error = %err, "batch stopped");
                return BatchResult {
                    completed,
                    failed: Some(BatchFailure {
                        item,
                        error: err.to_string(),
                    }),
                };
            }
        }
    }
    BatchResult {
        completed,
        failed: None,
    }
}
