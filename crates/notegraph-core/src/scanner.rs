//! Vault directory scanning
//!
//! Only regular markdown files directly inside the root are eligible.
//! Entries whose name starts with the reserved prefix are skipped, which keeps
//! tooling and trash directories out of the index.

use crate::error::{VaultError, VaultResult};
use std::path::PathBuf;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Scanner for discovering note files in a vault root
#[derive(Debug, Clone)]
pub struct VaultScanner {
    root: PathBuf,
    reserved_prefix: String,
}

impl VaultScanner {
    pub fn new(root: impl Into<PathBuf>, reserved_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            reserved_prefix: reserved_prefix.into(),
        }
    }

    /// Markdown files in the root, sorted by path
    pub fn scan(&self) -> VaultResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(VaultError::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "vault root is not a directory"),
            ));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.is_reserved(entry));

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if Self::is_markdown_file(&entry) => files.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "skipping unreadable vault entry"),
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_reserved(&self, entry: &DirEntry) -> bool {
        // depth 0 is the root itself, whose name may legitimately start with "."
        entry.depth() > 0
            && !self.reserved_prefix.is_empty()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&self.reserved_prefix))
    }

    /// Check if a directory entry is a markdown file
    fn is_markdown_file(entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }

        entry
            .path()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("md"))
    }
}
