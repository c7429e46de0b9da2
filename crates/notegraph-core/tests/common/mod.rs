#![allow(dead_code)]

use notegraph_core::{Operations, Vault};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Vault in a temporary directory with an engine on top
pub struct TestVault {
    pub temp_dir: TempDir,
    pub ops: Operations,
}

impl TestVault {
    /// Create a vault holding `files` as `(name, raw content)` pairs
    pub fn with_notes(files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(format!("{name}.md")), content).unwrap();
        }
        let ops = Operations::new(Vault::open(temp_dir.path()).unwrap());
        Self { temp_dir, ops }
    }

    pub fn empty() -> Self {
        Self::with_notes(&[])
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(format!("{name}.md"))
    }

    /// Raw file content straight from disk
    pub fn raw(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }

    /// Write a file behind the engine's back
    pub fn write_external(&self, name: &str, content: &str) {
        fs::write(self.path(name), content).unwrap();
    }

    pub fn trash(&self) -> PathBuf {
        self.temp_dir.path().join(".trash")
    }
}
