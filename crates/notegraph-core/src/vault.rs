//! The note index
//!
//! A [`Vault`] lazily scans its root into a [`VaultIndex`] snapshot: the
//! name-to-note map and the reverse reference graph. Snapshots are never
//! patched. Any change on disk is picked up by [`Vault::refresh`], or by the
//! single rescan a lookup miss triggers in [`Vault::get`].

use crate::error::{VaultError, VaultResult};
use crate::note::Note;
use crate::scanner::VaultScanner;
use notegraph_config::NotegraphConfig;
use notegraph_parser::parse_note;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const NOTE_EXTENSION: &str = "md";

/// A file that was left out of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostic {
    pub path: PathBuf,
    pub message: String,
}

/// One full scan of the vault
#[derive(Debug, Default)]
pub struct VaultIndex {
    notes: HashMap<String, Arc<Note>>,
    incoming: HashMap<String, Vec<String>>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl VaultIndex {
    /// Build the reverse reference graph from a set of notes.
    pub fn from_notes(notes: HashMap<String, Arc<Note>>, diagnostics: Vec<ScanDiagnostic>) -> Self {
        let mut incoming: HashMap<String, BTreeSet<String>> = HashMap::new();
        for note in notes.values() {
            for target in &note.outgoing_links {
                incoming
                    .entry(target.clone())
                    .or_default()
                    .insert(note.name.clone());
            }
        }

        Self {
            notes,
            incoming: incoming
                .into_iter()
                .map(|(target, sources)| (target, sources.into_iter().collect()))
                .collect(),
            diagnostics,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Note>> {
        self.notes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.notes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in no particular order
    pub fn notes(&self) -> impl Iterator<Item = &Arc<Note>> {
        self.notes.values()
    }

    /// Sorted names of the notes linking to `name`
    pub fn incoming(&self, name: &str) -> &[String] {
        self.incoming.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    /// Every non-empty tag in use, sorted
    pub fn tag_vocabulary(&self) -> BTreeSet<String> {
        self.notes
            .values()
            .flat_map(|note| note.tags.iter())
            .filter(|tag| !tag.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Lazily built, wholesale rebuilt index over a vault directory
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    trash_dir: String,
    scanner: VaultScanner,
    index: RwLock<Option<Arc<VaultIndex>>>,
}

impl Vault {
    /// Open a vault rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> VaultResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(notegraph_config::ConfigError::NotADirectory(root).into());
        }
        Ok(Self {
            scanner: VaultScanner::new(root.clone(), "."),
            trash_dir: ".trash".to_string(),
            root,
            index: RwLock::new(None),
        })
    }

    /// Open the vault described by a loaded configuration.
    pub fn from_config(config: &NotegraphConfig) -> VaultResult<Self> {
        let root = config.vault_root()?;
        Ok(Self::open(root)?
            .with_reserved_prefix(config.vault.reserved_prefix.clone())
            .with_trash_dir(config.vault.trash_dir.clone()))
    }

    #[must_use]
    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scanner = VaultScanner::new(self.root.clone(), prefix);
        *self.index.get_mut() = None;
        self
    }

    #[must_use]
    pub fn with_trash_dir(mut self, trash_dir: impl Into<String>) -> Self {
        self.trash_dir = trash_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving deleted notes
    pub fn trash_path(&self) -> PathBuf {
        self.root.join(&self.trash_dir)
    }

    /// Where a note with this name lives or would live
    pub fn note_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{NOTE_EXTENSION}"))
    }

    /// The current snapshot, scanning the vault if none exists yet.
    pub fn index(&self) -> VaultResult<Arc<VaultIndex>> {
        if let Some(index) = self.index.read().as_ref() {
            return Ok(Arc::clone(index));
        }
        self.rebuild()
    }

    /// Discard the snapshot and rescan the vault.
    pub fn refresh(&self) -> VaultResult<()> {
        self.rebuild().map(|_| ())
    }

    /// Every note, in no particular order
    pub fn list_notes(&self) -> VaultResult<Vec<Arc<Note>>> {
        Ok(self.index()?.notes().cloned().collect())
    }

    /// Look a note up by name, rescanning once on a miss.
    pub fn get(&self, name: &str) -> VaultResult<Arc<Note>> {
        if let Some(note) = self.index()?.get(name) {
            return Ok(Arc::clone(note));
        }

        debug!(note = %name, "index miss, rescanning vault");
        let index = self.rebuild()?;
        if let Some(note) = index.get(name) {
            return Ok(Arc::clone(note));
        }
        Err(VaultError::not_found(name))
    }

    /// Path of the file backing `name`
    pub fn resolve_path(&self, name: &str) -> VaultResult<PathBuf> {
        Ok(self.get(name)?.path.clone())
    }

    /// Names of the notes linking to `name`, sorted
    pub fn incoming_links(&self, name: &str) -> VaultResult<Vec<String>> {
        Ok(self.index()?.incoming(name).to_vec())
    }

    /// Link targets of `name` in body order
    pub fn outgoing_links(&self, name: &str) -> VaultResult<Vec<String>> {
        Ok(self.get(name)?.outgoing_links.clone())
    }

    /// All tags in use, recomputed from the current snapshot
    pub fn tag_vocabulary(&self) -> VaultResult<BTreeSet<String>> {
        Ok(self.index()?.tag_vocabulary())
    }

    /// Files skipped by the last scan
    pub fn diagnostics(&self) -> VaultResult<Vec<ScanDiagnostic>> {
        Ok(self.index()?.diagnostics().to_vec())
    }

    /// A snapshot that has seen every name in `names` if it exists on disk.
    ///
    /// Rescans at most once, and only when some name is missing.
    pub fn index_covering<'a, I>(&self, names: I) -> VaultResult<Arc<VaultIndex>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let index = self.index()?;
        let mut names = names.into_iter();
        if names.all(|name| index.contains(name)) {
            return Ok(index);
        }
        self.rebuild()
    }

    fn rebuild(&self) -> VaultResult<Arc<VaultIndex>> {
        let files = self.scanner.scan()?;
        let mut notes = HashMap::with_capacity(files.len());
        let mut diagnostics = Vec::new();

        for path in files {
            match load_note(&path) {
                Ok(note) => {
                    if let Some(previous) = notes.insert(note.name.clone(), Arc::new(note)) {
                        let message = format!("duplicate note name '{}'", previous.name);
                        warn!(path = %previous.path.display(), "{message}");
                        diagnostics.push(ScanDiagnostic {
                            path: previous.path.clone(),
                            message,
                        });
                    }
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping note that failed to load");
                    diagnostics.push(ScanDiagnostic {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }

        let index = Arc::new(VaultIndex::from_notes(notes, diagnostics));
        info!(
            notes = index.len(),
            skipped = index.diagnostics().len(),
            "vault index rebuilt"
        );
        *self.index.write() = Some(Arc::clone(&index));
        Ok(index)
    }
}

fn load_note(path: &Path) -> VaultResult<Note> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| VaultError::invalid_input(format!("Non UTF-8 file name: {}", path.display())))?
        .to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| VaultError::io(path, e))?;
    let parsed = parse_note(&raw).map_err(|source| VaultError::Unparsable {
        name: name.clone(),
        source,
    })?;
    Ok(Note::from_parsed(name, path, parsed))
}
