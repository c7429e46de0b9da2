//! File writes and moves for note storage
//!
//! Whole-note writes go to a temporary file in the destination directory and
//! are then renamed over the target, so a crash leaves either the old or the
//! new content on disk.

use crate::error::{VaultError, VaultResult};
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use tempfile::Builder;
use tempfile::NamedTempFile;
use tracing::debug;

/// Atomically replace `path` with `content`.
pub fn write_atomic(path: &Path, content: &str) -> VaultResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = temp_file_in(dir).map_err(|e| VaultError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| VaultError::io(tmp.path(), e))?;

    // A replaced note keeps its mode
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| VaultError::io(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| VaultError::io(path, e.error))?;
    debug!(path = %path.display(), bytes = content.len(), "note written");
    Ok(())
}

/// Temporary file whose mode follows the umask, like a plain `fs::write`.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Read a note file as text.
pub fn read_text(path: &Path) -> VaultResult<String> {
    fs::read_to_string(path).map_err(|e| VaultError::io(path, e))
}

/// Rename a note file.
pub fn move_file(from: &Path, to: &Path) -> VaultResult<()> {
    fs::rename(from, to).map_err(|e| VaultError::io(from, e))
}

/// Where `name` would land in `trash_dir`.
///
/// An occupied slot gets a timestamp suffix, then a counter.
pub fn trash_destination(trash_dir: &Path, name: &str) -> PathBuf {
    let plain = trash_dir.join(format!("{name}.md"));
    if !plain.exists() {
        return plain;
    }

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let stamped = trash_dir.join(format!("{name} {stamp}.md"));
    if !stamped.exists() {
        return stamped;
    }

    (1..)
        .map(|n| trash_dir.join(format!("{name} {stamp}-{n}.md")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(stamped)
}

/// Move a note file into `trash_dir`, creating it if needed.
pub fn move_to_trash(path: &Path, trash_dir: &Path, name: &str) -> VaultResult<PathBuf> {
    fs::create_dir_all(trash_dir).map_err(|e| VaultError::io(trash_dir, e))?;
    let destination = trash_destination(trash_dir, name);
    move_file(path, &destination)?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Note.md");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        for mode in [0o644, 0o640, 0o664] {
            let path = temp.path().join("Note.md");
            fs::write(&path, "old").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();

            write_atomic(&path, "new").unwrap();
            let written = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(written, mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_matches_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("Plain.md");
        let atomic = temp.path().join("Atomic.md");
        fs::write(&plain, "x").unwrap();
        write_atomic(&atomic, "x").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&atomic), mode(&plain));
    }

    #[test]
    fn test_move_to_trash_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let trash = temp.path().join(".trash");

        for content in ["first", "second", "third"] {
            let path = temp.path().join("Gone.md");
            fs::write(&path, content).unwrap();
            move_to_trash(&path, &trash, "Gone").unwrap();
            assert!(!path.exists());
        }

        assert_eq!(fs::read_to_string(trash.join("Gone.md")).unwrap(), "first");
        assert_eq!(fs::read_dir(&trash).unwrap().count(), 3);
    }
}
