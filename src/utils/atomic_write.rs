// src/utils/atomic_write.rs
//! Atomic publication of the captured payload
//!
//! The consumer on the other side may read the destination file at any
//! moment, so the content is staged in a sibling `.tmp` file, flushed to disk
//! and only then renamed over the destination.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write {}: {source}", path.display())]
    WriteTemp { path: PathBuf, source: io::Error },

    #[error("could not remove existing {}: {source}", path.display())]
    RemoveExisting { path: PathBuf, source: io::Error },

    #[error("could not move {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Staging path next to `dest`: the full file name plus `.tmp`
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the file at `dest` with `content`, encoded as UTF-8 without a BOM
///
/// Observers of `dest` see either the previous file or the complete new one.
pub fn publish(dest: &Path, content: &str) -> Result<(), PublishError> {
    if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PublishError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path_for(dest);
    if let Err(err) = write_synced(&tmp, content.as_bytes()) {
        discard(&tmp);
        return Err(PublishError::WriteTemp { path: tmp, source: err });
    }

    if let Err(source) = clear_destination(dest) {
        discard(&tmp);
        return Err(PublishError::RemoveExisting {
            path: dest.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::rename(&tmp, dest) {
        discard(&tmp);
        return Err(PublishError::Rename {
            from: tmp,
            to: dest.to_path_buf(),
            source,
        });
    }

    tracing::debug!(dest = %dest.display(), bytes = content.len(), "published");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// rename() only replaces an existing file on Unix
#[cfg(windows)]
fn clear_destination(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(not(windows))]
fn clear_destination(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn discard(tmp: &Path) {
    if let Err(err) = fs::remove_file(tmp) {
        if err.kind() != io::ErrorKind::NotFound {
            tracing::debug!(path = %tmp.display(), error = %err, "could not remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn temp_path_is_a_sibling() {
        let dest = Path::new("out").join("fixes.json");
        assert_eq!(temp_path_for(&dest), Path::new("out").join("fixes.json.tmp"));
        assert_eq!(temp_path_for(Path::new("fixes")), PathBuf::from("fixes.tmp"));
    }

    #[test]
    fn writes_exact_bytes_without_bom() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("fixes.json");
        let text = "  [{\"path\":\"ü.txt\",\"content\":\"héllo\"}]\n";

        publish(&dest, text).unwrap();

        let bytes = fs::read(&dest).unwrap();
        assert_eq!(bytes, text.as_bytes());
        assert_ne!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b").join("fixes.json");

        publish(&dest, "[]").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("fixes.json");
        fs::write(&dest, "old content that is longer than the new one").unwrap();

        publish(&dest, "[]").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]");
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn failed_rename_cleans_up_and_keeps_destination() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory can be neither removed as a file nor renamed over
        let dest = dir.path().join("fixes.json");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "keep").unwrap();

        let err = publish(&dest, "[]").unwrap_err();

        assert!(
            matches!(err, PublishError::Rename { .. } | PublishError::RemoveExisting { .. }),
            "{err}"
        );
        assert!(dest.join("keep.txt").exists());
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn parent_that_is_a_file_fails_to_create_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = publish(&blocker.join("fixes.json"), "[]").unwrap_err();

        assert!(matches!(err, PublishError::CreateDir { .. }), "{err}");
        assert!(err.to_string().starts_with("could not create directory"));
    }
}
