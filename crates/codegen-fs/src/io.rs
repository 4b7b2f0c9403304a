//! Atomic I/O operations for generated files

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Outcome of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content and was replaced.
    Updated,
    /// The file already held exactly this content; nothing was written.
    Unchanged,
}

impl WriteOutcome {
    /// What writing `content` over `previous` would do.
    pub fn between(previous: Option<&str>, content: &str) -> Self {
        match previous {
            None => Self::Created,
            Some(previous) if previous == content => Self::Unchanged,
            Some(_) => Self::Updated,
        }
    }
}

/// Read a text file, treating a missing file as `None`.
///
/// Any other I/O failure (permissions, invalid UTF-8, a directory in the
/// way) is an error.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers observe either the old file or
/// the complete new one. The temp file lives next to the target to stay on
/// the same filesystem, and is removed if any step before the rename fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidTarget {
            path: path.to_path_buf(),
        })?
        .to_string_lossy()
        .into_owned();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = write_temp(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: target.to_path_buf(),
    })?;

    Ok(())
}

/// Atomically write `content` unless the file already holds exactly it.
///
/// Skipping byte-identical writes keeps modification times stable so that
/// build tools watching the generated tree are not retriggered.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome> {
    let previous = read_text_if_exists(path)?;
    write_if_changed_from(path, previous.as_deref(), content)
}

/// Like [`write_if_changed`], but compares against `previous`, the content
/// the caller already read from `path`, instead of reading it again.
pub fn write_if_changed_from(
    path: &Path,
    previous: Option<&str>,
    content: &str,
) -> Result<WriteOutcome> {
    let outcome = WriteOutcome::between(previous, content);
    if outcome == WriteOutcome::Unchanged {
        tracing::debug!(path = %path.display(), "Content unchanged, skipping write");
        return Ok(outcome);
    }

    write_atomic(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), ?outcome, "Wrote file");
    Ok(outcome)
}
