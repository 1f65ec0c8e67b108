//! Target reads and atomic writes

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Snapshot of a target file taken at apply time.
///
/// Never cached: every chunk reads a fresh state so later chunks see
/// earlier writes to the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetState {
    /// Whether the file exists on disk
    pub exists: bool,
    /// File content, empty when the file is absent
    pub content: String,
}

impl TargetState {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn present(content: impl Into<String>) -> Self {
        Self {
            exists: true,
            content: content.into(),
        }
    }
}

/// Read the current state of a target file.
///
/// A missing file is not an error; it yields [`TargetState::absent`].
pub fn read_target(path: &NormalizedPath) -> Result<TargetState> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(TargetState::present(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(TargetState::absent()),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write content atomically to a file with locking.
///
/// Missing parent directories are created. Content goes to a temp file in
/// the same directory, is flushed under an exclusive advisory lock, then
/// renamed over the destination.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name().unwrap_or("target"),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    tracing::trace!(path = %path, bytes = content.len(), "wrote target atomically");
    Ok(())
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
