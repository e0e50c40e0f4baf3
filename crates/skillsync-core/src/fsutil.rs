//! Atomic file replacement for the config and metadata files.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, SyncError};

/// Write `bytes` to `path` through a temp file in the same directory, so the
/// old content stays intact if the write is interrupted.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| SyncError::storage("resolve parent of", path, "no parent directory"))?;
    fs::create_dir_all(parent).map_err(|e| SyncError::storage("create directory", parent, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| SyncError::storage("create temp file in", parent, e))?;
    tmp.write_all(bytes)
        .map_err(|e| SyncError::storage("write", path, e))?;
    tmp.persist(path)
        .map_err(|e| SyncError::storage("replace", path, e.error))?;
    Ok(())
}
