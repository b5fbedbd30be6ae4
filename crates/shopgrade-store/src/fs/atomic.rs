//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partially written file

use crate::errors::{io_error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `target_path` with `content`
///
/// The temp file lives in the target's directory so the rename never crosses
/// filesystems. Parent directories are created as needed.
///
/// # Errors
///
/// `Io` if the directory, temp file or rename fails. The temp file is
/// removed on failure.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let display = target_path.to_string_lossy();

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_parent_dir", &display, e))?;
    }

    let temp_path = temp_path_for(target_path);
    let written = write_synced(&temp_path, content)
        .map_err(|e| io_error("write_temp", &display, e))
        .and_then(|()| {
            fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", &display, e))
        });

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

// Unique per call so concurrent writers never share a temp file
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}
