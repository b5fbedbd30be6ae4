//! Recursive file listing

use crate::errors::{io_error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Every file under `root`, as paths relative to `root`
///
/// Directories are descended into; everything else is a leaf. Symbolic links
/// are reported by name and never followed, so a link to a directory shows
/// up once as a leaf and its target's contents are not listed.
///
/// Paths use the platform separator and come back sorted.
///
/// # Errors
///
/// A missing `root` yields an empty list. Any other failure to read a
/// directory (permission denied, `root` is a file) is returned as `Io`: a
/// partial listing would hide drift.
pub fn list_files(root: &Path) -> Result<Vec<String>> {
    match fs::metadata(root) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error("list_files", &root.to_string_lossy(), e)),
    }

    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![PathBuf::new()];

    while let Some(rel_dir) = pending.pop() {
        let dir = root.join(&rel_dir);
        let display = dir.to_string_lossy();
        let entries = fs::read_dir(&dir).map_err(|e| io_error("list_files", &display, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_files", &display, e))?;
            // DirEntry::file_type does not traverse symlinks
            let file_type = entry
                .file_type()
                .map_err(|e| io_error("list_files", &entry.path().to_string_lossy(), e))?;
            let rel = rel_dir.join(entry.file_name());

            if file_type.is_dir() {
                pending.push(rel);
            } else {
                files.push(rel.to_string_lossy().into_owned());
            }
        }
    }

    files.sort();
    Ok(files)
}
