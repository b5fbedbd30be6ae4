//! Two-tree content diff

use crate::errors::{io_error, Result};
use crate::fs::walker::list_files;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Relative paths that differ between `dir_a` and `dir_b`
///
/// A path differs when it exists on one side only, or on both sides with
/// different bytes. The walk never descends into a symlink, but a listed
/// link is compared by the content it points at. The result is sorted and
/// symmetric in its arguments; a missing directory behaves like an empty one.
///
/// # Errors
///
/// `Io` when either tree cannot be listed or a file present on both sides
/// cannot be read (including a dangling link or a link to a directory).
pub fn diff_directories(dir_a: &Path, dir_b: &Path) -> Result<Vec<String>> {
    let files_a: BTreeSet<String> = list_files(dir_a)?.into_iter().collect();
    let files_b: BTreeSet<String> = list_files(dir_b)?.into_iter().collect();

    let mut changed = Vec::new();
    for rel in files_a.union(&files_b) {
        if !files_a.contains(rel) || !files_b.contains(rel) {
            changed.push(rel.clone());
            continue;
        }
        if read_bytes(&dir_a.join(rel))? != read_bytes(&dir_b.join(rel))? {
            changed.push(rel.clone());
        }
    }

    Ok(changed)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| io_error("diff_directories", &path.to_string_lossy(), e))
}
