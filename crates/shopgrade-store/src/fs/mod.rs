//! Filesystem primitives
//!
//! - [`walker::list_files`]: recursive listing that never follows symlinks
//! - [`tree_diff::diff_directories`]: paths that differ between two trees
//! - [`atomic::atomic_write`]: temp file then rename

pub mod atomic;
pub mod tree_diff;
pub mod walker;

pub use atomic::atomic_write;
pub use tree_diff::diff_directories;
pub use walker::list_files;
