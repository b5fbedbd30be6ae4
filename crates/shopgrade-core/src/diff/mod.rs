//! Component version diff.
//!
//! Compares a shop's locked component versions against the packages that are
//! currently available and produces the list of upgrade opportunities.
//!
//! ## Entry point
//!
//! ```ignore
//! use shopgrade_core::diff::engine::compute_changes;
//!
//! let changes = compute_changes(&manifest.component_versions, &package_source)?;
//! let text = shopgrade_core::diff::human_summary::render_upgrade_summary(&shop_id, &report);
//! ```
//!
//! ## Guarantees
//!
//! - A change is emitted only when the package resolved a current version and
//!   that version differs from the locked one.
//! - A package whose manifest does not exist is skipped; a package whose
//!   manifest exists but is broken fails the whole diff.

pub mod engine;
pub mod human_summary;

pub use engine::{compute_changes, ChangelogFile, PackageSource};
pub use human_summary::render_upgrade_summary;
