//! shopgrade store - filesystem layer of the upgrade flow
//!
//! Provides:
//! - Repository layout (where shop, app and package files live)
//! - Directory walking and two-tree content diffing
//! - Atomic writes
//! - Shop, app and package manifest I/O, including the filesystem
//!   [`PackageSource`](shopgrade_core::diff::PackageSource)

pub mod errors;
pub mod fs;
pub mod layout;
pub mod manifests;

pub use errors::Result;
pub use layout::{ConfigArea, RepoLayout};
pub use manifests::FsPackageSource;
