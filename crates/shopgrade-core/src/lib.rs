//! shopgrade core - domain kernel for component upgrades
//!
//! This crate provides the pure parts of the upgrade flow:
//! - Shop and package manifest models plus the `ComponentChange` record
//! - Changelog summary extraction
//! - The version diff engine, written against a `PackageSource` trait
//! - Preview-token authorization (HS256, shop-scoped claims)
//! - Shop id validation
//! - Error and logging facilities shared by every other crate
//!
//! Filesystem access lives in `shopgrade-store`; request orchestration and
//! the publish pipeline live in `shopgrade-engine`.

pub mod auth;
pub mod changelog;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

/// Re-exported so the logging macros resolve schema constants through `$crate`
pub use shopgrade_core_types as core_types;

// Re-export commonly used types
pub use auth::{AuthRejection, AuthorizationGuard};
pub use errors::{ExError, ExErrorKind, Result, UpgradeError};
pub use model::{ComponentChange, ConfigDiff, PreviewReport, ShopId, ShopManifest};
