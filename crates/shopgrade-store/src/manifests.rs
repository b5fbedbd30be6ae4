//! Shop, app and package manifest I/O

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use shopgrade_core::diff::{ChangelogFile, PackageSource};
use serde_json::Value;
use shopgrade_core::model::{AppManifest, PackageManifest, ShopId, ShopManifest};

use crate::errors::{io_error, malformed_manifest, not_found, serialization_error, Result};
use crate::fs::atomic_write;
use crate::layout::RepoLayout;

/// Read a file's bytes, `Ok(None)` when it does not exist
fn read_optional(op: &str, layout: &RepoLayout, path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(op, &layout.relative(path), e)),
    }
}

fn parse_json<T: DeserializeOwned>(op: &str, layout: &RepoLayout, path: &Path, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| malformed_manifest(op, &layout.relative(path), &e))
}

/// Shop manifest for the diff path
///
/// A missing or unparsable `shop.json` (including bytes that are not UTF-8)
/// reads as an empty manifest: a corrupt record must not block every future
/// preview.
///
/// # Errors
///
/// `Io` when the file exists but cannot be read.
pub fn load_shop_manifest(layout: &RepoLayout, shop: &ShopId) -> Result<ShopManifest> {
    let path = layout.shop_manifest(shop);
    let Some(bytes) = read_optional("load_shop_manifest", layout, &path)? else {
        return Ok(ShopManifest::default());
    };
    match serde_json::from_slice(&bytes) {
        Ok(manifest) => Ok(manifest),
        Err(e) => {
            tracing::warn!(
                shop_id = shop.as_str(),
                error = %e,
                "malformed shop manifest, treating as empty"
            );
            Ok(ShopManifest::default())
        }
    }
}

/// Shop manifest for the publish path
///
/// Missing reads as empty; malformed is an error, since rewriting it would
/// discard whatever the file held.
///
/// # Errors
///
/// `InvalidManifest` when the file does not parse, `Io` when it cannot be read.
pub fn load_shop_manifest_strict(layout: &RepoLayout, shop: &ShopId) -> Result<ShopManifest> {
    let path = layout.shop_manifest(shop);
    match read_optional("load_shop_manifest", layout, &path)? {
        Some(bytes) => parse_json("load_shop_manifest", layout, &path, &bytes)
            .map_err(|e| e.with_shop_id(shop.as_str())),
        None => Ok(ShopManifest::default()),
    }
}

/// Overwrite `shop.json` atomically, pretty-printed with a trailing newline
///
/// # Errors
///
/// `Serialization` or `Io`.
pub fn save_shop_manifest(layout: &RepoLayout, shop: &ShopId, manifest: &ShopManifest) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(manifest)
        .map_err(|e| serialization_error("save_shop_manifest", &e))?;
    bytes.push(b'\n');
    atomic_write(&layout.shop_manifest(shop), &bytes).map_err(|e| e.with_shop_id(shop.as_str()))
}

/// The shop app's `package.json`
///
/// # Errors
///
/// `NotFound` when the app has no manifest, `InvalidManifest` when it does
/// not parse, `Io` when it cannot be read.
pub fn read_app_manifest(layout: &RepoLayout, shop: &ShopId) -> Result<AppManifest> {
    let path = layout.app_manifest(shop);
    let bytes = read_optional("read_app_manifest", layout, &path)?
        .ok_or_else(|| not_found("read_app_manifest", &layout.relative(&path)))?;
    parse_json("read_app_manifest", layout, &path, &bytes).map_err(|e| e.with_shop_id(shop.as_str()))
}

/// [`PackageSource`] over `packages/` on disk
#[derive(Debug, Clone)]
pub struct FsPackageSource {
    layout: RepoLayout,
}

impl FsPackageSource {
    pub fn new(layout: RepoLayout) -> Self {
        Self { layout }
    }
}

impl PackageSource for FsPackageSource {
    fn manifest(&self, name: &str) -> Result<Option<PackageManifest>> {
        let Some(path) = self.layout.package_manifest(name) else {
            tracing::debug!(package = name, "package name is not a plain directory, skipping");
            return Ok(None);
        };
        read_optional("read_package_manifest", &self.layout, &path)?
            .map(|bytes| {
                parse_json::<Value>("read_package_manifest", &self.layout, &path, &bytes)
                    .map(|value| PackageManifest::from_value(&value))
            })
            .transpose()
    }

    fn changelog(&self, name: &str) -> Result<Option<ChangelogFile>> {
        let Some(path) = self.layout.package_changelog(name) else {
            return Ok(None);
        };
        Ok(read_optional("read_changelog", &self.layout, &path)?.map(|bytes| ChangelogFile {
            path: self.layout.relative(&path),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }))
    }
}
