//! Monorepo layout consumed by the upgrade flow
//!
//! ```text
//! data/shops/{id}/shop.json
//! apps/shop-{id}/package.json
//! apps/shop-{id}/src/{templates,translations}/**
//! packages/{unscoped}/package.json
//! packages/{unscoped}/CHANGELOG.md
//! packages/template-app/src/{templates,translations}/**
//! ```

use std::path::{Component, Path, PathBuf};

use shopgrade_core::model::package::unscoped_name;
use shopgrade_core::ShopId;

const CANONICAL_TEMPLATE_PACKAGE: &str = "template-app";

/// Shop configuration directories compared against the canonical template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigArea {
    Templates,
    Translations,
}

impl ConfigArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigArea::Templates => "templates",
            ConfigArea::Translations => "translations",
        }
    }
}

/// Paths of one repository checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn shop_manifest(&self, shop: &ShopId) -> PathBuf {
        self.root
            .join("data")
            .join("shops")
            .join(shop.as_str())
            .join("shop.json")
    }

    pub fn app_dir(&self, shop: &ShopId) -> PathBuf {
        self.root.join("apps").join(shop.app_name())
    }

    pub fn app_manifest(&self, shop: &ShopId) -> PathBuf {
        self.app_dir(shop).join("package.json")
    }

    /// Shop-specific overrides for `area`
    pub fn app_config_dir(&self, shop: &ShopId, area: ConfigArea) -> PathBuf {
        self.app_dir(shop).join("src").join(area.as_str())
    }

    /// Canonical files for `area` every shop app starts from
    pub fn template_config_dir(&self, area: ConfigArea) -> PathBuf {
        self.root
            .join("packages")
            .join(CANONICAL_TEMPLATE_PACKAGE)
            .join("src")
            .join(area.as_str())
    }

    /// Directory of a package under `packages/`
    ///
    /// `None` when the unscoped name is not a single plain path segment
    /// (`..`, `a/b`, empty), so a manifest entry cannot point outside
    /// `packages/`.
    pub fn package_dir(&self, name: &str) -> Option<PathBuf> {
        let dir = unscoped_name(name);
        let mut components = Path::new(dir).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(segment)), None) if !dir.contains('\\') => {
                Some(self.root.join("packages").join(segment))
            }
            _ => None,
        }
    }

    pub fn package_manifest(&self, name: &str) -> Option<PathBuf> {
        self.package_dir(name).map(|dir| dir.join("package.json"))
    }

    pub fn package_changelog(&self, name: &str) -> Option<PathBuf> {
        self.package_dir(name).map(|dir| dir.join("CHANGELOG.md"))
    }

    /// `path` relative to the root, `/`-separated
    ///
    /// Paths outside the root are returned as given.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }
}
