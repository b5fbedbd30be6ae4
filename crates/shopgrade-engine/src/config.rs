//! Engine configuration from the environment

use std::path::PathBuf;

use shopgrade_core::{AuthorizationGuard, ShopId};
use shopgrade_core_types::Sensitive;
use shopgrade_store::RepoLayout;

use crate::commands::runner::CommandSpec;

/// HS256 secret for preview tokens; absent or empty rejects every preview
pub const ENV_PREVIEW_SECRET: &str = "UPGRADE_PREVIEW_TOKEN_SECRET";
/// Repository root holding `data/`, `apps/` and `packages/`
pub const ENV_ROOT: &str = "SHOPGRADE_ROOT";
/// Executable used for the build and deploy steps
pub const ENV_PACKAGE_MANAGER: &str = "SHOPGRADE_PACKAGE_MANAGER";

pub const DEFAULT_PACKAGE_MANAGER: &str = "pnpm";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub root: PathBuf,
    pub preview_secret: Option<Sensitive<String>>,
    pub package_manager: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            preview_secret: None,
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            root: non_empty(ENV_ROOT).map(PathBuf::from).unwrap_or(defaults.root),
            preview_secret: non_empty(ENV_PREVIEW_SECRET).map(Sensitive::new),
            package_manager: non_empty(ENV_PACKAGE_MANAGER).unwrap_or(defaults.package_manager),
        }
    }

    pub fn layout(&self) -> RepoLayout {
        RepoLayout::new(&self.root)
    }

    pub fn guard(&self) -> AuthorizationGuard {
        AuthorizationGuard::new(self.preview_secret.clone())
    }

    /// `{pm} --filter apps/shop-{id} build`, run from the repository root
    pub fn build_command(&self, shop: &ShopId) -> CommandSpec {
        self.pipeline_step(shop, "build")
    }

    /// `{pm} --filter apps/shop-{id} deploy`, run from the repository root
    pub fn deploy_command(&self, shop: &ShopId) -> CommandSpec {
        self.pipeline_step(shop, "deploy")
    }

    fn pipeline_step(&self, shop: &ShopId, step: &str) -> CommandSpec {
        CommandSpec::new(
            &self.package_manager,
            ["--filter", format!("apps/{}", shop.app_name()).as_str(), step],
            &self.root,
        )
    }
}
