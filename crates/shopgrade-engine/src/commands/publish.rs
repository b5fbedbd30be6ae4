//! Upgrade publish pipeline.
//!
//! ## Steps (in order):
//! 1. Read the shop app's dependency pins
//! 2. Read the shop manifest (missing = empty, malformed = error)
//! 3. Resolve the selection (explicit names, or every dependency)
//! 4. Lock each selected name that the app pins
//! 5. Stamp `lastUpgrade` and persist atomically
//! 6. Build, then deploy only if build succeeded
//!
//! Step 6 is skipped when the app declares no `dependencies` object.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use shopgrade_core::errors::{ExError, Result};
use shopgrade_core::model::ShopId;
use shopgrade_core::{log_op_end, log_op_error, log_op_start};
use shopgrade_store::manifests::{load_shop_manifest_strict, read_app_manifest, save_shop_manifest};
use shopgrade_store::RepoLayout;

use super::runner::{CommandRunner, CommandSpec};
use crate::config::EngineConfig;

/// Which components to lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every dependency of the shop app
    All,
    /// Exactly these names, de-duplicated, in request order
    Only(Vec<String>),
}

impl Selection {
    /// Parse a publish request body
    ///
    /// Anything other than an object with a non-empty `components` array
    /// (including an empty or malformed body) selects everything. Non-string
    /// entries are dropped.
    pub fn from_body(body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let Some(entries) = parsed
            .as_ref()
            .and_then(|v| v.get("components"))
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
        else {
            return Selection::All;
        };

        let mut names: Vec<String> = Vec::new();
        for name in entries.iter().filter_map(Value::as_str) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Selection::Only(names)
    }
}

/// What a successful publish changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// `(package, version)` pairs written to the shop manifest
    pub locked: Vec<(String, String)>,
    /// RFC 3339 timestamp written as `lastUpgrade`
    pub last_upgrade: String,
    /// False when the app had no dependencies and build/deploy were skipped
    pub pipeline_ran: bool,
}

/// Transport-facing result of a publish request
#[derive(Debug, Clone)]
pub enum PublishResponse {
    Ok(PublishReport),
    InvalidShopId,
    Failed(ExError),
}

impl PublishResponse {
    pub fn status(&self) -> u16 {
        match self {
            PublishResponse::Ok(_) => 200,
            PublishResponse::InvalidShopId => 400,
            PublishResponse::Failed(err) => match err.kind().http_status() {
                400 => 400,
                _ => 500,
            },
        }
    }

    pub fn body(&self) -> Value {
        match self {
            PublishResponse::Ok(_) => json!({ "ok": true }),
            PublishResponse::InvalidShopId => json!({ "error": "Invalid shop id" }),
            PublishResponse::Failed(err) => json!({ "error": err.message() }),
        }
    }
}

/// Locks component versions into a shop manifest and rebuilds the shop
pub struct UpgradePublisher {
    layout: RepoLayout,
    config: EngineConfig,
    runner: Arc<dyn CommandRunner>,
    shop_locks: Mutex<HashMap<ShopId, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for UpgradePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradePublisher")
            .field("layout", &self.layout)
            .field("package_manager", &self.config.package_manager)
            .finish_non_exhaustive()
    }
}

impl UpgradePublisher {
    pub fn new(config: EngineConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            layout: config.layout(),
            config,
            runner,
            shop_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate the raw id and body, publish, and shape the response
    pub fn handle(&self, raw_shop_id: &str, body: &[u8]) -> PublishResponse {
        let Ok(shop) = ShopId::parse(raw_shop_id) else {
            tracing::warn!(op = "publish_upgrade", raw = raw_shop_id, "invalid shop id");
            return PublishResponse::InvalidShopId;
        };
        match self.publish(&shop, &Selection::from_body(body)) {
            Ok(report) => PublishResponse::Ok(report),
            Err(err) => PublishResponse::Failed(err),
        }
    }

    /// Lock the selection for `shop`, persist, then build and deploy
    ///
    /// Publishes to the same shop are serialized within this process.
    ///
    /// # Errors
    ///
    /// The first failure: app or shop manifest I/O, persisting, build, or
    /// deploy. Deploy is never attempted after a failed build.
    pub fn publish(&self, shop: &ShopId, selection: &Selection) -> Result<PublishReport> {
        let start = Instant::now();
        log_op_start!("publish_upgrade", shop_id = shop.as_str());

        let shop_lock = self.lock_for(shop);
        let result = {
            let _guard = shop_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.publish_locked(shop, selection)
        };
        self.release(shop, shop_lock);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "publish_upgrade",
                    duration_ms = duration_ms,
                    shop_id = shop.as_str(),
                    locked_count = report.locked.len(),
                    pipeline_ran = report.pipeline_ran
                );
            }
            Err(err) => {
                log_op_error!(
                    "publish_upgrade",
                    *err,
                    duration_ms = duration_ms,
                    shop_id = shop.as_str()
                );
            }
        }
        result
    }

    fn lock_for(&self, shop: &ShopId) -> Arc<Mutex<()>> {
        let mut locks = self.shop_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(shop.clone()).or_default().clone()
    }

    /// Forget the shop's lock once no other publish holds or awaits it
    fn release(&self, shop: &ShopId, shop_lock: Arc<Mutex<()>>) {
        let mut locks = self.shop_locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here
        if Arc::strong_count(&shop_lock) == 2 {
            locks.remove(shop);
        }
    }

    fn publish_locked(&self, shop: &ShopId, selection: &Selection) -> Result<PublishReport> {
        let app = read_app_manifest(&self.layout, shop)?;
        let mut manifest = load_shop_manifest_strict(&self.layout, shop)?;
        let pins = app.dependency_pins();

        let mut locked = Vec::new();
        if let Some(pins) = &pins {
            let targets: Vec<&str> = match selection {
                Selection::All => pins.iter().map(|(name, _)| name.as_str()).collect(),
                Selection::Only(names) => names.iter().map(String::as_str).collect(),
            };
            for name in targets {
                match pins.iter().find(|(pinned, _)| pinned == name) {
                    Some((_, version)) => {
                        manifest.component_versions.lock(name, version.as_str());
                        locked.push((name.to_string(), version.clone()));
                    }
                    None => {
                        tracing::debug!(
                            shop_id = shop.as_str(),
                            package = name,
                            "not an app dependency, ignoring"
                        );
                    }
                }
            }
        }

        let last_upgrade = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        manifest.last_upgrade = Some(last_upgrade.clone());
        save_shop_manifest(&self.layout, shop, &manifest)?;

        let pipeline_ran = pins.is_some();
        if pipeline_ran {
            self.run_step(&self.config.build_command(shop))?;
            self.run_step(&self.config.deploy_command(shop))?;
        } else {
            tracing::info!(
                shop_id = shop.as_str(),
                "app declares no dependencies, skipping build and deploy"
            );
        }

        Ok(PublishReport {
            locked,
            last_upgrade,
            pipeline_ran,
        })
    }

    fn run_step(&self, spec: &CommandSpec) -> Result<()> {
        self.runner.run(spec)
    }
}
