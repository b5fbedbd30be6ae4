//! Diff preview orchestration.
//!
//! ## Pipeline (in order):
//! 1. Validate the shop id (400 on failure)
//! 2. Authorize the bearer token (403 on failure)
//! 3. Gather component changes, plus config drift when asked
//! 4. Respond with the report
//!
//! Hard failures from step 3 are returned as `Err` for the transport to map.

use std::time::Instant;

use serde_json::{json, Value};
use shopgrade_core::core_types::schema::EVENT_REJECT;
use shopgrade_core::diff::compute_changes;
use shopgrade_core::errors::Result;
use shopgrade_core::model::{ComponentChange, ConfigDiff, PreviewReport, ShopId};
use shopgrade_core::{log_op_end, log_op_error, log_op_start, AuthRejection, AuthorizationGuard};
use shopgrade_core_types::Sensitive;
use shopgrade_store::fs::diff_directories;
use shopgrade_store::manifests::load_shop_manifest;
use shopgrade_store::{ConfigArea, FsPackageSource, RepoLayout};

/// A diff preview request as received from the transport
#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    /// Raw path parameter, not yet validated
    pub shop_id: Option<String>,
    /// Raw `Authorization` header value
    pub authorization: Option<Sensitive<String>>,
    /// Whether config drift was requested (`?diff` present)
    pub diff: bool,
}

/// How a preview request ended, short of a hard failure
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Report(PreviewReport),
    InvalidShopId,
    Forbidden(AuthRejection),
}

impl PreviewOutcome {
    pub fn status(&self) -> u16 {
        match self {
            PreviewOutcome::Report(_) => 200,
            PreviewOutcome::InvalidShopId => 400,
            PreviewOutcome::Forbidden(_) => 403,
        }
    }

    /// JSON body for the response
    pub fn body(&self) -> Value {
        match self {
            PreviewOutcome::Report(report) => {
                serde_json::to_value(report).unwrap_or_else(|_| json!({ "components": [] }))
            }
            PreviewOutcome::InvalidShopId => json!({ "error": "Invalid shop id" }),
            PreviewOutcome::Forbidden(_) => json!({ "error": "Forbidden" }),
        }
    }
}

/// Component changes for one shop
///
/// An absent or unparsable shop manifest yields no changes.
///
/// # Errors
///
/// `InvalidManifest` or `Io` when a locked package's manifest is broken.
pub fn gather_changes(layout: &RepoLayout, shop: &ShopId) -> Result<Vec<ComponentChange>> {
    let manifest = load_shop_manifest(layout, shop)?;
    let source = FsPackageSource::new(layout.clone());
    compute_changes(&manifest.component_versions, &source)
        .map_err(|e| e.with_shop_id(shop.as_str()))
}

/// Templates and translations that differ from the canonical template app
///
/// # Errors
///
/// `Io` when either tree cannot be walked or read.
pub fn gather_config_diff(layout: &RepoLayout, shop: &ShopId) -> Result<ConfigDiff> {
    let area_diff = |area: ConfigArea| {
        diff_directories(
            &layout.app_config_dir(shop, area),
            &layout.template_config_dir(area),
        )
        .map_err(|e| e.with_shop_id(shop.as_str()))
    };

    Ok(ConfigDiff {
        templates: area_diff(ConfigArea::Templates)?,
        translations: area_diff(ConfigArea::Translations)?,
    })
}

/// Read-only preview of pending upgrades for one shop
#[derive(Debug, Clone)]
pub struct DiffPreviewHandler {
    layout: RepoLayout,
    guard: AuthorizationGuard,
}

impl DiffPreviewHandler {
    pub fn new(layout: RepoLayout, guard: AuthorizationGuard) -> Self {
        Self { layout, guard }
    }

    /// # Errors
    ///
    /// Hard failures while diffing; validation and authorization failures
    /// are outcomes, not errors.
    pub fn handle(&self, request: &PreviewRequest) -> Result<PreviewOutcome> {
        let Some(shop) = request
            .shop_id
            .as_deref()
            .and_then(|raw| ShopId::parse(raw).ok())
        else {
            tracing::warn!(
                op = "preview_diff",
                event = EVENT_REJECT,
                raw = ?request.shop_id,
                "invalid shop id"
            );
            return Ok(PreviewOutcome::InvalidShopId);
        };

        let authorization = request.authorization.as_ref().map(|h| h.expose().as_str());
        let claims = match self.guard.authorize(&shop, authorization) {
            Ok(claims) => claims,
            Err(rejection) => return Ok(PreviewOutcome::Forbidden(rejection)),
        };
        tracing::debug!(
            shop_id = shop.as_str(),
            subject = %claims.subject,
            expires_at = claims.expires_at,
            "preview token accepted"
        );

        let start = Instant::now();
        log_op_start!("preview_diff", shop_id = shop.as_str(), diff = request.diff);

        let result = self.report(&shop, request.diff);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(report) => {
                log_op_end!(
                    "preview_diff",
                    duration_ms = duration_ms,
                    shop_id = shop.as_str(),
                    change_count = report.components.len()
                );
            }
            Err(err) => {
                log_op_error!("preview_diff", *err, duration_ms = duration_ms, shop_id = shop.as_str());
            }
        }

        result.map(PreviewOutcome::Report)
    }

    fn report(&self, shop: &ShopId, with_config_diff: bool) -> Result<PreviewReport> {
        let components = gather_changes(&self.layout, shop)?;
        let config_diff = if with_config_diff {
            Some(gather_config_diff(&self.layout, shop)?)
        } else {
            None
        };
        Ok(PreviewReport {
            components,
            config_diff,
        })
    }
}
