use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::UpgradeError;
use crate::rules::validation::validate_shop_id;

/// A validated shop identifier
///
/// Only constructible through [`ShopId::parse`], so any path derived from it
/// cannot escape the shop's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShopId(String);

impl ShopId {
    /// Validate a raw id
    ///
    /// # Errors
    ///
    /// Returns `UpgradeError::InvalidShopId` when the id is empty, too long or
    /// contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Result<Self, UpgradeError> {
        validate_shop_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Subject claim a preview token for this shop must carry
    pub fn preview_subject(&self) -> String {
        format!("shop:{}:upgrade-preview", self.0)
    }

    /// Workspace filter name of the shop's storefront app
    pub fn app_name(&self) -> String {
        format!("shop-{}", self.0)
    }
}

impl std::fmt::Display for ShopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locked component versions for one shop, in manifest key order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ComponentVersions(Map<String, Value>);

impl ComponentVersions {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Lock `name` to `version`, replacing any previous entry
    pub fn lock(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.0.insert(name.into(), Value::String(version.into()));
    }

    /// `(package, locked version)` pairs in manifest order
    ///
    /// A version recorded as `null` reads as `None`; other non-string values
    /// are rendered as their JSON text.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), version_text(v)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ComponentVersions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut versions = ComponentVersions::new();
        for (k, v) in iter {
            versions.lock(k, v);
        }
        versions
    }
}

fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Persisted per-shop record (`data/shops/{id}/shop.json`)
///
/// Keys other than `componentVersions` and `lastUpgrade` belong to other
/// subsystems and are carried through a rewrite untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShopManifest {
    #[serde(
        rename = "componentVersions",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub component_versions: ComponentVersions,

    /// RFC 3339 timestamp of the last successful lock, written by publish only
    #[serde(rename = "lastUpgrade", default, skip_serializing_if = "Option::is_none")]
    pub last_upgrade: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<ComponentVersions, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ComponentVersions>::deserialize(deserializer)?.unwrap_or_default())
}
