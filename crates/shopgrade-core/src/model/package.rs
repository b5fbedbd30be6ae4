use serde::Deserialize;
use serde_json::{Map, Value};

/// Identity of a shared component package, read from its `package.json`
///
/// Only `name` and `version` matter here. A field that is absent or not a
/// string reads as `None`; every other key is ignored whatever its shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl PackageManifest {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: text("name"),
            version: text("version"),
        }
    }
}

/// The `package.json` of a shop's storefront app
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct AppManifest {
    #[serde(default)]
    pub dependencies: Option<Value>,
}

impl AppManifest {
    /// Dependency pins with a string version, in manifest order
    ///
    /// Returns `None` when the manifest has no `dependencies` object.
    pub fn dependency_pins(&self) -> Option<Vec<(String, String)>> {
        self.dependencies.as_ref().and_then(Value::as_object).map(pins)
    }
}

fn pins(deps: &Map<String, Value>) -> Vec<(String, String)> {
    deps.iter()
        .filter_map(|(name, v)| v.as_str().map(|v| (name.clone(), v.to_string())))
        .collect()
}

/// Directory name of a package under `packages/`
///
/// Strips a leading `@scope/` prefix: `@acme/button` lives in `packages/button`.
pub fn unscoped_name(name: &str) -> &str {
    match name.strip_prefix('@') {
        Some(rest) => rest.split_once('/').map_or(name, |(_, bare)| bare),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscoped_name() {
        assert_eq!(unscoped_name("@acme/button"), "button");
        assert_eq!(unscoped_name("button"), "button");
        assert_eq!(unscoped_name("@acme"), "@acme");
    }

    #[test]
    fn test_component_ignores_unrelated_fields() {
        let value: Value = serde_json::from_str(
            r#"{"name": "@acme/button", "version": "1.1.0", "dependencies": ["x"]}"#,
        )
        .unwrap();
        let manifest = PackageManifest::from_value(&value);
        assert_eq!(manifest.name.as_deref(), Some("@acme/button"));
        assert_eq!(manifest.version.as_deref(), Some("1.1.0"));
    }

    #[test]
    fn test_component_non_string_version_is_none() {
        let value: Value = serde_json::from_str(r#"{"name": "x", "version": 2}"#).unwrap();
        assert_eq!(PackageManifest::from_value(&value).version, None);
        assert_eq!(PackageManifest::from_value(&Value::Null), PackageManifest::default());
    }

    #[test]
    fn test_dependency_pins_skip_non_strings() {
        let manifest: AppManifest = serde_json::from_str(
            r#"{"dependencies": {"compA": "1.0.0", "weird": {"x": 1}, "compB": "2.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(
            manifest.dependency_pins().unwrap(),
            vec![
                ("compA".to_string(), "1.0.0".to_string()),
                ("compB".to_string(), "2.0.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_dependencies_is_none() {
        let manifest: AppManifest = serde_json::from_str("{}").unwrap();
        assert!(manifest.dependency_pins().is_none());
        let listed: AppManifest = serde_json::from_str(r#"{"dependencies": ["x"]}"#).unwrap();
        assert!(listed.dependency_pins().is_none());
    }
}
