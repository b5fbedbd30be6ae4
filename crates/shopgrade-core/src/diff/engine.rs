//! Version diff computation engine.
//!
//! The core entry point is [`compute_changes`], which walks a shop's locked
//! versions and consults a [`PackageSource`] for each package.

use crate::changelog::extract_summary;
use crate::errors::Result;
use crate::model::{ComponentChange, ComponentVersions, PackageManifest};

/// A package changelog resolved next to its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogFile {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub text: String,
}

/// Where current package manifests come from
///
/// The two lookups encode the skip/propagate policy: `Ok(None)` means the
/// package is gone upstream and is skipped, `Err` means its manifest is
/// present but unusable and the diff must fail.
pub trait PackageSource {
    /// Current manifest of `name`
    ///
    /// # Errors
    ///
    /// `InvalidManifest` or `Io` when the manifest exists but cannot be read.
    fn manifest(&self, name: &str) -> Result<Option<PackageManifest>>;

    /// Changelog shipped beside the manifest of `name`, if any
    ///
    /// # Errors
    ///
    /// `Io` when the changelog exists but cannot be read.
    fn changelog(&self, name: &str) -> Result<Option<ChangelogFile>>;
}

/// Compute upgrade opportunities for a set of locked versions.
///
/// Output order follows the order of `locked`.
///
/// # Errors
///
/// Propagates any error from `source`; a missing package is not an error.
pub fn compute_changes(
    locked: &ComponentVersions,
    source: &dyn PackageSource,
) -> Result<Vec<ComponentChange>> {
    let mut changes = Vec::new();

    for (name, from) in locked.iter() {
        let Some(manifest) = source.manifest(name)? else {
            tracing::debug!(package = name, "package manifest missing, skipping");
            continue;
        };

        let Some(to) = manifest.version else {
            tracing::debug!(package = name, "package declares no version, skipping");
            continue;
        };
        if from.as_deref() == Some(to.as_str()) {
            continue;
        }

        let (summary, changelog) = match source.changelog(name)? {
            Some(file) => (extract_summary(&file.text).to_string(), file.path),
            None => (String::new(), String::new()),
        };

        changes.push(ComponentChange {
            name: manifest.name.unwrap_or_else(|| name.to_string()),
            from,
            to,
            summary,
            changelog,
        });
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExError, ExErrorKind};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSource {
        manifests: HashMap<String, std::result::Result<PackageManifest, ExErrorKind>>,
        changelogs: HashMap<String, ChangelogFile>,
    }

    impl MapSource {
        fn with(mut self, key: &str, name: Option<&str>, version: Option<&str>) -> Self {
            self.manifests.insert(
                key.to_string(),
                Ok(PackageManifest {
                    name: name.map(str::to_string),
                    version: version.map(str::to_string),
                }),
            );
            self
        }
    }

    impl PackageSource for MapSource {
        fn manifest(&self, name: &str) -> Result<Option<PackageManifest>> {
            match self.manifests.get(name) {
                None => Ok(None),
                Some(Ok(m)) => Ok(Some(m.clone())),
                Some(Err(kind)) => Err(ExError::new(*kind).with_entity_id(name)),
            }
        }

        fn changelog(&self, name: &str) -> Result<Option<ChangelogFile>> {
            Ok(self.changelogs.get(name).cloned())
        }
    }

    fn locked(pairs: &[(&str, &str)]) -> ComponentVersions {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_equal_version_is_not_a_change() {
        let source = MapSource::default().with("a", Some("a"), Some("1.0.0"));
        let changes = compute_changes(&locked(&[("a", "1.0.0")]), &source).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_missing_version_is_skipped() {
        let source = MapSource::default().with("a", Some("a"), None);
        let changes = compute_changes(&locked(&[("a", "1.0.0")]), &source).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_declared_name_falls_back_to_key() {
        let source = MapSource::default().with("a", None, Some("2.0.0"));
        let changes = compute_changes(&locked(&[("a", "1.0.0")]), &source).unwrap();
        assert_eq!(changes[0].name, "a");
        assert_eq!(changes[0].summary, "");
        assert_eq!(changes[0].changelog, "");
    }

    #[test]
    fn test_null_lock_reports_from_none() {
        let versions: ComponentVersions = serde_json::from_str(r#"{"a": null}"#).unwrap();
        let source = MapSource::default().with("a", Some("a"), Some("1.0.0"));
        let changes = compute_changes(&versions, &source).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, None);
    }

    #[test]
    fn test_broken_manifest_propagates() {
        let mut source = MapSource::default().with("ok", Some("ok"), Some("9.9.9"));
        source
            .manifests
            .insert("broken".to_string(), Err(ExErrorKind::InvalidManifest));
        let err = compute_changes(&locked(&[("ok", "1.0.0"), ("broken", "1.0.0")]), &source)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
        assert_eq!(err.entity_id(), Some("broken"));
    }
}
