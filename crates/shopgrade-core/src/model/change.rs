use serde::{Deserialize, Serialize};

/// One detected upgrade opportunity
///
/// Only produced when a current version was resolved and it differs from the
/// locked one (a never-recorded lock counts as different).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentChange {
    pub name: String,
    pub from: Option<String>,
    pub to: String,
    /// First substantive changelog line, or empty
    pub summary: String,
    /// Changelog path relative to the repository root, or empty
    pub changelog: String,
}

/// Config drift of a shop's overrides against the canonical template app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigDiff {
    pub templates: Vec<String>,
    pub translations: Vec<String>,
}

impl ConfigDiff {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.translations.is_empty()
    }
}

/// Body of a successful diff preview
///
/// `configDiff` is omitted entirely unless drift was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreviewReport {
    pub components: Vec<ComponentChange>,

    #[serde(rename = "configDiff", default, skip_serializing_if = "Option::is_none")]
    pub config_diff: Option<ConfigDiff>,
}
