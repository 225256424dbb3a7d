//! Shared domain models.

mod build;
mod version;

use serde::{Deserialize, Serialize};

pub use build::{
    human_size, Build, BuildEntry, BuildLinks, BuildRecord, LatestBuildRecord,
};
pub use version::{compare_versions, is_newer_than};

/// A labelled link to an application's upstream presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialLink {
    /// Link caption (e.g. `GitHub`).
    pub label: String,
    /// Target URL.
    pub url: String,
}

/// An application whose builds are catalogued.
///
/// Defaults are applied while deserialising so readers never see a missing
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDescriptor {
    /// Unique identifier, also the directory name under the builds root.
    pub name: String,
    /// Grouping shown in listings.
    #[serde(default = "default_category")]
    pub category: String,
    /// Highlighted in listings.
    #[serde(default)]
    pub recommended: bool,
    /// No longer maintained.
    #[serde(default = "default_abandoned")]
    pub abandoned: bool,
    /// Hosted elsewhere.
    #[serde(default)]
    pub external: bool,
    /// Upstream links in display order.
    #[serde(default)]
    pub official_links: Vec<OfficialLink>,
}

impl ApplicationDescriptor {
    /// Descriptor with every optional field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: default_category(),
            recommended: false,
            abandoned: default_abandoned(),
            external: false,
            official_links: Vec::new(),
        }
    }
}

fn default_category() -> String {
    "Other".to_string()
}

fn default_abandoned() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() -> anyhow::Result<()> {
        let app: ApplicationDescriptor = serde_json::from_value(json!({ "name": "Spigot" }))?;
        assert_eq!(app, ApplicationDescriptor::new("Spigot"));
        assert_eq!(app.category, "Other");
        assert!(!app.recommended);
        assert!(app.abandoned);
        assert!(!app.external);
        assert!(app.official_links.is_empty());
        Ok(())
    }

    #[test]
    fn explicit_fields_override_defaults() -> anyhow::Result<()> {
        let app: ApplicationDescriptor = serde_json::from_value(json!({
            "name": "Paper",
            "category": "Servers",
            "recommended": true,
            "abandoned": false,
            "external": true,
            "officialLinks": [
                { "label": "GitHub", "url": "https://github.com/example/paper" },
                { "label": "Docs", "url": "https://docs.example.com" }
            ]
        }))?;
        assert_eq!(app.category, "Servers");
        assert!(app.recommended);
        assert!(!app.abandoned);
        assert!(app.external);
        let labels: Vec<_> = app.official_links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["GitHub", "Docs"]);
        Ok(())
    }
}
