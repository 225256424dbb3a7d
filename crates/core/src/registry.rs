//! Application descriptors loaded from a JSON document.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::models::ApplicationDescriptor;

/// Immutable set of known applications, in document order.
#[derive(Debug, Clone, Default)]
pub struct ApplicationRegistry {
    applications: Vec<ApplicationDescriptor>,
}

impl ApplicationRegistry {
    /// Load descriptors from a JSON array stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read applications {}", path.display()))?;
        let applications: Vec<ApplicationDescriptor> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse applications {}", path.display()))?;

        let registry = Self::from_descriptors(applications)
            .with_context(|| format!("invalid applications in {}", path.display()))?;
        info!(
            "loaded {} applications from {}",
            registry.applications.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Validate and wrap already-deserialised descriptors.
    pub fn from_descriptors(applications: Vec<ApplicationDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for app in &applications {
            validate_name(&app.name)?;
            if !seen.insert(app.name.as_str()) {
                bail!("duplicate application name `{}`", app.name);
            }
        }
        Ok(Self { applications })
    }

    /// Look up an application by exact name.
    pub fn get(&self, name: &str) -> Option<&ApplicationDescriptor> {
        self.applications.iter().find(|app| app.name == name)
    }

    /// All applications in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.applications.iter()
    }

    /// Number of applications.
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// True when no applications are configured.
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Applications grouped by category, keeping document order inside a group.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&ApplicationDescriptor>> {
        let mut groups: BTreeMap<&str, Vec<&ApplicationDescriptor>> = BTreeMap::new();
        for app in &self.applications {
            groups.entry(app.category.as_str()).or_default().push(app);
        }
        groups
    }

    /// Applications flagged as recommended.
    pub fn recommended(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.applications.iter().filter(|app| app.recommended)
    }
}

/// Names are used verbatim as a directory, so they must be a single plain segment.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("application name must not be empty");
    }
    if name == "." || name.contains("..") {
        bail!("application name `{name}` must not contain `..`");
    }
    if name.contains(['/', '\\', '\0']) {
        bail!("application name `{name}` must not contain path separators");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_and_groups_applications() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("applications.json");
        fs::write(
            &path,
            r#"[
  { "name": "Paper", "category": "Servers", "recommended": true, "abandoned": false },
  { "name": "Tool" },
  { "name": "Spigot", "category": "Servers" }
]"#,
        )?;

        let registry = ApplicationRegistry::load(&path)?;
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("Tool").map(|a| a.category.as_str()), Some("Other"));
        assert!(registry.get("tool").is_none());

        let groups = registry.by_category();
        let categories: Vec<_> = groups.keys().copied().collect();
        assert_eq!(categories, ["Other", "Servers"]);
        let servers: Vec<_> = groups["Servers"].iter().map(|a| a.name.as_str()).collect();
        assert_eq!(servers, ["Paper", "Spigot"]);

        let recommended: Vec<_> = registry.recommended().map(|a| a.name.as_str()).collect();
        assert_eq!(recommended, ["Paper"]);
        Ok(())
    }

    #[test]
    fn rejects_unsafe_or_duplicate_names() {
        for bad in ["", "  ", "..", "a/b", "a\\b", "../etc", "."] {
            let result =
                ApplicationRegistry::from_descriptors(vec![ApplicationDescriptor::new(bad)]);
            assert!(result.is_err(), "`{bad}` should be rejected");
        }

        let result = ApplicationRegistry::from_descriptors(vec![
            ApplicationDescriptor::new("Paper"),
            ApplicationDescriptor::new("Paper"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_name_fails_to_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("applications.json");
        fs::write(&path, r#"[{ "category": "Servers" }]"#)?;
        assert!(ApplicationRegistry::load(&path).is_err());
        Ok(())
    }
}
