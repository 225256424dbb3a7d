//! Layered service configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ::config::{Config, Environment, File};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "buildshelf";

/// Prefix of environment overrides, e.g. `BUILDSHELF_BASE_URL`.
pub const ENV_PREFIX: &str = "BUILDSHELF";

const DEFAULT_CONFIG: &str = r#"# buildshelf configuration. Every key can be overridden with BUILDSHELF_<KEY>.

# Directory holding one folder of build artifacts per application.
builds_root = "./builds"
# JSON array of application descriptors.
applications_file = "./applications.json"
# Download counters, created on first grab.
counters_file = "./counters.json"
# Public URL prefix used for direct and grab links.
base_url = "http://127.0.0.1:8080"
bind_address = "127.0.0.1:8080"
default_locale = "en"
log_level = "info"
log_json = false
# Skip build files whose names do not parse instead of failing the listing.
skip_malformed = true
"#;

/// Runtime settings for the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one folder per application.
    pub builds_root: PathBuf,
    /// JSON array of application descriptors.
    pub applications_file: PathBuf,
    /// Download counter document.
    pub counters_file: PathBuf,
    /// Public URL prefix for generated links.
    pub base_url: String,
    /// Socket address the HTTP server binds.
    pub bind_address: String,
    /// Locale used when a request expresses no preference.
    pub default_locale: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines.
    pub log_json: bool,
    /// Skip malformed build names while listing.
    pub skip_malformed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            builds_root: PathBuf::from("./builds"),
            applications_file: PathBuf::from("./applications.json"),
            counters_file: PathBuf::from("./counters.json"),
            base_url: "http://127.0.0.1:8080".to_string(),
            bind_address: "127.0.0.1:8080".to_string(),
            default_locale: "en".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            skip_malformed: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file overlaid with environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional on disk) overlaid with environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layers(
            path.as_ref(),
            Some(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn load_layers(path: &Path, environment: Option<Environment>) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }
        let settings = builder
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

/// Location of the user's `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert!(path.exists());

        let loaded = AppConfig::load_layers(&path, None)?;
        assert_eq!(loaded, AppConfig::default());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "builds_root = \"/srv/builds\"\nbase_url = \"https://ci.example.com\"\nskip_malformed = false\n",
        )?;

        let loaded = AppConfig::load_layers(&path, None)?;
        assert_eq!(loaded.builds_root, PathBuf::from("/srv/builds"));
        assert_eq!(loaded.base_url, "https://ci.example.com");
        assert!(!loaded.skip_malformed);
        assert_eq!(loaded.default_locale, "en");
        Ok(())
    }

    #[test]
    fn environment_overrides_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://file.example.com\"\n")?;

        let env = HashMap::from([(
            "BUILDSHELF_BASE_URL".to_string(),
            "https://env.example.com".to_string(),
        )]);
        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(env));

        let loaded = AppConfig::load_layers(&path, Some(environment))?;
        assert_eq!(loaded.base_url, "https://env.example.com");
        Ok(())
    }

    #[test]
    fn existing_config_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_locale = \"de\"\n")?;
        write_default_config(&path)?;
        assert_eq!(AppConfig::load_layers(&path, None)?.default_locale, "de");
        Ok(())
    }
}
