//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use buildshelf_core::{
    store::{JsonCounterStore, LocalBuildStore, UrlLinkGenerator},
    AppConfig, ApplicationDescriptor, ApplicationRegistry, BuildCatalog,
};

use crate::error::ServerError;

/// State shared across all HTTP handlers.
pub struct AppState {
    /// Known applications.
    pub registry: ApplicationRegistry,
    /// Build queries over the artifact store.
    pub catalog: BuildCatalog,
    /// Generates the direct links grabs redirect to.
    pub links: Arc<UrlLinkGenerator>,
    /// Locale used when a request has no preference.
    pub default_locale: String,
}

impl AppState {
    /// Wire the on-disk collaborators described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let registry = ApplicationRegistry::load(&config.applications_file)?;
        let counters = JsonCounterStore::open(&config.counters_file).with_context(|| {
            format!(
                "failed to open download counters {}",
                config.counters_file.display()
            )
        })?;
        let links = Arc::new(UrlLinkGenerator::new(config.base_url.as_str()));
        let catalog = BuildCatalog::new(
            Arc::new(LocalBuildStore::new(&config.builds_root)),
            Arc::new(counters),
            links.clone(),
        )
        .with_skip_malformed(config.skip_malformed);

        Ok(Self {
            registry,
            catalog,
            links,
            default_locale: config.default_locale.clone(),
        })
    }

    /// Resolve an application name from a request path.
    pub fn application(&self, name: &str) -> Result<&ApplicationDescriptor, ServerError> {
        self.registry
            .get(name)
            .ok_or_else(|| ServerError::NotFound(format!("unknown application `{name}`")))
    }
}
