//! Collaborators the catalog depends on, with local implementations.

/// Persistent per-file download counters.
pub mod counter;
/// Build artifacts stored on the local filesystem.
pub mod files;
/// Absolute download URL generation.
pub mod links;

use crate::error::StoreError;

pub use counter::{JsonCounterStore, MemoryCounterStore};
pub use files::LocalBuildStore;
pub use links::UrlLinkGenerator;

/// Read access to build artifacts, addressed by `/`-free relative paths.
pub trait BuildStore: Send + Sync {
    /// File names directly under `directory`. A missing directory lists as empty.
    fn list(&self, directory: &str) -> Result<Vec<String>, StoreError>;

    /// Size in bytes of the file at `path`, failing with
    /// [`StoreError::NotFound`] if it is absent.
    fn size_of(&self, path: &str) -> Result<u64, StoreError>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;
}

/// Download counters keyed by application and file name.
pub trait CounterStore: Send + Sync {
    /// Current count, zero for files never grabbed.
    fn get(&self, application: &str, file_name: &str) -> Result<u64, StoreError>;

    /// Record one download and return the new count.
    fn increment(&self, application: &str, file_name: &str) -> Result<u64, StoreError>;
}

/// Named routes a [`LinkGenerator`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Raw artifact download.
    Files,
    /// Counting redirect.
    Grab,
}

impl Route {
    /// Path prefix of the route.
    pub fn as_str(self) -> &'static str {
        match self {
            Route::Files => "files",
            Route::Grab => "grab",
        }
    }
}

/// Turns a route plus application and file into an absolute URL.
pub trait LinkGenerator: Send + Sync {
    /// Absolute URL for `route`.
    fn generate(&self, route: Route, application: &str, file_name: &str) -> String;
}
