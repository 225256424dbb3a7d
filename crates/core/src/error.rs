//! Error kinds surfaced by the catalog and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// A build file name that cannot be turned into a [`crate::models::BuildRecord`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildParseError {
    /// The name does not contain `<version>-<hash>-<YYYYMMDD>-<HHMM>.jar`.
    #[error("malformed build filename `{file_name}`")]
    Malformed {
        /// Offending file name.
        file_name: String,
    },
    /// The date and time groups do not form a real calendar instant.
    #[error("invalid build date `{value}` in `{file_name}`")]
    InvalidDate {
        /// Offending file name.
        file_name: String,
        /// Combined `YYYYMMDD-HHMM` value that failed to parse.
        value: String,
    },
}

/// Failures raised by the filesystem, counter, or link collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entry does not exist.
    #[error("{} does not exist", path.display())]
    NotFound {
        /// Path relative to the store root.
        path: PathBuf,
    },
    /// Underlying I/O failure.
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Source error.
        #[source]
        source: std::io::Error,
    },
    /// A persisted document could not be encoded or decoded.
    #[error("failed to (de)serialise {}: {source}", path.display())]
    Serialization {
        /// Path of the document.
        path: PathBuf,
        /// Source error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Errors returned by [`crate::catalog::BuildCatalog`] operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A build file name could not be parsed.
    #[error(transparent)]
    Parse(#[from] BuildParseError),
    /// The requested build is not present in the store.
    #[error("no such build `{file_name}` for application `{application}`")]
    NotFound {
        /// Application name.
        application: String,
        /// Requested file name.
        file_name: String,
    },
    /// A collaborator failed.
    #[error(transparent)]
    Infrastructure(#[from] StoreError),
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
