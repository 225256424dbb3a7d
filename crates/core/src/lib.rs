#![warn(clippy::all, missing_docs)]

//! Core domain logic for the buildshelf download catalog.
//!
//! This crate hosts the application and build models, build file name
//! parsing, latest-build resolution, configuration handling, and the
//! storage collaborators used by the HTTP server.

pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod models;
pub mod registry;
pub mod store;

pub use catalog::BuildCatalog;
pub use crate::config::AppConfig;
pub use error::{BuildParseError, CatalogError, CatalogResult, StoreError};
pub use locale::{resolve_locale, LocaleChoice};
pub use models::{
    ApplicationDescriptor, Build, BuildEntry, BuildLinks, BuildRecord, LatestBuildRecord,
    OfficialLink,
};
pub use registry::ApplicationRegistry;
