//! Build discovery and latest-build resolution.

use std::{cmp::Ordering, path::MAIN_SEPARATOR, sync::Arc};

use tracing::{debug, warn};

use crate::{
    error::{CatalogError, CatalogResult, StoreError},
    models::{
        compare_versions, ApplicationDescriptor, Build, BuildEntry, BuildLinks, BuildRecord,
        LatestBuildRecord,
    },
    store::{BuildStore, CounterStore, LinkGenerator, Route},
};

/// Answers build queries for applications by reading the store on every call.
///
/// Nothing is cached between calls, so a catalog can be shared freely across
/// request handlers.
#[derive(Clone)]
pub struct BuildCatalog {
    store: Arc<dyn BuildStore>,
    counters: Arc<dyn CounterStore>,
    links: Arc<dyn LinkGenerator>,
    skip_malformed: bool,
}

impl BuildCatalog {
    /// Create a catalog over the given collaborators. Malformed file names are
    /// skipped during listing by default.
    pub fn new(
        store: Arc<dyn BuildStore>,
        counters: Arc<dyn CounterStore>,
        links: Arc<dyn LinkGenerator>,
    ) -> Self {
        Self {
            store,
            counters,
            links,
            skip_malformed: true,
        }
    }

    /// When false, a single malformed file name fails the whole listing.
    pub fn with_skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// Every build of `application`, followed by the latest alias when any exist.
    pub fn list_builds(&self, application: &ApplicationDescriptor) -> CatalogResult<Vec<BuildEntry>> {
        let builds = self.discover(application)?;
        let latest = select_latest(&builds)
            .map(|build| LatestBuildRecord::from_build(application.name.as_str(), build));

        let mut entries: Vec<BuildEntry> = builds.into_iter().map(BuildEntry::Build).collect();
        if let Some(latest) = latest {
            entries.push(BuildEntry::Latest(latest));
        }
        Ok(entries)
    }

    /// Highest ranked build of `application`, if it has any.
    pub fn latest_build(
        &self,
        application: &ApplicationDescriptor,
    ) -> CatalogResult<Option<LatestBuildRecord>> {
        let builds = self.discover(application)?;
        Ok(select_latest(&builds)
            .map(|build| LatestBuildRecord::from_build(application.name.as_str(), build)))
    }

    /// The build stored as `file_name`.
    ///
    /// Returns the latest alias when `file_name` is the latest build.
    pub fn build(
        &self,
        application: &ApplicationDescriptor,
        file_name: &str,
    ) -> CatalogResult<BuildEntry> {
        if let Some(latest) = self.latest_build(application)? {
            if latest.file_name() == file_name {
                return Ok(BuildEntry::Latest(latest));
            }
        }

        self.build_for_file(application, file_name)
            .map(BuildEntry::Build)
    }

    /// Store path of one build.
    pub fn build_path(&self, application: &ApplicationDescriptor, file_name: &str) -> String {
        format!(
            "{}{}{}",
            self.application_path(application),
            MAIN_SEPARATOR,
            file_name
        )
    }

    /// Store directory of an application.
    pub fn application_path(&self, application: &ApplicationDescriptor) -> String {
        application.name.clone()
    }

    /// Whether `file_name` exists for `application`.
    pub fn build_exists(&self, application: &ApplicationDescriptor, file_name: &str) -> bool {
        self.store.exists(&self.build_path(application, file_name))
    }

    /// Count one download of an existing build and return the new total.
    ///
    /// Only build file names directly under the application directory are
    /// counted; anything else is reported as not found.
    pub fn record_grab(
        &self,
        application: &ApplicationDescriptor,
        file_name: &str,
    ) -> CatalogResult<u64> {
        let nested = file_name.contains(['/', '\\']) || file_name.contains("..");
        if nested
            || BuildRecord::check_file_name(file_name).is_err()
            || !self.build_exists(application, file_name)
        {
            return Err(not_found(application, file_name));
        }
        Ok(self.counters.increment(&application.name, file_name)?)
    }

    fn discover(&self, application: &ApplicationDescriptor) -> CatalogResult<Vec<BuildRecord>> {
        let files = self.store.list(&self.application_path(application))?;
        debug!("found {} files for {}", files.len(), application.name);

        let mut builds = Vec::with_capacity(files.len());
        for file_name in files {
            match self.build_for_file(application, &file_name) {
                Ok(build) => builds.push(build),
                Err(CatalogError::Parse(err)) if self.skip_malformed => {
                    warn!("Skipping {} build {}: {}", application.name, file_name, err);
                }
                // Listed but gone by the time its size was read.
                Err(err @ CatalogError::NotFound { .. }) => {
                    warn!("Skipping {} build {}: {}", application.name, file_name, err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(builds)
    }

    fn build_for_file(
        &self,
        application: &ApplicationDescriptor,
        file_name: &str,
    ) -> CatalogResult<BuildRecord> {
        let size = match self.store.size_of(&self.build_path(application, file_name)) {
            Ok(size) => size,
            Err(StoreError::NotFound { .. }) => return Err(not_found(application, file_name)),
            Err(err) => return Err(err.into()),
        };

        let links = BuildLinks {
            direct: self.links.generate(Route::Files, &application.name, file_name),
            grab: self.links.generate(Route::Grab, &application.name, file_name),
        };
        let counter = self.counters.get(&application.name, file_name)?;

        Ok(BuildRecord::parse(
            application.name.as_str(),
            file_name,
            size,
            links,
            counter,
        )?)
    }
}

/// Pick the build with the highest version, breaking version ties by the
/// later build date. The first of several identical candidates wins.
pub fn select_latest(builds: &[BuildRecord]) -> Option<&BuildRecord> {
    builds.iter().fold(None, |best, candidate| match best {
        Some(current) if !outranks(candidate, current) => Some(current),
        _ => Some(candidate),
    })
}

fn outranks(candidate: &BuildRecord, current: &BuildRecord) -> bool {
    match compare_versions(candidate.version(), current.version()) {
        Ordering::Greater => true,
        Ordering::Equal => candidate.epoch_date() > current.epoch_date(),
        Ordering::Less => false,
    }
}

fn not_found(application: &ApplicationDescriptor, file_name: &str) -> CatalogError {
    CatalogError::NotFound {
        application: application.name.clone(),
        file_name: file_name.to_string(),
    }
}
