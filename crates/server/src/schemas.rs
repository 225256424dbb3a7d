//! JSON response bodies.

use buildshelf_core::{ApplicationDescriptor, Build, BuildEntry};
use serde::Serialize;

/// One build as rendered by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildView {
    pub file_name: String,
    pub byte_size: u64,
    pub human_size: String,
    pub direct_link: String,
    pub grab_link: String,
    pub download_counter: u64,
    pub latest: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch_date: Option<i64>,
}

impl From<&BuildEntry> for BuildView {
    fn from(entry: &BuildEntry) -> Self {
        let record = entry.record();
        Self {
            file_name: entry.file_name().to_string(),
            byte_size: entry.byte_size(),
            human_size: entry.human_size(),
            direct_link: entry.direct_link().to_string(),
            grab_link: entry.grab_link().to_string(),
            download_counter: entry.download_counter(),
            latest: entry.is_latest(),
            version: record.map(|r| r.version().to_string()),
            build_hash: record.map(|r| r.build_hash().to_string()),
            human_date: record.map(|r| r.human_date()),
            epoch_date: record.map(|r| r.epoch_date()),
        }
    }
}

/// Applications sharing a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub applications: Vec<ApplicationDescriptor>,
}

/// Body of `GET /api/applications`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationsView {
    pub locale: String,
    pub categories: Vec<CategoryView>,
}
