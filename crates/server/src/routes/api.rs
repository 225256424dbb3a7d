//! JSON catalog routes under `/api`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use buildshelf_core::BuildEntry;
use tracing::info;

use crate::error::ServerError;
use crate::middleware::locale::Locale;
use crate::schemas::{ApplicationsView, BuildView, CategoryView};
use crate::state::AppState;

/// Register catalog routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/{application}/builds", get(list_builds))
        .route("/applications/{application}/latest", get(latest_build))
        .route("/applications/{application}/builds/{file}", get(get_build))
}

/// Applications grouped by category (`GET /api/applications`).
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Extension(Locale(locale)): Extension<Locale>,
) -> Json<ApplicationsView> {
    let categories = state
        .registry
        .by_category()
        .into_iter()
        .map(|(category, applications)| CategoryView {
            category: category.to_string(),
            applications: applications.into_iter().cloned().collect(),
        })
        .collect();
    Json(ApplicationsView { locale, categories })
}

/// Every build plus the latest alias (`GET /api/applications/{application}/builds`).
pub async fn list_builds(
    State(state): State<Arc<AppState>>,
    Path(application): Path<String>,
) -> Result<Json<Vec<BuildView>>, ServerError> {
    let app = state.application(&application)?;
    let entries = state.catalog.list_builds(app)?;
    info!(application = %app.name, builds = entries.len(), "listed builds");
    Ok(Json(entries.iter().map(BuildView::from).collect()))
}

/// The latest build (`GET /api/applications/{application}/latest`).
pub async fn latest_build(
    State(state): State<Arc<AppState>>,
    Path(application): Path<String>,
) -> Result<Json<BuildView>, ServerError> {
    let app = state.application(&application)?;
    let latest = state
        .catalog
        .latest_build(app)?
        .ok_or_else(|| ServerError::NotFound(format!("`{}` has no builds", app.name)))?;
    Ok(Json(BuildView::from(&BuildEntry::Latest(latest))))
}

/// One build by file name (`GET /api/applications/{application}/builds/{file}`).
pub async fn get_build(
    State(state): State<Arc<AppState>>,
    Path((application, file)): Path<(String, String)>,
) -> Result<Json<BuildView>, ServerError> {
    let app = state.application(&application)?;
    let entry = state.catalog.build(app, &file)?;
    Ok(Json(BuildView::from(&entry)))
}
