//! Counting redirect for build downloads.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use buildshelf_core::store::{LinkGenerator, Route};
use tracing::info;

use crate::error::ServerError;
use crate::state::AppState;

/// Register the grab route. Raw files are served by `ServeDir` under `/files`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/grab/{application}/{file}", get(grab))
}

/// Count a download and redirect to the direct link.
pub async fn grab(
    State(state): State<Arc<AppState>>,
    Path((application, file)): Path<(String, String)>,
) -> Result<Redirect, ServerError> {
    let app = state.application(&application)?;
    let count = state.catalog.record_grab(app, &file)?;
    info!(application = %app.name, file = %file, count, "build grabbed");
    Ok(Redirect::temporary(
        &state.links.generate(Route::Files, &app.name, &file),
    ))
}
