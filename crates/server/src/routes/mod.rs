//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - request tracing and locale selection layers
//! - health route
//! - JSON catalog routes under `/api`
//! - raw artifacts under `/files` and counting redirects under `/grab`

mod api;
mod downloads;
mod health;

use std::path::Path;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::locale::locale_middleware;
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>, builds_root: &Path) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api", api::router())
        .merge(downloads::router())
        .nest_service("/files", ServeDir::new(builds_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            locale_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
