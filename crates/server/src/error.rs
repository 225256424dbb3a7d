//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`; the [`IntoResponse`] impl turns
//! errors into a JSON body with a matching status code. Infrastructure
//! failures are logged in full but answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use buildshelf_core::CatalogError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the build catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The caller referenced something that does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::Catalog(err @ CatalogError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ServerError::Catalog(err @ CatalogError::Parse(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ServerError::Catalog(CatalogError::Infrastructure(e)) => {
                error!(error = %e, "build store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
