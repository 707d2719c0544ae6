//! # REST API Interface Layer
//!
//! HTTP endpoints for the student registry screen.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: One route per controller operation
//! - **Error Handling**: Converting domain errors to HTTP status codes
//! - **Serialization**: JSON request/response handling, CSV for the export
//! - **Logging**: One log line per request

pub mod auth_apis;
pub mod export_apis;
pub mod student_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use log::{error, warn};
use shared::ErrorResponse;

use crate::domain::RegistryError;
use crate::AppState;

/// Create the `/api` router
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/students", student_apis::router())
        .nest("/export", export_apis::router())
        .nest("/auth", auth_apis::router())
}

pub fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::RecordNotLoaded(_) => StatusCode::NOT_FOUND,
        RegistryError::NothingStaged | RegistryError::InvalidPageSize(_) => StatusCode::BAD_REQUEST,
        RegistryError::ExportForbidden => StatusCode::FORBIDDEN,
        RegistryError::NotSignedIn => StatusCode::UNAUTHORIZED,
        RegistryError::Remote(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Translate a domain error into a JSON error response
pub fn error_response(err: RegistryError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("❌ {}", err);
    } else {
        warn!("Request rejected ({}): {}", status.as_u16(), err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
