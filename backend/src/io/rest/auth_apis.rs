//! # REST API for Authentication

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{ErrorResponse, SignInRequest};

use super::error_response;
use crate::domain::RegistryError;
use crate::AppState;

/// Create a router for authentication APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/me", get(current_user))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/sign-in - email: {}", request.email.trim());

    match state.access.sign_in(&request.email, &request.password).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        // The provider's own message is meant for the user
        Err(RegistryError::Remote(e)) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse { error: e.to_string() }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/sign-out");

    match state.access.sign_out().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn current_user(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/auth/me");

    match state.access.current_user().await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => error_response(RegistryError::NotSignedIn),
        Err(e) => error_response(e),
    }
}
