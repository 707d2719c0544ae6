//! # Student Registry Backend
//!
//! Non-UI logic for the student registry screen.
//!
//! ## Architecture
//!
//! ```text
//! Presentation client
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (list controller, writers, export)
//!     ↓
//! Storage Layer (student store, auth provider)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RegistryConfig;
use crate::domain::{AccessService, ListController};
use crate::storage::{AuthProvider, InMemoryAuthProvider, SqliteStudentStore, StudentStore};

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// The one controller behind the screen; handlers take turns on it
    pub controller: Arc<Mutex<ListController>>,
    pub access: AccessService,
}

/// Wire a controller over the given collaborators
pub fn build_app_state(
    store: Arc<dyn StudentStore>,
    auth: Arc<dyn AuthProvider>,
    config: &RegistryConfig,
) -> Result<AppState> {
    let access = AccessService::new(auth, config.privileged_email.clone());
    let controller = ListController::new(store, access.clone())
        .with_page_size(config.default_page_size)?
        .with_export_filename(&config.export_filename);

    Ok(AppState {
        controller: Arc::new(Mutex::new(controller)),
        access,
    })
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &RegistryConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let store = SqliteStudentStore::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;

    info!("Setting up auth provider with {} account(s)", config.accounts.len());
    let auth = InMemoryAuthProvider::new(config.auth_accounts());

    info!("Setting up application state");
    let state = build_app_state(Arc::new(store), Arc::new(auth), config)?;

    // First page before the first request
    state.controller.lock().await.reload().await?;
    Ok(state)
}

/// Router with every API under `/api`, plus CORS when an origin is configured
pub fn build_router(state: AppState, config: &RegistryConfig) -> Result<Router> {
    let mut app = Router::new().nest("/api", io::rest::router());

    if let Some(origin) = &config.cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid cors_origin {:?}", origin))?,
            )
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any);
        app = app.layer(cors);
    }

    Ok(app.with_state(state))
}
