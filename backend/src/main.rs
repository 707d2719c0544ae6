use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use student_registry::config::RegistryConfig;
use student_registry::{build_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = RegistryConfig::path_from_env();
    let config = RegistryConfig::load(&config_path)?;
    if config.privileged_email.is_none() {
        info!("No privileged_email configured, CSV export is disabled");
    }

    let state = initialize_backend(&config).await?;
    let app = build_router(state, &config)?;

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
