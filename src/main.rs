use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinefind::{
    api::{cors_layer, create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinefind=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    // Initialize application state
    let state = AppState::from_config(&config)?;

    // Create the router with all routes
    let mut app = create_router(state);
    let origins = config.origins();
    if !origins.is_empty() {
        tracing::info!(origins = ?origins, "CORS enabled");
        app = app.layer(cors_layer(&origins));
    }

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
