// Main entry point for the telemetry report server

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, AppState},
    Config,
};
use telemetry::TargetRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telemetry=debug,server=debug,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Solar Telemetry server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        executor = ?config.executor,
        timeout = ?config.fetch_policy.timeout,
        max_attempts = config.fetch_policy.max_attempts,
        "Configuration loaded"
    );

    // Refuse to start on a broken registry; it is re-read per request afterwards
    let registry = TargetRegistry::load_or_builtin(config.targets_file.as_deref())
        .context("Failed to load target registry")?;
    tracing::info!(targets = registry.len(), tag = registry.tag(), "Registry loaded");

    // Build application
    let app = build_app(AppState::from_config(&config).context("Failed to build pipeline")?);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Report page: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
