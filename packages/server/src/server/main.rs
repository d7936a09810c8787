// Main entry point for the employer enrichment server

use std::sync::Arc;

use anyhow::{Context, Result};
use enricher_core::domains::employers::EmployerReconciler;
use enricher_core::kernel::start_scheduler;
use enricher_core::server::{build_app, build_server_deps, AppState};
use enricher_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,enricher_core=debug,jboard_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Employer Enricher");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        directory = %config.jboard_api_url,
        model = %config.openai_model,
        page_size = config.page_size,
        concurrency = config.concurrency,
        "Configuration loaded"
    );

    let deps = build_server_deps(&config)?;
    let reconciler = Arc::new(EmployerReconciler::new(deps, config.reconcile_options()));

    // Scheduler must stay alive for the lifetime of the server
    let _scheduler = start_scheduler(reconciler.clone(), config.schedule())
        .await
        .context("Failed to start scheduler")?;

    let app = build_app(AppState {
        reconciler,
        page_size: config.page_size,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server is running on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
