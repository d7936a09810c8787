//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::Extension, routing::get, Router};
use jboard_client::JBoardClient;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::employers::EmployerReconciler;
use crate::kernel::{JBoardAdapter, OpenAIClient, ServerDeps};
use crate::server::routes::{health_handler, list_employers_handler, update_employers_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<EmployerReconciler>,
    /// Page size used when a request does not pass `per_page`
    pub page_size: u32,
}

/// Wire the real JBoard and OpenAI clients into ServerDeps.
pub fn build_server_deps(config: &Config) -> anyhow::Result<ServerDeps> {
    let jboard = JBoardClient::new(config.jboard_api_url.clone(), config.jboard_api_key.clone())
        .context("Failed to create JBoard client")?;
    let openai = OpenAIClient::new(config.openai_api_key.clone())
        .context("Failed to create OpenAI client")?
        .with_base_url(config.openai_base_url.clone())
        .with_model(config.openai_model.clone());

    Ok(ServerDeps::new(
        Arc::new(JBoardAdapter::new(Arc::new(jboard))),
        Arc::new(openai),
    ))
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/employers", get(list_employers_handler))
        .route("/api/update-employers", get(update_employers_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
