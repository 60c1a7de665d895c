//! Application setup and server configuration.

use std::path::PathBuf;

use axum::{extract::Extension, http::Method, routing::get, Router};
use telemetry::{Pipeline, PipelineContext};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{health_handler, report_json_handler, report_page_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Registry file, re-read on every request. `None` means the built-in stations.
    pub registry_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, registry_path: Option<PathBuf>) -> Self {
        Self {
            pipeline,
            registry_path,
        }
    }

    /// Build the HTTP-backed state described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let context = PipelineContext::http(config.fetch_policy.clone(), config.executor)?
            .with_aggregate_fields(config.aggregate_fields.clone());

        Ok(Self::new(
            Pipeline::new(context),
            config.targets_file.clone(),
        ))
    }
}

/// Build the Axum application router
pub fn build_app(app_state: AppState) -> Router {
    // Read-only API, any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(report_page_handler))
        .route("/api/report", get(report_json_handler))
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
