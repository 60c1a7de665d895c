use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use telemetry::TargetRegistry;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    targets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Reports how many targets the registry currently holds. Returns 503 if the
/// registry file cannot be loaded. Never contacts the stations.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match TargetRegistry::load_or_builtin(state.registry_path.as_deref()) {
        Ok(registry) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                targets: registry.len(),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "error".to_string(),
                targets: 0,
                error: Some(e.to_string()),
            }),
        ),
    }
}
