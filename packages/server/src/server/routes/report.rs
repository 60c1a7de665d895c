use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use telemetry::{PipelineError, Report, TargetRegistry};
use tracing::{error, info};

use crate::server::app::AppState;
use crate::server::render::render_page;

/// Load the registry and run the pipeline for one request.
async fn build_report(state: &AppState) -> Result<(Report, TargetRegistry), PipelineError> {
    let registry = TargetRegistry::load_or_builtin(state.registry_path.as_deref())?;
    let report = state.pipeline.report(&registry).await?;

    info!(
        targets = report.results.len(),
        failed = report.failed_count(),
        "Report served"
    );

    Ok((report, registry))
}

fn config_failure(e: PipelineError) -> (StatusCode, String) {
    error!(error = %e, "Report could not be built");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// `GET /` - the report as an HTML page
pub async fn report_page_handler(Extension(state): Extension<AppState>) -> Response {
    match build_report(&state).await {
        Ok((report, registry)) => Html(render_page(&report, registry.tag())).into_response(),
        Err(e) => config_failure(e).into_response(),
    }
}

/// `GET /api/report` - the report as JSON
pub async fn report_json_handler(Extension(state): Extension<AppState>) -> Response {
    match build_report(&state).await {
        Ok((report, _)) => Json(report).into_response(),
        Err(e) => {
            let (status, message) = config_failure(e);
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}
