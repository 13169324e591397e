//! Health and metrics endpoints

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};

use super::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub static_dir: String,
    pub entry_document: String,
    pub uptime_seconds: u64,
}

/// GET /health - healthy only while the entry document is present
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let entry_path = state.host.entry_path();
    let entry_ready = tokio::fs::metadata(&entry_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);

    let (http_status, status, entry_status) = if entry_ready {
        (StatusCode::OK, "healthy", "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "missing")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            static_dir: state.host.root().display().to_string(),
            entry_document: entry_status.to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
        }),
    )
}

/// GET /metrics/prometheus - Prometheus text exposition
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder not installed").into_response(),
    }
}

/// Install the global Prometheus recorder
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
