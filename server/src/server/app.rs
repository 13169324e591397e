use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::ops::{health, prometheus_metrics};
use crate::config::Config;
use crate::static_host::{StaticHost, static_routes};

/// Shared state for the operational endpoints
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<StaticHost>,
    pub started_at: Instant,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(host: Arc<StaticHost>) -> Self {
        Self {
            host,
            started_at: Instant::now(),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

/// Build the full router: application files, plus the ops routes when enabled
pub fn build_app(config: &Config, state: AppState) -> Router {
    let app = static_routes(Arc::clone(&state.host));

    let app = if config.ops_endpoints {
        info!("Operational endpoints enabled at /health and /metrics/prometheus");
        Router::new()
            .route("/health", get(health))
            .route("/metrics/prometheus", get(prometheus_metrics))
            .with_state(state)
            .merge(app)
    } else {
        app
    };

    let app = if config.static_files.compression {
        app.layer(CompressionLayer::new())
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}
