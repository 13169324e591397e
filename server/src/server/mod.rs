//! HTTP application assembly

mod app;
mod ops;

pub use app::{AppState, build_app};
pub use ops::{HealthResponse, install_prometheus_recorder};
