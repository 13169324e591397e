//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use spa_host_server::config::{Config, StaticFilesConfig};
use spa_host_server::{AppState, StaticHost, build_app};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const INDEX_HTML: &str =
    r#"<!doctype html><html><body><div id="app"></div><script src="/assets/app.abcd1234.js"></script></body></html>"#;
pub const APP_JS: &str = "console.log('app');";

/// A build directory shaped like a bundler's output
pub struct TestDist {
    pub dir: TempDir,
}

impl TestDist {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(dir.path().join("assets/app.abcd1234.js"), APP_JS).unwrap();
        std::fs::write(dir.path().join("assets/style.ef56.css"), "body{margin:0}").unwrap();
        std::fs::write(dir.path().join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        std::fs::write(self.path().join(relative), contents).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path().join(relative)).unwrap();
    }
}

pub fn test_config(dist: &Path) -> Config {
    Config {
        static_files: StaticFilesConfig {
            dir: dist.to_path_buf(),
            compression: false,
            ..StaticFilesConfig::default()
        },
        ..Config::default()
    }
}

/// Create a test application router serving `dist`
pub fn create_test_app(config: &Config) -> Router {
    let host = Arc::new(StaticHost::new(&config.static_files));
    build_app(config, AppState::new(host))
}

/// Build an unsigned compact token carrying `claims` as its payload
pub fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

/// Initialize test logging for detailed output
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spa_host_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
