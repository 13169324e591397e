use spa_host_server::config::Config;
use spa_host_server::server::{AppState, build_app, install_prometheus_recorder};
use spa_host_server::static_host::StaticHost;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve once Ctrl-C (or SIGTERM on unix) is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "spa_host=debug,spa_host_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}",
        config.host, config.port
    );

    let static_dir = &config.static_files.dir;
    if !static_dir.is_dir() {
        warn!(
            "Static files directory {:?} does not exist - every request will fail until it does",
            static_dir
        );
    }

    let host = Arc::new(StaticHost::new(&config.static_files));
    if !host.entry_path().is_file() {
        warn!(
            "Entry document {:?} is missing - requests will get a server error",
            host.entry_path()
        );
    }
    info!("Serving static files from: {:?}", static_dir);

    let mut app_state = AppState::new(host);
    if config.ops_endpoints {
        // Must be installed before any metrics are recorded
        app_state = app_state.with_prometheus(install_prometheus_recorder()?);
    }

    let app = build_app(&config, app_state);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Frontend listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
