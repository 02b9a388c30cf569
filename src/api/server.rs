use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, settings, status, AppState};
use crate::monitor::{ConfigError, MonitorConfig, Notifier, Scheduler};
use crate::report::{StatusBoard, TracingSink};
use crate::source::HttpFareSource;

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub monitor: MonitorConfig,
}

impl ServiceConfig {
    /// Read `FAREWATCH_HOST`, `FAREWATCH_PORT` and the monitor settings from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("FAREWATCH_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("FAREWATCH_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::invalid("FAREWATCH_PORT", &raw, e))?,
            None => 8080,
        };

        Ok(Self {
            host,
            port,
            monitor: MonitorConfig::from_lookup(&lookup)?,
        })
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Monitor status
        .route("/status", get(status))
        .route("/settings", get(settings))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the fare monitor and its status server until Ctrl-C
pub async fn run_service(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let monitor = config.monitor;
    monitor.validate()?;

    let board = Arc::new(StatusBoard::new());
    let source = HttpFareSource::with_timeout(Duration::from_secs(monitor.fetch_timeout_secs))?;
    let notifier = Notifier::new(monitor.targets.clone());

    let state = Arc::new(AppState {
        board: Arc::clone(&board),
        config: Arc::new(monitor.clone()),
    });

    // Start the polling loop
    let scheduler = Scheduler::new(monitor, Arc::new(source), Arc::new(notifier))
        .with_sink(Arc::new(TracingSink))
        .with_sink(board);
    let handle = scheduler.start();

    // Build router
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting status server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Waiting for the current check to finish...");
    let tracker = handle.stop().await?;
    if let Some(last) = tracker.read() {
        tracing::info!(
            outbound = ?last.outbound,
            inbound = ?last.inbound,
            "Last committed fares"
        );
    }

    tracing::info!("Farewatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
        return;
    }
    tracing::info!("Shutdown signal received, stopping monitor...");
}
