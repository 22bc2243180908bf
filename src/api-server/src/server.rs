//! HTTP server setup and lifecycle management

use crate::{routes, state::AppState};
use anyhow::{Context, Result};
use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    pub port: u16,
    /// Requests in flight across the whole server
    pub max_connections: usize,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_connections: 10000,
            request_timeout: 30,
        }
    }
}

/// Apply the request timeout and the server-wide concurrency limit
///
/// `Router::layer` wraps every route separately, so the limit must share one
/// semaphore between all of them.
pub fn with_limits(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(GlobalConcurrencyLimitLayer::new(config.max_connections))
}

/// HTTP server instance
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Application router with the server-level limits applied
    pub fn router(&self) -> Router {
        with_limits(routes::create_router(self.state.clone()), &self.config)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve until SIGINT or SIGTERM, then drain open connections
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!(
            addr = %listener.local_addr()?,
            max_connections = self.config.max_connections,
            request_timeout = self.config.request_timeout,
            "User directory listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on the first shutdown signal; a handler that cannot be
/// installed never fires
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("SIGINT received, draining connections"),
        _ = terminate => info!("SIGTERM received, draining connections"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use std::time::Instant;
    use tower::ServiceExt;
    use userdir_authz::{EngineConfig, SeedData};

    fn test_state() -> AppState {
        AppState::from_seed(EngineConfig::default(), SeedData::builtin()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(150)).await;
        "OK"
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 10000);
        assert_eq!(config.request_timeout, 30);
    }

    #[tokio::test]
    async fn test_router_with_limits() {
        let server = Server::new(
            ServerConfig {
                max_connections: 1,
                request_timeout: 5,
                ..ServerConfig::default()
            },
            test_state(),
        );
        assert_eq!(server.config().max_connections, 1);

        let response = server.router().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_concurrency_limit_spans_routes() {
        let config = ServerConfig {
            max_connections: 1,
            ..ServerConfig::default()
        };
        let app = with_limits(
            Router::new().route("/a", get(slow)).route("/b", get(slow)),
            &config,
        );

        let start = Instant::now();
        let (a, b) = tokio::join!(
            app.clone().oneshot(get_request("/a")),
            app.clone().oneshot(get_request("/b")),
        );
        let elapsed = start.elapsed();

        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);
        assert!(elapsed >= Duration::from_millis(290), "ran in parallel: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_requests_run_concurrently_under_limit() {
        let config = ServerConfig {
            max_connections: 2,
            ..ServerConfig::default()
        };
        let app = with_limits(
            Router::new().route("/a", get(slow)).route("/b", get(slow)),
            &config,
        );

        let start = Instant::now();
        let (a, b) = tokio::join!(
            app.clone().oneshot(get_request("/a")),
            app.clone().oneshot(get_request("/b")),
        );

        assert_eq!(a.unwrap().status(), StatusCode::OK);
        assert_eq!(b.unwrap().status(), StatusCode::OK);
        assert!(start.elapsed() < Duration::from_millis(290));
    }
}
