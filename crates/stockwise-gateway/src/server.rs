//! HTTP server.

use crate::error::GatewayError;
use crate::handlers::{health_handler, index_handler, search_handler, AppState};
use crate::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use stockwise_core::config::ServerConfig;
use stockwise_rag::QueryService;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen host.
    pub host: String,

    /// Port number.
    pub port: u16,

    /// Enable CORS.
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors: true,
        }
    }
}

impl From<&ServerConfig> for GatewayConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            cors: config.cors,
        }
    }
}

/// The HTTP gateway.
pub struct Gateway {
    config: GatewayConfig,
    state: AppState,
}

impl Gateway {
    /// Create a gateway around a ready query service.
    pub fn new(config: GatewayConfig, service: Arc<QueryService>) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(GatewayError::Io)?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        if !addr.ip().is_loopback() {
            warn!("Serving on {} without authentication", addr);
        }
        info!("Starting gateway server on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        info!("Gateway server stopped");
        Ok(())
    }

    /// Create the Axum router.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/rag-inventory-search", post(search_handler))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(Self::create_cors_layer());
        }

        router
    }

    /// Allow any origin, method, and header.
    fn create_cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
