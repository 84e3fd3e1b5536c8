//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router forwarding everything to the upstream origin
//! - Wire up middleware (tracing, timeout, body limit, security shield)
//! - Serve on a listener until shutdown is signalled

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::middleware::shield::{protect, ShieldState};
use crate::http::upstream::{forward_handler, Upstream, UpstreamError};
use crate::security::{EventSink, RuleError, StdoutSink};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("rule compilation failed: {0}")]
    Rules(#[from] RuleError),

    #[error("upstream misconfigured: {0}")]
    Upstream(#[from] UpstreamError),
}

/// The edge filter: shield in front of a forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server that writes security events to standard output.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: AppConfig, sink: Arc<dyn EventSink>) -> Result<Self, ServerError> {
        let shield = ShieldState::with_sink(&config, sink)?;
        let upstream = Upstream::new(&config.upstream)?;

        tracing::info!(
            upstream = %upstream.authority(),
            honeypot_delay_ms = config.shield.honeypot_delay_ms,
            exclusions = shield.exclusions.globs().len(),
            "Shield configured"
        );

        let router = Self::build_router(&config, shield, upstream);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers wrap outward: tracing sees every request, the timeout covers
    /// the honeypot delay, and the shield runs before the upstream handler.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, shield: ShieldState, upstream: Upstream) -> Router {
        let routes = Router::new()
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(upstream);

        protect(routes, shield)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
