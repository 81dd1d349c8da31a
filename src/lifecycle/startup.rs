//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when configured
//! - Build the backend and router
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the proxy with an already validated configuration until a shutdown
/// signal arrives.
pub async fn start(config: ProxyConfig) -> Result<(), StartupError> {
    if let Some(raw) = &config.observability.metrics_address {
        let addr: SocketAddr = raw
            .parse()
            .map_err(|_| StartupError::MetricsAddress(raw.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    tracing::info!(
        address = %address,
        allowed_origin = %server.config().cors.allowed_origin,
        request_timeout_ms = server.config().upstream.request_timeout_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address: address.clone(), source })?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
