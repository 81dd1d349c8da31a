//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, body limit, panics)
//! - Bind server to listener
//! - Forward RSVP requests to the configured backend
//! - Shut down gracefully on signal

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::cors;
use crate::http::request::{self, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::{self, ProxyError};
use crate::observability::metrics;
use crate::upstream::{Backend, BackendError, UpstreamMethod};

/// Name reported by the liveness probe.
pub const SERVICE_NAME: &str = "rsvp-cors-proxy";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub config: Arc<ProxyConfig>,
}

/// Errors that prevent the server from being built.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("invalid allowed origin: {0}")]
    Origin(#[from] axum::http::header::InvalidHeaderValue),
}

/// HTTP server for the RSVP proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let backend = Backend::from_config(&config)?;
        Self::with_backend(config, backend)
    }

    /// Create a server around an already-built backend.
    pub fn with_backend(config: ProxyConfig, backend: Backend) -> Result<Self, ServerError> {
        tracing::info!(backend = %backend.describe(), "Upstream backend ready");

        let config = Arc::new(config);
        let state = AppState {
            backend,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Result<Router, ServerError> {
        // `get` also answers HEAD; only GET and POST reach the upstream.
        let rsvp = get(list_rsvps)
            .post(create_rsvp)
            .head(method_not_allowed)
            .fallback(method_not_allowed);

        Ok(Router::new()
            .route("/api/rsvp", rsvp)
            .route("/health", get(health).fallback(not_found))
            .fallback(not_found)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(cors::layer(&config.cors)?)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)))
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    service: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

async fn list_rsvps(State(state): State<AppState>, headers: HeaderMap) -> Response {
    forward(&state, UpstreamMethod::Get, &headers, Bytes::new()).await
}

async fn create_rsvp(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => forward(&state, UpstreamMethod::Post, &headers, body).await,
        Err(rejection) => {
            tracing::warn!(
                request_id = %request::request_id(&headers),
                error = %rejection,
                "Rejected inbound body"
            );
            let response = ProxyError::from(rejection).into_response();
            metrics::record_request("POST", response.status().as_u16());
            response
        }
    }
}

/// Normalize, forward once, translate.
async fn forward(state: &AppState, method: UpstreamMethod, headers: &HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(headers);

    tracing::info!(request_id = %request_id, method = method.as_str(), "/api/rsvp");

    let outbound = request::normalize(method, headers, body);
    let outcome = state.backend.forward(outbound).await;
    let response = response::translate(outcome);

    tracing::info!(
        request_id = %request_id,
        method = method.as_str(),
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(method.as_str(), response.status().as_u16());

    response
}

async fn not_found() -> ProxyError {
    ProxyError::NotFound
}

async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Unhandled error");

    ProxyError::Internal.into_response()
}
