//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (from http::request::normalize)
//!     → Backend::forward
//!         Remote   → client.rs (one reqwest call to Apps Script)
//!         InMemory → memory.rs (local store speaking the same contract)
//!     → Result<UpstreamResponse, ForwardError>
//!     → http::response::translate
//! ```
//!
//! # Design Decisions
//! - Backend is chosen once at startup; there is no silent fallback
//! - Transport failures are classified here, never surfaced raw
//! - Single attempt per request, no retries

pub mod client;
pub mod memory;

use std::time::Duration;

use axum::body::Bytes;
use axum::http::Method;
use thiserror::Error;

use crate::config::{BackendMode, ProxyConfig};

pub use client::RemoteBackend;
pub use memory::InMemoryBackend;

/// The only content type ever declared to the upstream. Apps Script cannot
/// answer a preflight, and `text/plain` keeps the request "simple".
pub const OUTBOUND_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Methods the upstream understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    Get,
    Post,
}

impl UpstreamMethod {
    pub fn as_method(self) -> Method {
        match self {
            UpstreamMethod::Get => Method::GET,
            UpstreamMethod::Post => Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpstreamMethod::Get => "GET",
            UpstreamMethod::Post => "POST",
        }
    }
}

/// A request shaped for the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: UpstreamMethod,
    /// Present only for POST with a non-empty inbound body.
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn get() -> Self {
        Self { method: UpstreamMethod::Get, body: None }
    }

    pub fn content_type(&self) -> &'static str {
        OUTBOUND_CONTENT_TYPE
    }
}

/// What came back from the upstream, before any interpretation.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Transport-level outcome of a forwarding attempt that produced no response.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// No complete response before the request deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Connection could not be established or was dropped before a response.
    #[error("connection to upstream failed: {0}")]
    Connect(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Errors building a backend at startup.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("upstream URL is not set")]
    MissingUrl,

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where RSVP requests are answered.
#[derive(Debug, Clone)]
pub enum Backend {
    Remote(RemoteBackend),
    InMemory(InMemoryBackend),
}

impl Backend {
    /// Build the backend selected by configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, BackendError> {
        match config.upstream.mode {
            BackendMode::Remote => {
                let url = config.upstream.url.as_deref().ok_or(BackendError::MissingUrl)?;
                Ok(Backend::Remote(RemoteBackend::new(url, &config.upstream)?))
            }
            BackendMode::InMemory => Ok(Backend::InMemory(InMemoryBackend::new())),
        }
    }

    /// Send one request and wait for the outcome.
    pub async fn forward(&self, request: OutboundRequest) -> Result<UpstreamResponse, ForwardError> {
        match self {
            Backend::Remote(remote) => remote.forward(request).await,
            Backend::InMemory(memory) => memory.forward(request).await,
        }
    }

    /// Short description for startup logs.
    pub fn describe(&self) -> String {
        match self {
            Backend::Remote(remote) => format!("remote {}", remote.display_url()),
            Backend::InMemory(_) => "in-memory".to_string(),
        }
    }
}
