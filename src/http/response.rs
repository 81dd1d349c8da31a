//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn an upstream response or transport failure into a client response
//! - Map every locally produced error to a `{success:false, error}` envelope
//! - Keep upstream diagnostics in the logs, out of the client body
//!
//! # Decision Table
//! ```text
//! ForwardError::Timeout  → 504 "Gateway timeout: Apps Script did not respond in time"
//! ForwardError::Connect  → 502 "Bad gateway: Unable to connect to Apps Script"
//! body is not JSON       → 502 "Invalid response from Apps Script: not valid JSON"
//! body is JSON           → upstream status, body bytes passed through unmodified
//! ForwardError::Other    → 500 "Proxy error: <message>"
//! ```

use axum::extract::rejection::BytesRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::upstream::{ForwardError, UpstreamResponse};

/// Longest slice of an unparseable upstream body written to the logs.
const MAX_LOGGED_BODY: usize = 2048;

const JSON_CONTENT_TYPE: &str = "application/json";

/// The `{success, data|error}` wrapper every client response satisfies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Client-facing error categories. `Display` is the exact message sent.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Failed to read request body")]
    UnreadableBody(StatusCode),

    #[error("Gateway timeout: Apps Script did not respond in time")]
    GatewayTimeout,

    #[error("Bad gateway: Unable to connect to Apps Script")]
    BadGateway,

    #[error("Invalid response from Apps Script: not valid JSON")]
    InvalidUpstreamJson,

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Internal server error")]
    Internal,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::UnreadableBody(status) => *status,
            ProxyError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::BadGateway | ProxyError::InvalidUpstreamJson => StatusCode::BAD_GATEWAY,
            ProxyError::Proxy(_) | ProxyError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(Envelope::failure(self.to_string()))).into_response()
    }
}

impl From<ForwardError> for ProxyError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::Timeout(_) => ProxyError::GatewayTimeout,
            ForwardError::Connect(_) => ProxyError::BadGateway,
            ForwardError::Other(message) => ProxyError::Proxy(message),
        }
    }
}

impl From<BytesRejection> for ProxyError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ProxyError::PayloadTooLarge,
            status => ProxyError::UnreadableBody(status),
        }
    }
}

/// Convert the outcome of one forwarding attempt into the client response.
pub fn translate(outcome: Result<UpstreamResponse, ForwardError>) -> Response {
    match outcome {
        Ok(upstream) => translate_upstream(upstream),
        Err(err) => ProxyError::from(err).into_response(),
    }
}

fn translate_upstream(upstream: UpstreamResponse) -> Response {
    // Validate only; the body goes out exactly as received.
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&upstream.body) {
        let raw = String::from_utf8_lossy(&upstream.body);
        tracing::error!(
            status = upstream.status,
            error = %e,
            raw = %truncate(&raw, MAX_LOGGED_BODY),
            "Failed to parse Apps Script response as JSON"
        );
        return ProxyError::InvalidUpstreamJson.into_response();
    }

    match StatusCode::from_u16(upstream.status) {
        Ok(status) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            upstream.body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(status = upstream.status, error = %e, "Upstream returned an unusable status code");
            ProxyError::Proxy(e.to_string()).into_response()
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
