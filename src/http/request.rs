//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Classify the inbound body (raw text vs. declared JSON)
//! - Prepare request for forwarding to the upstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The outbound content type is always plain text, whatever the inbound
//!   body looks like
//! - Malformed bodies are never rejected here; the upstream decides

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::upstream::{OutboundRequest, UpstreamMethod};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a fresh UUID v4 for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the correlation ID set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Inbound body as the client declared it.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundBody {
    /// Anything not declared JSON, or declared JSON that failed to parse.
    Raw(Bytes),
    /// Declared `application/json` and parsed successfully.
    Structured(serde_json::Value),
}

impl InboundBody {
    pub fn classify(content_type: Option<&HeaderValue>, body: Bytes) -> Self {
        if declares_json(content_type) {
            if let Ok(value) = serde_json::from_slice(&body) {
                return InboundBody::Structured(value);
            }
        }
        InboundBody::Raw(body)
    }

    /// Bytes to put on the wire; `None` for an empty body.
    fn into_wire(self) -> Option<Bytes> {
        let bytes = match self {
            InboundBody::Raw(bytes) => bytes,
            // Serializing a Value cannot fail (keys are always strings).
            InboundBody::Structured(value) => Bytes::from(value.to_string()),
        };
        (!bytes.is_empty()).then_some(bytes)
    }
}

fn declares_json(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Shape an inbound GET or POST for the upstream.
pub fn normalize(method: UpstreamMethod, headers: &HeaderMap, body: Bytes) -> OutboundRequest {
    match method {
        UpstreamMethod::Get => OutboundRequest::get(),
        UpstreamMethod::Post => {
            let inbound = InboundBody::classify(headers.get(header::CONTENT_TYPE), body);
            OutboundRequest {
                method,
                body: inbound.into_wire(),
            }
        }
    }
}
