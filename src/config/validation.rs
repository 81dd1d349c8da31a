//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require an upstream URL unless the in-memory backend was chosen
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that the allowed origin can be sent as a header value
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::{BackendMode, ProxyConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream URL is not set (APPS_SCRIPT_URL)")]
    MissingUpstreamUrl,

    #[error("upstream URL '{url}' is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("allowed origin '{0}' is not a valid header value")]
    InvalidOrigin(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (&config.upstream.url, config.upstream.mode) {
        (Some(raw), _) => {
            if let Err(e) = check_upstream_url(raw) {
                errors.push(e);
            }
        }
        (None, BackendMode::Remote) => errors.push(ValidationError::MissingUpstreamUrl),
        (None, BackendMode::InMemory) => {}
    }

    if config.upstream.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.connect_timeout_ms" });
    }
    if config.upstream.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue { field: "upstream.request_timeout_ms" });
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "listener.max_body_bytes" });
    }

    let origin = &config.cors.allowed_origin;
    if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
        errors.push(ValidationError::InvalidOrigin(origin.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUpstreamUrl {
        url: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(ValidationError::MissingUpstreamUrl);
    }

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
