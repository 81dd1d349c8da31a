//! CORS policy gate.
//!
//! Every response carries `Access-Control-Allow-Origin` for the configured
//! origin. Any OPTIONS request is answered by the layer itself with an empty
//! 200 plus the allowed methods, headers and max-age, so preflights never
//! reach the router or the upstream.

use std::time::Duration;

use axum::http::header::{HeaderValue, InvalidHeaderValue, CONTENT_TYPE};
use axum::http::Method;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Methods the RSVP route accepts from browsers.
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Build the CORS layer for the configured origin.
pub fn layer(config: &CorsConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(&config.allowed_origin)?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age_secs)))
}
