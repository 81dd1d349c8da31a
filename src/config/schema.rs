//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Origin value meaning "any origin".
pub const WILDCARD_ORIGIN: &str = "*";

/// Root configuration for the RSVP proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Upstream script endpoint settings.
    pub upstream: UpstreamConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Largest accepted inbound request body, in bytes.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    /// Full socket address string, e.g. "0.0.0.0:8080".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Which store answers RSVP requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Forward to the Apps Script endpoint.
    #[default]
    Remote,
    /// Keep records in process memory (local development only).
    InMemory,
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Apps Script web app URL. Required in remote mode.
    pub url: Option<String>,

    /// Backend selection.
    pub mode: BackendMode,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Whole-request timeout (send + response body) in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            mode: BackendMode::Remote,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin, or "*" for any.
    pub allowed_origin: String,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origin == WILDCARD_ORIGIN
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: WILDCARD_ORIGIN.to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address; exporter disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
