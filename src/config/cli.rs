//! Command-line flags and environment overrides.
//!
//! Every flag has an environment fallback so the proxy can be configured
//! purely through the container environment.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{BackendMode, LogFormat, ProxyConfig};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "rsvp-cors-proxy")]
#[command(version, about = "CORS proxy in front of the Apps Script RSVP endpoint", long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file, applied before flags.
    #[arg(short, long, env = "PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Apps Script web app URL.
    #[arg(long, env = "APPS_SCRIPT_URL")]
    pub upstream_url: Option<String>,

    /// Origin allowed to call the proxy ("*" for any).
    #[arg(long, env = "ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,

    /// Bind host.
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Listening port.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Upstream request timeout in milliseconds.
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS")]
    pub upstream_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Prometheus exporter bind address, e.g. "0.0.0.0:9090".
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,

    /// Serve RSVPs from process memory instead of Apps Script.
    #[arg(long, env = "RSVP_IN_MEMORY", value_parser = clap::builder::FalseyValueParser::new())]
    pub in_memory: bool,
}

impl Cli {
    /// Layer flag values on top of a base configuration.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(url) = &self.upstream_url {
            config.upstream.url = Some(url.clone());
        }
        if let Some(origin) = &self.allowed_origin {
            config.cors.allowed_origin = origin.clone();
        }
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(timeout) = self.upstream_timeout_ms {
            config.upstream.request_timeout_ms = timeout;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
        if self.in_memory {
            config.upstream.mode = BackendMode::InMemory;
        }
    }
}
