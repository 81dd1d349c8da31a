//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the upstream client produce:
//!     → logging.rs (structured log events, request ID in every line)
//!     → metrics.rs (request counters, upstream latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Raw upstream bodies are logged on parse failure, never returned
//! - Metric updates without an installed recorder are no-ops

pub mod logging;
pub mod metrics;
