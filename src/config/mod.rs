//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (ProxyConfig::default)
//!     → optional TOML file (loader.rs)
//!     → flags / environment (cli.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to the handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A missing upstream URL is fatal: the process exits before binding

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{BackendMode, CorsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, UpstreamConfig};
