//! RSVP CORS proxy library.
//!
//! A single-route adapter between the invitation page and the Apps Script
//! endpoint that stores RSVPs.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
