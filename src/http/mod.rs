//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → cors.rs (OPTIONS answered here, never forwarded)
//!     → server.rs handlers (/api/rsvp, /health, 404 fallback)
//!     → request.rs (normalize for the upstream)
//!     → [upstream backend]
//!     → response.rs (translate into an envelope)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{Envelope, ProxyError};
pub use server::{AppState, HttpServer, ServerError};
