//! RSVP CORS Proxy
//!
//! Sits between the browser and the Google Apps Script web app that stores
//! RSVPs, answering CORS preflights itself and forwarding list/create calls
//! with the content type Apps Script accepts.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 RSVP PROXY                   │
//!   Browser request        │  ┌────────┐   ┌────────┐   ┌─────────────┐   │
//!   ───────────────────────┼─▶│  cors  │──▶│ router │──▶│ normalizer  │   │
//!                          │  │  gate  │   │        │   │ (request.rs)│   │
//!                          │  └───┬────┘   └────────┘   └──────┬──────┘   │
//!                          │      │ OPTIONS → 200                ▼          │
//!                          │      ▼                       ┌─────────────┐   │
//!   Browser response       │  ┌────────────┐              │  upstream   │───┼──▶ Apps Script
//!   ◀──────────────────────┼──│ translator │◀─────────────│  backend    │◀──┼───
//!                          │  └────────────┘              └─────────────┘   │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use rsvp_cors_proxy::config::{load_config, Cli};
use rsvp_cors_proxy::lifecycle;
use rsvp_cors_proxy::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Nothing is bound until the configuration is known to be usable.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::info!("rsvp-cors-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = lifecycle::start(config).await {
        tracing::error!(error = %e, "Proxy terminated");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
