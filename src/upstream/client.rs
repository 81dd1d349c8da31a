//! Forwarding client for the Apps Script endpoint.
//!
//! # Responsibilities
//! - Send exactly one request per inbound call to the fixed upstream URL
//! - Declare `text/plain;charset=utf-8` on every request
//! - Enforce connect and whole-request deadlines
//! - Classify transport failures (timeout vs. connection failure)
//! - Log elapsed time; never return it to the client
//!
//! # Design Decisions
//! - Redirects are followed: Apps Script answers through a 302 to
//!   googleusercontent.com
//! - A connect timeout counts as a connection failure, not a gateway timeout

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::{BackendError, ForwardError, OutboundRequest, UpstreamResponse};

/// Reqwest-backed client bound to a single upstream URL.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    url: Url,
    request_timeout: Duration,
}

impl RemoteBackend {
    pub fn new(url: &str, config: &UpstreamConfig) -> Result<Self, BackendError> {
        let url = Url::parse(url)?;
        let request_timeout = Duration::from_millis(config.request_timeout_ms);

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client, url, request_timeout })
    }

    /// URL safe for logs: the query string (which may carry keys) is dropped.
    pub fn display_url(&self) -> String {
        let mut shown = self.url.clone();
        shown.set_query(None);
        shown.set_fragment(None);
        shown.to_string()
    }

    pub async fn forward(&self, request: OutboundRequest) -> Result<UpstreamResponse, ForwardError> {
        let start = Instant::now();
        let method = request.method;

        let mut builder = self
            .client
            .request(method.as_method(), self.url.clone())
            .header(CONTENT_TYPE, request.content_type());
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        tracing::debug!(
            method = method.as_str(),
            upstream = %self.display_url(),
            "Forwarding request to Apps Script"
        );

        let result = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse { status, body })
        }
        .await;

        let elapsed = start.elapsed();
        match result {
            Ok(response) => {
                tracing::info!(
                    method = method.as_str(),
                    status = response.status,
                    duration_ms = elapsed.as_millis() as u64,
                    "Apps Script responded"
                );
                metrics::record_upstream("response", elapsed);
                Ok(response)
            }
            Err(e) => {
                let err = self.classify(&e);
                tracing::error!(
                    method = method.as_str(),
                    duration_ms = elapsed.as_millis() as u64,
                    error = %e,
                    classified = %err,
                    "Error forwarding request"
                );
                metrics::record_upstream(outcome_label(&err), elapsed);
                Err(err)
            }
        }
    }

    fn classify(&self, err: &reqwest::Error) -> ForwardError {
        if err.is_connect() {
            ForwardError::Connect(err.to_string())
        } else if err.is_timeout() {
            ForwardError::Timeout(self.request_timeout)
        } else if err.is_request() {
            // Connection reset or closed before any response arrived.
            ForwardError::Connect(err.to_string())
        } else {
            ForwardError::Other(err.to_string())
        }
    }
}

fn outcome_label(err: &ForwardError) -> &'static str {
    match err {
        ForwardError::Timeout(_) => "timeout",
        ForwardError::Connect(_) => "connect_error",
        ForwardError::Other(_) => "error",
    }
}
