use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Envelope, NewRsvp, RsvpRecord};

/// Content type the upstream script accepts without a preflight.
pub const PLAIN_TEXT_UTF8: &str = "text/plain;charset=utf-8";

const UNREACHABLE: &str = "Unable to connect to the RSVP server. Please check that the Google Apps Script is deployed and accessible.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Submission failed local validation; nothing was sent.
    #[error("{0}")]
    Invalid(&'static str),

    /// The proxy could not be reached.
    #[error("{}", UNREACHABLE)]
    Unreachable(#[source] reqwest::Error),

    /// The proxy answered with a non-success status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The envelope reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The response body was not the expected envelope.
    #[error("Malformed response: {0}")]
    Decode(String),
}

pub struct RsvpClient {
    client: Client,
    endpoint: String,
}

impl RsvpClient {
    /// `proxy_url` is the proxy's base URL, e.g. `http://localhost:8080`.
    pub fn new(proxy_url: &str) -> Self {
        Self::with_client(Client::new(), proxy_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(client: Client, proxy_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/rsvp", proxy_url.trim_end_matches('/')),
        }
    }

    /// Fetch every RSVP.
    pub async fn list_rsvps(&self) -> Result<Vec<RsvpRecord>, ClientError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;

        let envelope: Envelope<Vec<RsvpRecord>> = read_envelope(resp).await?;
        if envelope.success {
            Ok(envelope.data.unwrap_or_default())
        } else {
            Err(ClientError::Rejected(
                envelope.error.unwrap_or_else(|| "Failed to fetch RSVPs".to_string()),
            ))
        }
    }

    /// Validate, trim and submit an RSVP; returns the stored record.
    pub async fn submit_rsvp(&self, rsvp: &NewRsvp) -> Result<RsvpRecord, ClientError> {
        rsvp.validate().map_err(ClientError::Invalid)?;
        let body = serde_json::to_string(&rsvp.normalized())
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, PLAIN_TEXT_UTF8)
            .body(body)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;

        let envelope: Envelope<RsvpRecord> = read_envelope(resp).await?;
        match (envelope.success, envelope.data) {
            (true, Some(record)) => Ok(record),
            _ => Err(ClientError::Rejected(
                envelope.error.unwrap_or_else(|| "Failed to submit RSVP".to_string()),
            )),
        }
    }
}

/// Decode an envelope, turning non-success statuses into their `error` text.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Envelope<T>, ClientError> {
    let status = resp.status();
    let text = resp.text().await.map_err(ClientError::Unreachable)?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&text)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        return Err(ClientError::Status { status, message });
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
}
