//! In-process RSVP store for local development.
//!
//! Answers exactly like the Apps Script endpoint does, so everything above
//! the backend (normalizer, translator, CORS) behaves the same in both modes.
//! Records live only as long as the process.

use std::sync::Arc;

use axum::body::Bytes;
use chrono::{SecondsFormat, Utc};
use rsvp_client::{NewRsvp, RsvpRecord};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::upstream::{ForwardError, OutboundRequest, UpstreamMethod, UpstreamResponse};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    records: Arc<RwLock<Vec<RsvpRecord>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn forward(&self, request: OutboundRequest) -> Result<UpstreamResponse, ForwardError> {
        let (status, body) = match request.method {
            UpstreamMethod::Get => {
                let records = self.records.read().await.clone();
                (200, json!({ "success": true, "data": records }))
            }
            UpstreamMethod::Post => self.create(request.body.as_deref().unwrap_or_default()).await,
        };

        let body = serde_json::to_vec(&body).map_err(|e| ForwardError::Other(e.to_string()))?;
        Ok(UpstreamResponse { status, body: Bytes::from(body) })
    }

    async fn create(&self, body: &[u8]) -> (u16, Value) {
        let submission: NewRsvp = match serde_json::from_slice(body) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting unparseable RSVP body");
                return (400, json!({ "success": false, "error": "Invalid JSON body" }));
            }
        };

        if let Err(message) = submission.validate() {
            return (400, json!({ "success": false, "error": message }));
        }

        let record = build_record(submission.normalized());
        self.records.write().await.push(record.clone());
        tracing::info!(id = %record.id, "Stored RSVP in memory");

        (200, json!({ "success": true, "data": record }))
    }
}

fn build_record(rsvp: NewRsvp) -> RsvpRecord {
    RsvpRecord {
        id: Uuid::new_v4().to_string(),
        name: rsvp.name,
        email: rsvp.email.unwrap_or_default(),
        phone: rsvp.phone,
        item: rsvp.item,
        dietary_restrictions: rsvp.dietary_restrictions,
        submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
