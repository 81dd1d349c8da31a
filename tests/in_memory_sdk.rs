//! The client SDK against a proxy running the in-memory backend, and
//! against a proxy whose upstream misbehaves.

mod common;

use std::time::Duration;

use common::*;
use rsvp_client::{ClientError, NewRsvp, RsvpClient};

#[tokio::test]
async fn test_submit_then_list_round_trip() {
    let proxy = start_proxy(in_memory_config()).await;
    let sdk = RsvpClient::with_client(client(), &proxy.base_url());

    assert!(sdk.list_rsvps().await.unwrap().is_empty());

    let mut rsvp = NewRsvp::new("  Ada Lovelace ", "Lemon tart");
    rsvp.email = Some("ada@example.com".into());
    rsvp.dietary_restrictions = Some("none".into());
    let stored = sdk.submit_rsvp(&rsvp).await.unwrap();

    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.item, "Lemon tart");
    assert_eq!(stored.email, "ada@example.com");
    assert!(!stored.id.is_empty());

    sdk.submit_rsvp(&NewRsvp::new("Grace", "Cornbread")).await.unwrap();

    let all = sdk.list_rsvps().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, stored.id);
    assert_eq!(all[1].name, "Grace");
}

#[tokio::test]
async fn test_local_validation_sends_nothing() {
    let proxy = start_proxy(in_memory_config()).await;
    let sdk = RsvpClient::with_client(client(), &proxy.base_url());

    let err = sdk.submit_rsvp(&NewRsvp::new("Ada", "   ")).await.unwrap_err();
    assert!(matches!(err, ClientError::Invalid(_)));
    assert_eq!(err.to_string(), "Name and item are required");

    assert!(sdk.list_rsvps().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gateway_errors_surface_as_status() {
    let upstream = start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, "{}".to_string())
    })
    .await;
    let mut config = proxy_config(&upstream.url());
    config.upstream.request_timeout_ms = 200;
    let proxy = start_proxy(config).await;

    let err = RsvpClient::with_client(client(), &proxy.base_url()).list_rsvps().await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status.as_u16(), 504);
            assert_eq!(message, "Gateway timeout: Apps Script did not respond in time");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_proxy() {
    let dead = closed_port().await;
    let err = RsvpClient::with_client(client(), &format!("http://{}", dead))
        .list_rsvps()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unreachable(_)));
    assert!(err.to_string().starts_with("Unable to connect to the RSVP server"));
}
