//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

use rsvp_cors_proxy::config::{BackendMode, ProxyConfig};
use rsvp_cors_proxy::http::HttpServer;
use rsvp_cors_proxy::lifecycle::Shutdown;

/// What the mock upstream saw for one request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub content_type: Option<String>,
    pub body: String,
}

type Responder = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = (u16, String)> + Send>> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    captured: Arc<Mutex<Vec<Captured>>>,
    responder: Responder,
}

/// Handle to a running mock Apps Script endpoint.
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}/macros/s/test-deployment/exec", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

async fn record(State(state): State<MockState>, method: Method, headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
    state.captured.lock().unwrap().push(Captured {
        method,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, body) = (state.responder)().await;
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Start a programmable mock upstream that records every request.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let captured = Arc::new(Mutex::new(Vec::new()));
    let responder: Responder = Arc::new(move || Box::pin(f()));
    let state = MockState {
        captured: captured.clone(),
        responder,
    };

    let app = Router::new().fallback(any(record)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, captured }
}

/// Start a mock upstream that always answers with the same status and body.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move || async move { (status, body.to_string()) }).await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Proxy config pointed at `upstream_url`, with short timeouts.
pub fn proxy_config(upstream_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.upstream.url = Some(upstream_url.to_string());
    config.upstream.connect_timeout_ms = 500;
    config.upstream.request_timeout_ms = 500;
    config
}

/// Proxy config using the in-memory backend.
pub fn in_memory_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.upstream.mode = BackendMode::InMemory;
    config
}

/// A running proxy on an ephemeral port.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
