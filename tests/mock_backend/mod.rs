//! In-process stand-in for the backend services: an axum router on an ephemeral
//! localhost port that records every request and answers from a canned route table.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use prpo_client::{GatewayClient, ServiceEndpoints};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).and_then(|v| v.to_str().ok()).map(String::from)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, v: serde_json::Value) -> Self {
        Self { status, body: v.to_string(), content_type: "application/json", delay: Duration::ZERO }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), content_type: "text/plain", delay: Duration::ZERO }
    }

    pub fn empty(status: u16) -> Self { Self::text(status, "") }

    pub fn delayed(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

struct Shared {
    routes: HashMap<String, Reply>,
    log: Mutex<Vec<Recorded>>,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) { self.handle.abort(); }
}

async fn handle(State(shared): State<Arc<Shared>>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let rec = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        headers: parts.headers.clone(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    let key = format!("{} {}", rec.method, rec.path);
    shared.log.lock().push(rec);

    let Some(reply) = shared.routes.get(&key).cloned() else {
        return (StatusCode::NOT_FOUND, format!("no mock route for {}", key)).into_response();
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).expect("valid status");
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, reply.content_type)
        .body(Body::from(reply.body))
        .expect("mock response")
}

impl MockBackend {
    /// Routes are keyed `"<METHOD> <path>"`, e.g. `"GET /api/bookings/my"`.
    pub async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let shared = Arc::new(Shared {
            routes: routes.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            log: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind 127.0.0.1:0");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock backend error: {e:?}");
            }
        });
        Self { addr, shared, handle }
    }

    pub fn origin(&self) -> String { format!("http://{}", self.addr) }

    pub fn endpoints(&self) -> ServiceEndpoints { ServiceEndpoints::from_origin(&self.origin()) }

    pub fn client(&self) -> GatewayClient { GatewayClient::new(self.endpoints()) }

    pub fn requests(&self) -> Vec<Recorded> { self.shared.log.lock().clone() }

    pub fn only_request(&self) -> Recorded {
        let log = self.requests();
        assert_eq!(log.len(), 1, "expected exactly one request, got {:?}", log);
        log.into_iter().next().expect("one request")
    }
}
