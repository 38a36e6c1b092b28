//! In-process mock backend for tests.
//!
//! An axum server on an ephemeral port that records every request and
//! answers from a per-test responder.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::session::{MemoryTokenStore, Session};

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header("authorization")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// `GET /api/chats?source=telegram`
    pub fn label(&self) -> String {
        match &self.query {
            Some(query) => format!("{} {}?{}", self.method, self.path, query),
            None => format!("{} {}", self.method, self.path),
        }
    }
}

/// What the backend answers with
pub struct MockReply {
    status: u16,
    body: serde_json::Value,
    delay: Option<Duration>,
}

impl MockReply {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body,
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: serde_json::json!({ "detail": "mock error" }),
            delay: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: 401,
            body: serde_json::json!({ "detail": "Invalid token" }),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockReply + Send + Sync>;

struct MockState {
    responder: Responder,
    requests: Mutex<Vec<RecordedRequest>>,
    events: Mutex<Vec<String>>,
}

/// Running mock backend; shut down on drop
pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
    {
        let state = Arc::new(MockState {
            responder: Arc::new(responder),
            requests: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        });

        let router = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Request labels in arrival order
    pub fn labels(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::label).collect()
    }

    /// `begin <label>` / `end <label>` in the order the server observed them
    pub fn events(&self) -> Vec<String> {
        self.state.events.lock().unwrap().clone()
    }

    pub fn count(&self, label: &str) -> usize {
        self.labels().iter().filter(|l| l.as_str() == label).count()
    }

    /// Client plus the session it shares, optionally pre-authenticated
    pub async fn client(&self, token: Option<&str>) -> (ApiClient, Arc<Session>) {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        let session = Arc::new(Session::load(Arc::new(store)).await.unwrap());
        let client = ApiClient::with_base_url(&self.base_url, Arc::clone(&session), None).unwrap();
        (client, session)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    let label = request.label();

    state.events.lock().unwrap().push(format!("begin {}", label));
    state.requests.lock().unwrap().push(request.clone());

    let reply = (state.responder)(&request);
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    state.events.lock().unwrap().push(format!("end {}", label));

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}
