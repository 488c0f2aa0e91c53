//! A fake search engine serving the SQL endpoints over real HTTP.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::Router;

/// What the fake engine answers on one path.
#[derive(Debug, Clone)]
pub struct CannedReply {
    pub status: StatusCode,
    pub body: String,
}

impl CannedReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    pub fn error(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request as the fake engine received it.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct EngineState {
    replies: HashMap<String, CannedReply>,
    received: Mutex<Vec<ReceivedRequest>>,
}

pub struct FakeSearchEngine {
    address: SocketAddr,
    state: Arc<EngineState>,
    server: tokio::task::JoinHandle<()>,
}

impl FakeSearchEngine {
    /// Start serving `/_sql` and `/_sql/translate` on a random local port.
    pub async fn start(replies: impl IntoIterator<Item = (&'static str, CannedReply)>) -> Self {
        let state = Arc::new(EngineState {
            replies: replies
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
            received: Mutex::new(vec![]),
        });

        let router = Router::new()
            .route("/_sql", post(handle))
            .route("/_sql/translate", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(router.into_make_service());

        let server = tokio::spawn(async move {
            server.await.unwrap();
        });

        Self {
            address,
            state,
            server,
        }
    }

    /// Base URL of the engine, e.g. `http://127.0.0.1:53211`.
    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().unwrap().clone()
    }
}

impl Drop for FakeSearchEngine {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<EngineState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state.received.lock().unwrap().push(ReceivedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(ToString::to_string),
        headers,
        body,
    });

    match state.replies.get(uri.path()) {
        Some(reply) => (reply.status, reply.body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
