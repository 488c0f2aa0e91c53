//! A transport that records requests and replays a canned answer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use search_sql_client::{PerformRequest, Transport, TransportError, TransportResponse};

enum Reply {
    Body(Bytes),
    Failure(String),
}

pub struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<PerformRequest>>,
}

impl RecordingTransport {
    /// Answer every request with status 200 and the given body.
    pub fn replying(body: impl Into<Bytes>) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Body(body.into()),
            requests: Mutex::new(vec![]),
        })
    }

    /// Fail every request with `TransportError::Other(message)`.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Failure(message.to_string()),
            requests: Mutex::new(vec![]),
        })
    }

    pub fn requests(&self) -> Vec<PerformRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request seen so far. Panics if there were none or several.
    pub fn single_request(&self) -> PerformRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform_request(
        &self,
        request: PerformRequest,
    ) -> Result<TransportResponse, TransportError> {
        tracing::debug!(path = %request.path, "recording request");
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Body(body) => Ok(TransportResponse {
                status: 200,
                body: body.clone(),
            }),
            Reply::Failure(message) => Err(TransportError::Other(message.clone().into())),
        }
    }
}
