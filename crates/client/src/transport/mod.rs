//! The HTTP collaborator the builders delegate to.
//!
//! Builders never talk to the network themselves. They hand a
//! [`PerformRequest`] to a [`Transport`] and interpret the raw body that
//! comes back. [`HttpTransport`] is the reqwest-backed implementation; tests
//! substitute their own.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use multimap::MultiMap;
use thiserror::Error;

pub use reqwest::Method;

pub use self::http::HttpTransport;
use crate::error::BoxError;

/// Everything needed to issue one request against the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformRequest {
    pub method: Method,
    /// Absolute path, e.g. `/_sql`, joined onto the transport's base URL.
    pub path: String,
    pub params: MultiMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub headers: MultiMap<String, String>,
}

/// A successful response. Non-2xx statuses are reported as [`TransportError::Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("search engine returned status {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error(transparent)]
    Other(BoxError),
}

/// Issues requests on behalf of the SQL builders.
///
/// Implementations own connection handling, timeouts and cancellation.
/// Errors are passed back to the caller unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform_request(
        &self,
        request: PerformRequest,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform_request(
        &self,
        request: PerformRequest,
    ) -> Result<TransportResponse, TransportError> {
        (**self).perform_request(request).await
    }
}
