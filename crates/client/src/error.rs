//! Errors returned by the SQL builders.

use thiserror::Error;

use crate::transport::TransportError;

/// A boxed error, used where the concrete failure belongs to user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("query and cursor must not both be empty")]
    EmptyQueryAndCursor,
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("unable to build filter: {0}")]
    FilterSource(#[source] BoxError),
    #[error("unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unable to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Whether the request was rejected locally, before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::EmptyQueryAndCursor | Error::EmptyQuery)
    }
}
