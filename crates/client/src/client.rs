//! The entry point: a handle on a transport that hands out request builders.

use std::sync::Arc;

use search_sql_configuration::Configuration;

use crate::error::Error;
use crate::metrics::Metrics;
use crate::query::SqlQueryBuilder;
use crate::translate::SqlTranslateBuilder;
use crate::transport::{
    HttpTransport, PerformRequest, Transport, TransportError, TransportResponse,
};

/// A client for the SQL endpoints. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct SqlClient {
    transport: Arc<dyn Transport>,
    metrics: Option<Metrics>,
}

/// Which endpoint a request was sent to, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Query,
    Translate,
}

impl Endpoint {
    fn error_name(self) -> &'static str {
        match self {
            Endpoint::Query => "SQL query error",
            Endpoint::Translate => "SQL translate error",
        }
    }
}

impl SqlClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            metrics: None,
        }
    }

    /// Create a client talking HTTP to the search engine named in the configuration.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(configuration)?))
    }

    /// Count requests and failures in the given metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start building a `/_sql` request.
    pub fn query(&self) -> SqlQueryBuilder<'_> {
        SqlQueryBuilder::new(self)
    }

    /// Start building a `/_sql/translate` request.
    pub fn translate(&self) -> SqlTranslateBuilder<'_> {
        SqlTranslateBuilder::new(self)
    }

    pub(crate) async fn perform(
        &self,
        endpoint: Endpoint,
        request: PerformRequest,
    ) -> Result<TransportResponse, TransportError> {
        if let Some(metrics) = &self.metrics {
            match endpoint {
                Endpoint::Query => metrics.record_query(),
                Endpoint::Translate => metrics.record_translate(),
            }
        }
        self.transport.perform_request(request).await
    }

    /// Log a failed request and count it.
    ///
    /// Validation errors are part of normal use and are not logged.
    pub(crate) fn report_error(&self, endpoint: Endpoint, error: &Error) {
        if error.is_validation() {
            return;
        }
        tracing::error!(
            meta.signal_type = "log",
            event.domain = "search-sql",
            event.name = endpoint.error_name(),
            name = endpoint.error_name(),
            body = %error,
            error = true,
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_error();
        }
    }
}
