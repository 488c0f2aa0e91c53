//! Builder for `/_sql`: run a statement, or fetch the next page of a previous one.

use multimap::MultiMap;
use tracing::{info_span, Instrument};

use crate::body::SqlQueryBody;
use crate::client::{Endpoint, SqlClient};
use crate::error::{Error, Result};
use crate::params::{request_option_setters, statement_setters, RequestOptions, StatementParameters};
use crate::response::SqlQueryResponse;
use crate::transport::{Method, PerformRequest};

pub const SQL_QUERY_PATH: &str = "/_sql";

/// Fluent builder for SQL query requests.
///
/// Either a statement (`.sql()`) or a cursor (`.cursor()`) must be given.
/// When a cursor is set, every other statement option is ignored and only the
/// cursor is sent.
pub struct SqlQueryBuilder<'a> {
    client: &'a SqlClient,
    cursor: String,
    params: StatementParameters,
    options: RequestOptions,
}

impl<'a> SqlQueryBuilder<'a> {
    pub(crate) fn new(client: &'a SqlClient) -> Self {
        Self {
            client,
            cursor: String::new(),
            params: StatementParameters::default(),
            options: RequestOptions::default(),
        }
    }

    /// Continue a previous query from the cursor it returned.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    statement_setters!();
    request_option_setters!();

    /// The request body.
    ///
    /// A non-empty cursor short-circuits: the body is `{"cursor": ...}` alone.
    pub fn build_body(&self) -> Result<SqlQueryBody> {
        if !self.cursor.is_empty() {
            return Ok(SqlQueryBody::Cursor {
                cursor: self.cursor.clone(),
            });
        }
        if self.params.sql.is_empty() {
            return Err(Error::EmptyQueryAndCursor);
        }
        Ok(SqlQueryBody::Statement(self.params.to_body()?))
    }

    /// The request path and query-string parameters.
    ///
    /// Responses are always requested as JSON.
    pub fn build_request(&self) -> (&'static str, MultiMap<String, String>) {
        let mut params = self.options.params();
        params.insert("format".to_string(), "json".to_string());
        (SQL_QUERY_PATH, params)
    }

    /// Send the request and decode the result set.
    pub async fn execute(self) -> Result<SqlQueryResponse> {
        let client = self.client;
        self.send()
            .instrument(info_span!("sql query"))
            .await
            .map_err(|error| {
                client.report_error(Endpoint::Query, &error);
                error
            })
    }

    async fn send(self) -> Result<SqlQueryResponse> {
        let (path, params) = self.build_request();
        let body = serde_json::to_value(self.build_body()?).map_err(Error::Encode)?;

        let response = self
            .client
            .perform(
                Endpoint::Query,
                PerformRequest {
                    method: Method::POST,
                    path: path.to_string(),
                    params,
                    body: Some(body),
                    headers: self.options.headers,
                },
            )
            .await?;

        serde_json::from_slice(&response.body).map_err(Error::Decode)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::filter::{RawQuery, TermQuery};
    use crate::transport::{Transport, TransportError, TransportResponse};

    struct Unreachable;

    #[async_trait::async_trait]
    impl Transport for Unreachable {
        async fn perform_request(
            &self,
            _request: PerformRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            Err(TransportError::Other("unreachable".into()))
        }
    }

    fn body_json(builder: &SqlQueryBuilder<'_>) -> serde_json::Value {
        serde_json::to_value(builder.build_body().unwrap()).unwrap()
    }

    #[test]
    fn cursor_wins_over_everything_else() {
        let client = SqlClient::new(Unreachable);
        let builder = client
            .query()
            .sql("SELECT * FROM t")
            .fetch_size(10)
            .time_zone("UTC")
            .filter(RawQuery::new("not json"))
            .cursor("abc123");

        assert_eq!(body_json(&builder), json!({"cursor": "abc123"}));
    }

    #[test]
    fn empty_sql_and_cursor_is_rejected() {
        let client = SqlClient::new(Unreachable);
        let error = client.query().fetch_size(5).build_body().unwrap_err();

        assert!(matches!(error, Error::EmptyQueryAndCursor));
        assert_eq!(error.to_string(), "query and cursor must not both be empty");
    }

    #[test]
    fn set_options_appear_with_their_values() {
        let client = SqlClient::new(Unreachable);
        let builder = client
            .query()
            .sql("SELECT * FROM t")
            .fetch_size(5)
            .page_timeout("45s")
            .request_timeout("90s")
            .time_zone("Europe/Berlin")
            .field_multi_value_leniency(true);

        assert_eq!(
            body_json(&builder),
            json!({
                "query": "SELECT * FROM t",
                "fetch_size": 5,
                "page_timeout": "45s",
                "request_timeout": "90s",
                "time_zone": "Europe/Berlin",
                "field_multi_value_leniency": true
            })
        );
    }

    #[test]
    fn zero_values_are_omitted() {
        let client = SqlClient::new(Unreachable);
        let builder = client
            .query()
            .sql("SELECT 1")
            .fetch_size(0)
            .page_timeout("")
            .time_zone("")
            .field_multi_value_leniency(false);

        assert_eq!(body_json(&builder), json!({"query": "SELECT 1"}));
    }

    #[test]
    fn single_filter_is_inlined() {
        let client = SqlClient::new(Unreachable);
        let builder = client
            .query()
            .sql("SELECT 1")
            .filter(TermQuery::new("a", 1));

        assert_eq!(body_json(&builder)["filter"], json!({"term": {"a": 1}}));
    }

    #[test]
    fn several_filters_are_listed_in_order() {
        let client = SqlClient::new(Unreachable);
        let builder = client
            .query()
            .sql("SELECT 1")
            .filter(TermQuery::new("a", 1))
            .filters([Box::new(TermQuery::new("b", 2)) as Box<dyn crate::FilterQuery>]);

        assert_eq!(
            body_json(&builder)["filter"],
            json!([{"term": {"a": 1}}, {"term": {"b": 2}}])
        );
    }

    #[test]
    fn failing_filter_aborts_the_build() {
        let client = SqlClient::new(Unreachable);
        let error = client
            .query()
            .sql("SELECT 1")
            .filter(RawQuery::new("{"))
            .filter(TermQuery::new("b", 2))
            .build_body()
            .unwrap_err();

        assert!(matches!(error, Error::FilterSource(_)));
    }

    struct CountingQuery(Arc<AtomicUsize>);

    impl crate::FilterQuery for CountingQuery {
        fn source(&self) -> std::result::Result<serde_json::Value, crate::error::BoxError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"match_all": {}}))
        }
    }

    #[test]
    fn filters_after_a_failing_one_are_not_evaluated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = SqlClient::new(Unreachable);
        let result = client
            .query()
            .sql("SELECT 1")
            .filter(RawQuery::new("{"))
            .filter(CountingQuery(calls.clone()))
            .build_body();

        assert!(matches!(result, Err(Error::FilterSource(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn path_is_fixed_and_format_is_json() {
        let client = SqlClient::new(Unreachable);
        let (path, params) = client
            .query()
            .cursor("abc")
            .pretty(true)
            .filter_path(["rows"])
            .build_request();

        assert_eq!(path, "/_sql");
        assert_eq!(params.get_vec("format"), Some(&vec!["json".to_string()]));
        assert_eq!(params.get("pretty").map(String::as_str), Some("true"));
        assert_eq!(params.get("filter_path").map(String::as_str), Some("rows"));
    }

    #[tokio::test]
    async fn validation_happens_before_the_transport_is_called() {
        let client = SqlClient::new(Unreachable);
        let error = client.query().execute().await.unwrap_err();

        assert!(matches!(error, Error::EmptyQueryAndCursor));
    }
}
