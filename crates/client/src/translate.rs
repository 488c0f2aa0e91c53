//! Builder for `/_sql/translate`: turn a statement into the engine's native query DSL.

use multimap::MultiMap;
use tracing::{info_span, Instrument};

use crate::body::StatementBody;
use crate::client::{Endpoint, SqlClient};
use crate::error::{Error, Result};
use crate::params::{request_option_setters, statement_setters, RequestOptions, StatementParameters};
use crate::transport::{Method, PerformRequest};

pub const SQL_TRANSLATE_PATH: &str = "/_sql/translate";

/// Fluent builder for SQL translate requests. A statement is always required.
pub struct SqlTranslateBuilder<'a> {
    client: &'a SqlClient,
    params: StatementParameters,
    options: RequestOptions,
}

impl<'a> SqlTranslateBuilder<'a> {
    pub(crate) fn new(client: &'a SqlClient) -> Self {
        Self {
            client,
            params: StatementParameters::default(),
            options: RequestOptions::default(),
        }
    }

    statement_setters!();
    request_option_setters!();

    pub fn build_body(&self) -> Result<StatementBody> {
        if self.params.sql.is_empty() {
            return Err(Error::EmptyQuery);
        }
        self.params.to_body()
    }

    /// The request path and query-string parameters.
    pub fn build_request(&self) -> (&'static str, MultiMap<String, String>) {
        (SQL_TRANSLATE_PATH, self.options.params())
    }

    /// Send the request and return the translated query DSL as the server wrote it.
    pub async fn execute(self) -> Result<String> {
        let client = self.client;
        self.send()
            .instrument(info_span!("sql translate"))
            .await
            .map_err(|error| {
                client.report_error(Endpoint::Translate, &error);
                error
            })
    }

    async fn send(self) -> Result<String> {
        let (path, params) = self.build_request();
        let body = serde_json::to_value(self.build_body()?).map_err(Error::Encode)?;

        let response = self
            .client
            .perform(
                Endpoint::Translate,
                PerformRequest {
                    method: Method::POST,
                    path: path.to_string(),
                    params,
                    body: Some(body),
                    headers: self.options.headers,
                },
            )
            .await?;

        Ok(String::from_utf8_lossy(&response.body).into_owned())
    }
}
