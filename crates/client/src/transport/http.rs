//! A [`Transport`] backed by reqwest.

use async_trait::async_trait;
use multimap::MultiMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;

use search_sql_configuration::Configuration;

use super::{PerformRequest, Transport, TransportError, TransportResponse};

/// Sends requests to a search engine over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
    default_headers: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(configuration: &Configuration) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = configuration.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &configuration.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            base_url: configuration.url.clone(),
            default_headers: configuration
                .default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        })
    }

    /// Join `path` onto the base URL, keeping any path prefix the base URL has.
    fn url_for(
        &self,
        path: &str,
        params: &MultiMap<String, String>,
    ) -> Result<url::Url, TransportError> {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{path}"));

        if !params.is_empty() {
            let mut names: Vec<&String> = params.keys().collect();
            names.sort();
            let mut pairs = url.query_pairs_mut();
            for name in names {
                for value in params.get_vec(name).into_iter().flatten() {
                    pairs.append_pair(name, value);
                }
            }
        }

        Ok(url)
    }

    fn header_map(&self, headers: &MultiMap<String, String>) -> Result<HeaderMap, TransportError> {
        let request_headers = headers
            .iter_all()
            .flat_map(|(name, values)| values.iter().map(move |value| (name, value)));

        let mut header_map = HeaderMap::new();
        for (name, value) in self
            .default_headers
            .iter()
            .map(|(name, value)| (name, value))
            .chain(request_headers)
        {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
                TransportError::InvalidHeader {
                    name: name.clone(),
                    message: error.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|error| TransportError::InvalidHeader {
                    name: name.clone(),
                    message: error.to_string(),
                })?;
            header_map.append(header_name, header_value);
        }
        Ok(header_map)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(
        &self,
        request: PerformRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.path, &request.params)?;
        let headers = self.header_map(&request.headers)?;

        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self.client.request(request.method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: error_reason(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetails {
    Structured {
        #[serde(rename = "type", default)]
        kind: String,
        #[serde(default)]
        reason: String,
    },
    Message(String),
}

/// Extract a readable reason from an error body, e.g.
/// `{"error": {"type": "parsing_exception", "reason": "..."}, "status": 400}`.
fn error_reason(body: &[u8]) -> Option<String> {
    if let Ok(ErrorResponse { error }) = serde_json::from_slice::<ErrorResponse>(body) {
        return Some(match error {
            ErrorDetails::Structured { kind, reason } if kind.is_empty() => reason,
            ErrorDetails::Structured { kind, reason } => format!("{kind}: {reason}"),
            ErrorDetails::Message(message) => message,
        });
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}
