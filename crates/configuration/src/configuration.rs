//! Runtime configuration for the client.

use std::collections::BTreeMap;
use std::time::Duration;

/// The 'Configuration' type collects everything the HTTP transport needs at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves secrets and parses the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Base URL of the search engine. Endpoint paths are joined onto it.
    pub url: url::Url,
    pub request_timeout: Option<Duration>,
    /// Headers sent with every request, before any request-level headers.
    pub default_headers: BTreeMap<String, String>,
    pub user_agent: Option<String>,
}

impl Configuration {
    /// A configuration pointing at `url` with no timeout and no extra headers.
    pub fn new(url: url::Url) -> Self {
        Self {
            url,
            request_timeout: None,
            default_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}
