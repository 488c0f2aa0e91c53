//! Parameters shared by the query and translate builders.

use multimap::MultiMap;

use crate::body::{FilterClause, StatementBody};
use crate::error::Result;
use crate::filter::FilterQuery;

/// Statement options as set by the caller. Zero values mean "not set".
#[derive(Default)]
pub(crate) struct StatementParameters {
    pub sql: String,
    pub fetch_size: u32,
    pub request_timeout: String,
    pub page_timeout: String,
    pub time_zone: String,
    pub field_multi_value_leniency: bool,
    pub filters: Vec<Box<dyn FilterQuery>>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl StatementParameters {
    /// Build the sparse body. The caller checks that `sql` is present.
    pub fn to_body(&self) -> Result<StatementBody> {
        Ok(StatementBody {
            query: self.sql.clone(),
            fetch_size: (self.fetch_size > 0).then_some(self.fetch_size),
            page_timeout: non_empty(&self.page_timeout),
            request_timeout: non_empty(&self.request_timeout),
            time_zone: non_empty(&self.time_zone),
            field_multi_value_leniency: self.field_multi_value_leniency.then_some(true),
            filter: FilterClause::from_filters(&self.filters)?,
        })
    }
}

/// Transport-level options: query-string flags and request headers.
#[derive(Debug, Clone, Default)]
pub(crate) struct RequestOptions {
    pub pretty: Option<bool>,
    pub human: Option<bool>,
    pub error_trace: Option<bool>,
    pub filter_path: Vec<String>,
    pub headers: MultiMap<String, String>,
}

impl RequestOptions {
    /// Query-string parameters for the flags that were set.
    pub fn params(&self) -> MultiMap<String, String> {
        let mut params = MultiMap::new();
        let flags = [
            ("pretty", self.pretty),
            ("human", self.human),
            ("error_trace", self.error_trace),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                params.insert(name.to_string(), flag.to_string());
            }
        }
        if !self.filter_path.is_empty() {
            params.insert("filter_path".to_string(), self.filter_path.join(","));
        }
        params
    }
}

/// Setters for the statement options, shared by both builders.
macro_rules! statement_setters {
    () => {
        /// The SQL statement to run.
        pub fn sql(mut self, sql: impl Into<String>) -> Self {
            self.params.sql = sql.into();
            self
        }

        /// Maximum number of rows returned per page. Zero leaves it to the server.
        pub fn fetch_size(mut self, size: u32) -> Self {
            self.params.fetch_size = size;
            self
        }

        /// How long the server waits for the statement to finish, e.g. `"90s"`.
        pub fn request_timeout(mut self, timeout: impl Into<String>) -> Self {
            self.params.request_timeout = timeout.into();
            self
        }

        /// How long the server keeps a cursor open between pages, e.g. `"45s"`.
        pub fn page_timeout(mut self, timeout: impl Into<String>) -> Self {
            self.params.page_timeout = timeout.into();
            self
        }

        /// Time zone used for date functions and date parsing, e.g. `"Europe/Berlin"`.
        pub fn time_zone(mut self, zone: impl Into<String>) -> Self {
            self.params.time_zone = zone.into();
            self
        }

        /// Return the first value of multi-valued fields instead of failing.
        pub fn field_multi_value_leniency(mut self, leniency: bool) -> Self {
            self.params.field_multi_value_leniency = leniency;
            self
        }

        /// Attach a filter predicate. Predicates accumulate in the order they are attached.
        pub fn filter(mut self, filter: impl $crate::filter::FilterQuery + 'static) -> Self {
            self.params.filters.push(Box::new(filter));
            self
        }

        /// Attach several filter predicates.
        pub fn filters(
            mut self,
            filters: impl IntoIterator<Item = Box<dyn $crate::filter::FilterQuery>>,
        ) -> Self {
            self.params.filters.extend(filters);
            self
        }
    };
}

/// Setters for the transport options, shared by both builders.
macro_rules! request_option_setters {
    () => {
        /// Ask the server to pretty-print its JSON response.
        pub fn pretty(mut self, pretty: bool) -> Self {
            self.options.pretty = Some(pretty);
            self
        }

        /// Ask for human readable values, e.g. `"7.5mb"`.
        pub fn human(mut self, human: bool) -> Self {
            self.options.human = Some(human);
            self
        }

        /// Include the stack trace of returned errors.
        pub fn error_trace(mut self, error_trace: bool) -> Self {
            self.options.error_trace = Some(error_trace);
            self
        }

        /// Filters used to reduce the response, sent comma-joined.
        pub fn filter_path<S: Into<String>>(
            mut self,
            filter_path: impl IntoIterator<Item = S>,
        ) -> Self {
            self.options.filter_path = filter_path.into_iter().map(Into::into).collect();
            self
        }

        /// Add a request header. Repeated names keep every value.
        pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.options.headers.insert(name.into(), value.into());
            self
        }

        /// Replace all request headers.
        pub fn headers(mut self, headers: ::multimap::MultiMap<String, String>) -> Self {
            self.options.headers = headers;
            self
        }
    };
}

pub(crate) use request_option_setters;
pub(crate) use statement_setters;
