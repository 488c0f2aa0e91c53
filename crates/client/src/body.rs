//! Request bodies sent to the SQL endpoints.
//!
//! Optional fields are only present on the wire when they were set to a
//! non-default value.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::filter::FilterQuery;

/// The `filter` field: one predicate is sent as-is, several as an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterClause {
    Single(Value),
    Multiple(Vec<Value>),
}

impl FilterClause {
    /// Render attached predicates, stopping at the first one that fails.
    pub(crate) fn from_filters(filters: &[Box<dyn FilterQuery>]) -> Result<Option<Self>> {
        match filters {
            [] => Ok(None),
            [single] => single
                .source()
                .map(|source| Some(FilterClause::Single(source)))
                .map_err(Error::FilterSource),
            many => many
                .iter()
                .map(|filter| filter.source().map_err(Error::FilterSource))
                .collect::<Result<Vec<_>>>()
                .map(|sources| Some(FilterClause::Multiple(sources))),
        }
    }
}

/// A SQL statement with its execution options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementBody {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_multi_value_leniency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterClause>,
}

/// Body of a `/_sql` request: either a fresh statement or the continuation of a previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlQueryBody {
    Cursor { cursor: String },
    Statement(StatementBody),
}
