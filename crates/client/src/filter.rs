//! Filter predicates attached to SQL requests.
//!
//! The search engine applies filters as native query DSL before running the
//! SQL statement. Anything that can render itself as a DSL document can be
//! used as a filter by implementing [`FilterQuery`].

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::BoxError;

/// A query expression that renders its own DSL representation.
pub trait FilterQuery: Send + Sync {
    fn source(&self) -> Result<Value, BoxError>;
}

impl FilterQuery for Value {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(self.clone())
    }
}

impl<T: FilterQuery + ?Sized> FilterQuery for Box<T> {
    fn source(&self) -> Result<Value, BoxError> {
        (**self).source()
    }
}

impl<T: FilterQuery + ?Sized> FilterQuery for Arc<T> {
    fn source(&self) -> Result<Value, BoxError> {
        (**self).source()
    }
}

/// A filter given as a JSON string, parsed when the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuery {
    source: String,
}

impl RawQuery {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl FilterQuery for RawQuery {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(serde_json::from_str(&self.source)?)
    }
}

/// Matches every document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchAllQuery;

impl FilterQuery for MatchAllQuery {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(json!({ "match_all": {} }))
    }
}

/// Matches documents whose field holds exactly the given value.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    value: Value,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl FilterQuery for TermQuery {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(json!({ "term": { self.field.as_str(): self.value } }))
    }
}

/// Matches documents whose field holds any of the given values.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    field: String,
    values: Vec<Value>,
}

impl TermsQuery {
    pub fn new<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl FilterQuery for TermsQuery {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(json!({ "terms": { self.field.as_str(): self.values } }))
    }
}

/// Matches documents that have any value for the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsQuery {
    field: String,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl FilterQuery for ExistsQuery {
    fn source(&self) -> Result<Value, BoxError> {
        Ok(json!({ "exists": { "field": self.field } }))
    }
}

/// Matches documents whose field falls within the configured bounds.
///
/// Bounds that are never set are left out of the rendered query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeQuery {
    field: String,
    gt: Option<Value>,
    gte: Option<Value>,
    lt: Option<Value>,
    lte: Option<Value>,
    format: Option<String>,
    time_zone: Option<String>,
}

impl RangeQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    /// Date format used to parse date bounds, e.g. `yyyy-MM-dd`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

impl FilterQuery for RangeQuery {
    fn source(&self) -> Result<Value, BoxError> {
        let mut bounds = Map::new();
        let entries = [
            ("gt", self.gt.clone()),
            ("gte", self.gte.clone()),
            ("lt", self.lt.clone()),
            ("lte", self.lte.clone()),
            ("format", self.format.clone().map(Value::String)),
            ("time_zone", self.time_zone.clone().map(Value::String)),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                bounds.insert(key.to_string(), value);
            }
        }
        Ok(json!({ "range": { self.field.as_str(): bounds } }))
    }
}

/// Combines other predicates with boolean clauses.
///
/// A clause holding a single predicate renders it directly, a clause with
/// several renders them as an array. Empty clauses are left out.
#[derive(Default)]
pub struct BoolQuery {
    must: Vec<Box<dyn FilterQuery>>,
    filter: Vec<Box<dyn FilterQuery>>,
    should: Vec<Box<dyn FilterQuery>>,
    must_not: Vec<Box<dyn FilterQuery>>,
    minimum_should_match: Option<String>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: impl FilterQuery + 'static) -> Self {
        self.must.push(Box::new(query));
        self
    }

    pub fn filter(mut self, query: impl FilterQuery + 'static) -> Self {
        self.filter.push(Box::new(query));
        self
    }

    pub fn should(mut self, query: impl FilterQuery + 'static) -> Self {
        self.should.push(Box::new(query));
        self
    }

    pub fn must_not(mut self, query: impl FilterQuery + 'static) -> Self {
        self.must_not.push(Box::new(query));
        self
    }

    pub fn minimum_should_match(mut self, minimum: impl Into<String>) -> Self {
        self.minimum_should_match = Some(minimum.into());
        self
    }
}

fn clause_source(queries: &[Box<dyn FilterQuery>]) -> Result<Option<Value>, BoxError> {
    match queries {
        [] => Ok(None),
        [single] => single.source().map(Some),
        many => many
            .iter()
            .map(|query| query.source())
            .collect::<Result<Vec<_>, _>>()
            .map(|sources| Some(Value::Array(sources))),
    }
}

impl FilterQuery for BoolQuery {
    fn source(&self) -> Result<Value, BoxError> {
        let mut clauses = Map::new();
        let occurrences = [
            ("must", &self.must),
            ("filter", &self.filter),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ];
        for (occurrence, queries) in occurrences {
            if let Some(source) = clause_source(queries)? {
                clauses.insert(occurrence.to_string(), source);
            }
        }
        if let Some(minimum) = &self.minimum_should_match {
            clauses.insert(
                "minimum_should_match".to_string(),
                Value::String(minimum.clone()),
            );
        }
        Ok(json!({ "bool": clauses }))
    }
}
