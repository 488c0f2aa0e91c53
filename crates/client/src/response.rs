//! Result sets returned by `/_sql`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A page of results: column descriptors, rows of cells, and a cursor
/// when more pages are available.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SqlQueryResponse {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub columns: Vec<Column>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Column {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub column_type: String,
}

/// Treat an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl SqlQueryResponse {
    /// Whether the server handed out a cursor for the next page.
    pub fn has_more(&self) -> bool {
        self.cursor.as_deref().is_some_and(|cursor| !cursor.is_empty())
    }

    /// Rows keyed by column name.
    ///
    /// Cells past the last column are dropped; a short row yields a record
    /// without the trailing columns.
    pub fn records(&self) -> impl Iterator<Item = Map<String, Value>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.name.clone(), cell.clone()))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_decode_to_empty() {
        let response: SqlQueryResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, SqlQueryResponse::default());
        assert!(!response.has_more());
    }

    #[test]
    fn null_columns_decode_to_empty() {
        let response: SqlQueryResponse =
            serde_json::from_str(r#"{"columns":null,"rows":[["x"]]}"#).unwrap();
        assert!(response.columns.is_empty());
        assert_eq!(response.rows, vec![vec![json!("x")]]);
    }

    #[test]
    fn null_rows_decode_to_empty() {
        let response: SqlQueryResponse = serde_json::from_str(r#"{"rows":null}"#).unwrap();
        assert_eq!(response, SqlQueryResponse::default());
    }

    #[test]
    fn null_column_fields_decode_to_empty_strings() {
        let response: SqlQueryResponse =
            serde_json::from_str(r#"{"columns":[{"name":"a","type":null}],"rows":[]}"#).unwrap();
        assert_eq!(
            response.columns,
            vec![Column {
                name: "a".to_string(),
                column_type: String::new(),
            }]
        );

        let column: Column = serde_json::from_str(r#"{"name":null,"type":"keyword"}"#).unwrap();
        assert_eq!(column.name, "");
    }

    #[test]
    fn empty_column_fields_are_not_serialized() {
        let column = Column {
            name: "a".to_string(),
            column_type: String::new(),
        };
        assert_eq!(serde_json::to_value(column).unwrap(), json!({"name": "a"}));
    }

    #[test]
    fn cursor_signals_more_pages() {
        let response: SqlQueryResponse =
            serde_json::from_value(json!({"rows": [[1]], "cursor": "c1"})).unwrap();
        assert!(response.has_more());
    }

    #[test]
    fn records_zip_rows_with_column_names() {
        let response: SqlQueryResponse = serde_json::from_value(json!({
            "columns": [{"name": "name", "type": "text"}, {"name": "age", "type": "integer"}],
            "rows": [["alice", 30], ["bob"], ["carol", 41, "extra"]]
        }))
        .unwrap();

        let records: Vec<Value> = response.records().map(Value::Object).collect();

        assert_eq!(
            records,
            vec![
                json!({"name": "alice", "age": 30}),
                json!({"name": "bob"}),
                json!({"name": "carol", "age": 41}),
            ]
        );
    }
}
