//! Common functions used across test cases.

use search_sql_client::SqlClient;
use search_sql_configuration::Configuration;
use tests_common::engine::FakeSearchEngine;

/// A client speaking real HTTP to the fake engine.
pub fn http_client(engine: &FakeSearchEngine) -> SqlClient {
    tests_common::init_logging();
    let url = url::Url::parse(&engine.url()).expect("engine url");
    SqlClient::from_configuration(&Configuration::new(url)).expect("http transport")
}

pub const PEOPLE_RESPONSE: &str = r#"{
    "columns": [{"name": "name", "type": "text"}, {"name": "age", "type": "integer"}],
    "rows": [["alice", 30], ["bob", 25]],
    "cursor": "sDXF1ZXJ5QW5kRmV0Y2gBAAAAAAAAAAEWYUpOYklQMHhRUEtld3RsNnFtYU1hQQ=="
}"#;
