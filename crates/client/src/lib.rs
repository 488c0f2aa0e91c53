//! A client for the SQL endpoints of a search engine.
//!
//! Requests are assembled with fluent builders obtained from a [`SqlClient`]:
//!
//! ```no_run
//! # use search_sql_client::{SqlClient, TermQuery};
//! # async fn example(client: &SqlClient) -> search_sql_client::Result<()> {
//! let response = client
//!     .query()
//!     .sql("SELECT name, age FROM people ORDER BY age")
//!     .fetch_size(100)
//!     .time_zone("Europe/Amsterdam")
//!     .filter(TermQuery::new("active", true))
//!     .execute()
//!     .await?;
//!
//! for record in response.records() {
//!     println!("{record:?}");
//! }
//!
//! let dsl = client.translate().sql("SELECT * FROM people").execute().await?;
//! println!("{dsl}");
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod error;
pub mod filter;
pub mod metrics;
mod params;
pub mod query;
pub mod response;
pub mod translate;
pub mod transport;

pub use body::{FilterClause, SqlQueryBody, StatementBody};
pub use client::SqlClient;
pub use error::{BoxError, Error, Result};
pub use filter::{
    BoolQuery, ExistsQuery, FilterQuery, MatchAllQuery, RangeQuery, RawQuery, TermQuery,
    TermsQuery,
};
pub use metrics::Metrics;
pub use query::SqlQueryBuilder;
pub use response::{Column, SqlQueryResponse};
pub use translate::SqlTranslateBuilder;
pub use transport::{
    HttpTransport, PerformRequest, Transport, TransportError, TransportResponse,
};
