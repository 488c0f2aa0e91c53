//! The search-sql command-line tool.
//!
//! Reads a client configuration from a directory and runs a single query or
//! translation against the configured search engine.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use search_sql_client::{RawQuery, SqlClient};
use search_sql_configuration::environment::Environment;
use search_sql_configuration::{self as configuration, ParsedConfiguration};

/// The various contextual bits and bobs we need to run.
pub struct Context<Env: Environment> {
    pub context_path: PathBuf,
    pub environment: Env,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a default configuration into the context directory.
    Initialize,
    /// Run a SQL statement, or continue one from a cursor, and print the result as JSON.
    Query {
        #[command(flatten)]
        statement: StatementArgs,
        /// Continue a previous query. Other statement options are ignored.
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Translate a SQL statement into query DSL and print it.
    Translate {
        #[command(flatten)]
        statement: StatementArgs,
    },
}

/// Options shared by `query` and `translate`.
#[derive(Debug, Clone, Default, Args)]
pub struct StatementArgs {
    /// The SQL statement.
    #[arg(long, default_value = "")]
    pub sql: String,
    #[arg(long, default_value_t = 0)]
    pub fetch_size: u32,
    #[arg(long, default_value = "")]
    pub request_timeout: String,
    #[arg(long, default_value = "")]
    pub page_timeout: String,
    #[arg(long, default_value = "")]
    pub time_zone: String,
    #[arg(long)]
    pub field_multi_value_leniency: bool,
    /// A filter in query DSL, given as JSON. May be repeated.
    #[arg(long = "filter")]
    pub filters: Vec<String>,
    /// Ask the engine to pretty-print its response.
    #[arg(long)]
    pub pretty: bool,
}

/// Run a command in a given directory.
pub async fn run(
    command: Command,
    context: Context<impl Environment>,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Initialize => initialize(context).await,
        Command::Query { statement, cursor } => {
            let client = client(&context).await?;
            let mut builder = client
                .query()
                .sql(statement.sql)
                .fetch_size(statement.fetch_size)
                .request_timeout(statement.request_timeout)
                .page_timeout(statement.page_timeout)
                .time_zone(statement.time_zone)
                .field_multi_value_leniency(statement.field_multi_value_leniency)
                .filters(raw_filters(statement.filters));
            if statement.pretty {
                builder = builder.pretty(true);
            }
            if let Some(cursor) = cursor {
                builder = builder.cursor(cursor);
            }
            let response = builder.execute().await?;
            writeln!(output, "{}", serde_json::to_string_pretty(&response)?)?;
            Ok(())
        }
        Command::Translate { statement } => {
            let client = client(&context).await?;
            let mut builder = client
                .translate()
                .sql(statement.sql)
                .fetch_size(statement.fetch_size)
                .request_timeout(statement.request_timeout)
                .page_timeout(statement.page_timeout)
                .time_zone(statement.time_zone)
                .field_multi_value_leniency(statement.field_multi_value_leniency)
                .filters(raw_filters(statement.filters));
            if statement.pretty {
                builder = builder.pretty(true);
            }
            let dsl = builder.execute().await?;
            writeln!(output, "{dsl}")?;
            Ok(())
        }
    }
}

fn raw_filters(
    filters: Vec<String>,
) -> impl Iterator<Item = Box<dyn search_sql_client::FilterQuery>> {
    filters
        .into_iter()
        .map(|filter| Box::new(RawQuery::new(filter)) as Box<dyn search_sql_client::FilterQuery>)
}

/// Initialize an empty directory with a default configuration.
///
/// The connection URI is read from `SEARCH_SQL_URL` at runtime.
async fn initialize(context: Context<impl Environment>) -> anyhow::Result<()> {
    let configuration_file = context
        .context_path
        .join(configuration::version1::CONFIGURATION_FILENAME);
    if configuration_file.exists() {
        anyhow::bail!(
            "configuration already exists at {}",
            configuration_file.display()
        );
    }

    configuration::write_parsed_configuration(ParsedConfiguration::initial(), &context.context_path)
        .await?;
    tracing::info!(path = %configuration_file.display(), "wrote configuration");
    Ok(())
}

async fn client(context: &Context<impl Environment>) -> anyhow::Result<SqlClient> {
    let parsed = configuration::parse_configuration(&context.context_path).await?;
    let runtime = configuration::make_runtime_configuration(parsed, &context.environment)?;
    Ok(SqlClient::from_configuration(&runtime)?)
}
