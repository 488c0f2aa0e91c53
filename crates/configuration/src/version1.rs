//! Version 1 of the on-disk configuration format.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::configuration::Configuration;
use crate::environment::Environment;
use crate::error::{
    MakeRuntimeConfigurationError, ParseConfigurationError, WriteParsedConfigurationError,
};
use crate::values::{ConnectionUri, Secret};

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";
pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "SEARCH_SQL_URL";

/// Initial configuration, just enough to reach a search engine and elaborate a full
/// 'Configuration'.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    // Which version of the configuration format are we using
    pub version: u32,
    /// Base URL of the search engine.
    pub connection_uri: ConnectionUri,
    /// Timeout applied to each HTTP request, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
    /// Headers sent with every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ParsedConfiguration {
    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }

    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            connection_uri: ConnectionUri(Secret::FromEnvironment {
                variable: DEFAULT_CONNECTION_URI_VARIABLE.into(),
            }),
            request_timeout_seconds: None,
            default_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}

/// Parse the configuration format from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    validate_parsed_configuration(&parsed_config, configuration_file)?;

    Ok(parsed_config)
}

fn validate_parsed_configuration(
    parsed_config: &ParsedConfiguration,
    file_path: PathBuf,
) -> Result<(), ParseConfigurationError> {
    if parsed_config.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion {
            file_path,
            found: parsed_config.version,
            expected: CURRENT_VERSION,
        });
    }

    match &parsed_config.connection_uri {
        ConnectionUri(Secret::Plain(uri)) if uri.trim().is_empty() => {
            Err(ParseConfigurationError::EmptyConnectionUri { file_path })
        }
        _ => Ok(()),
    }
}

/// Write the parsed configuration into a directory on disk.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        configuration_jsonschema_file,
        serde_json::to_string_pretty(&output)? + "\n",
    )
    .await?;

    Ok(())
}

/// Resolve secrets against the environment and produce the runtime 'Configuration'.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let uri = match parsed_config.connection_uri {
        ConnectionUri(Secret::Plain(uri)) => uri,
        ConnectionUri(Secret::FromEnvironment { variable }) => {
            environment.read(&variable).map_err(|error| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    file_path: CONFIGURATION_FILENAME.into(),
                    message: error.to_string(),
                }
            })?
        }
    };

    let url = url::Url::parse(&uri)
        .map_err(|source| MakeRuntimeConfigurationError::InvalidUrl { uri, source })?;

    tracing::debug!(url = %url, "resolved search engine URL");

    Ok(Configuration {
        url,
        request_timeout: parsed_config.request_timeout_seconds.map(Duration::from_secs),
        default_headers: parsed_config.default_headers,
        user_agent: parsed_config.user_agent,
    })
}
