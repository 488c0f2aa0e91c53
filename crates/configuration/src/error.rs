//! Errors that can occur while reading, writing, or resolving configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can be thrown when processing configuration.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("empty connection URI in {file_path}")]
    EmptyConnectionUri { file_path: PathBuf },
    #[error("unsupported configuration version {found} in {file_path}, expected {expected}")]
    UnsupportedVersion {
        file_path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The errors that can be thrown when writing configuration back to disk.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to serialize configuration: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The errors that can be thrown when turning a parsed configuration into a runtime one.
#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("invalid configuration in {file_path}: {message}")]
    MissingEnvironmentVariable { file_path: PathBuf, message: String },
    #[error("invalid connection URI '{uri}': {source}")]
    InvalidUrl {
        uri: String,
        source: url::ParseError,
    },
}
