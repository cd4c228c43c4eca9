//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while building the scan configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// The threshold policy is inconsistent.
    #[error("Invalid threshold policy: {message}")]
    InvalidPolicy { message: String },

    /// A setting has an invalid value.
    #[error("Invalid value for '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// The repository pattern is not a valid regular expression.
    #[error("Invalid repository pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The API URL could not be parsed.
    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
