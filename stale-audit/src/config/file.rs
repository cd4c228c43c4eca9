//! Config file deserialization.

use super::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Parsed contents of a `stale-audit.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Organizations to audit.
    pub organizations: Option<Vec<String>>,

    /// Inactive days before a pull request is stale.
    pub pr_stale_days: Option<u32>,

    /// Inactive days before a branch is stale.
    pub branch_stale_days: Option<u32>,

    /// Days before the stale cutoff at which alerting starts.
    pub alert_days: Option<u32>,

    /// Branch names that are never reported.
    pub ignore_branches: Option<Vec<String>>,

    /// Regular expression repository names must match.
    pub repo_pattern: Option<String>,

    /// Exempt branches that back an open pull request.
    pub exempt_pr_branches: Option<bool>,

    /// Scan archived repositories too.
    pub include_archived: Option<bool>,

    /// GitHub (Enterprise) API base URL.
    pub api_url: Option<String>,

    /// Maximum repositories scanned concurrently.
    pub concurrency: Option<usize>,

    /// Records requested per page.
    pub per_page: Option<u8>,
}

impl ConfigFile {
    /// Loads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or isn't valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config file");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
