//! Runner configuration.

use crate::config::{ScanConfig, ThresholdPolicy};
use url::Url;

/// Everything needed to run a scan against GitHub.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// GitHub Enterprise API base URL; `None` targets github.com.
    api_url: Option<Url>,
    /// Staleness thresholds.
    policy: ThresholdPolicy,
    /// Scan scope and concurrency.
    scan: ScanConfig,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(token: String, policy: ThresholdPolicy, scan: ScanConfig) -> Self {
        Self {
            token,
            api_url: None,
            policy,
            scan,
        }
    }

    /// Sets a GitHub Enterprise API base URL.
    pub fn with_api_url(mut self, api_url: Option<Url>) -> Self {
        self.api_url = api_url;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the API base URL, if any.
    pub fn api_url(&self) -> Option<&Url> {
        self.api_url.as_ref()
    }

    /// Returns the threshold policy.
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Returns the scan scope.
    pub fn scan(&self) -> &ScanConfig {
        &self.scan
    }
}
