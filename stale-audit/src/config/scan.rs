//! Which repositories to scan and how hard to hit the API.

use super::ConfigError;
use regex::Regex;

/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Validated scan scope and concurrency settings.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    organizations: Vec<String>,
    repo_pattern: Regex,
    include_archived: bool,
    per_page: u8,
    concurrency: usize,
}

impl ScanConfig {
    /// Builds a validated scan configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no organization is given, the pattern
    /// does not compile, the page size is outside `1..=100`, or concurrency is zero.
    pub fn new(
        organizations: Vec<String>,
        repo_pattern: &str,
        per_page: u8,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        let organizations: Vec<String> = organizations
            .into_iter()
            .map(|org| org.trim().to_string())
            .filter(|org| !org.is_empty())
            .collect();

        if organizations.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "organizations".to_string(),
                message: "at least one organization is required".to_string(),
            });
        }

        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(ConfigError::ValidationError {
                field: "per-page".to_string(),
                message: format!("must be between 1 and {MAX_PER_PAGE}, got {per_page}"),
            });
        }

        if concurrency == 0 {
            return Err(ConfigError::ValidationError {
                field: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let repo_pattern = Regex::new(repo_pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: repo_pattern.to_string(),
            source: e,
        })?;

        Ok(Self {
            organizations,
            repo_pattern,
            include_archived: false,
            per_page,
            concurrency,
        })
    }

    /// Includes archived repositories in the scan.
    #[must_use]
    pub fn with_archived(mut self, include_archived: bool) -> Self {
        self.include_archived = include_archived;
        self
    }

    /// Organizations to enumerate.
    pub fn organizations(&self) -> &[String] {
        &self.organizations
    }

    /// Returns true if the repository name matches the configured pattern.
    pub fn matches_repository(&self, name: &str) -> bool {
        self.repo_pattern.is_match(name)
    }

    /// Whether archived repositories are scanned.
    pub fn include_archived(&self) -> bool {
        self.include_archived
    }

    /// Records requested per page.
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Maximum repositories scanned concurrently.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
