//! Scan configuration.
//!
//! Settings start from built-in defaults, are overlaid by an optional
//! `stale-audit.toml` file, and finally by command-line values. Validation
//! happens once, when [`Settings`] is turned into a [`ThresholdPolicy`] and a
//! [`ScanConfig`]; the pipeline only ever sees validated values.

mod error;
mod file;
mod policy;
mod scan;

pub use error::ConfigError;
pub use file::ConfigFile;
pub use policy::{parse_name_list, ThresholdPolicy};
pub use scan::{ScanConfig, MAX_PER_PAGE};

use tracing::debug;
use url::Url;

/// Default branches that are never reported.
pub const DEFAULT_IGNORE_BRANCHES: &str = "master,develop";

/// Unresolved settings, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Organizations to audit.
    pub organizations: Vec<String>,
    /// Inactive days before a pull request is stale.
    pub pr_stale_days: u32,
    /// Inactive days before a branch is stale.
    pub branch_stale_days: u32,
    /// Days before the stale cutoff at which alerting starts.
    pub alert_days: u32,
    /// Branch names that are never reported.
    pub ignore_branches: Vec<String>,
    /// Regular expression repository names must match.
    pub repo_pattern: String,
    /// Exempt branches that back an open pull request.
    pub exempt_pr_branches: bool,
    /// Scan archived repositories too.
    pub include_archived: bool,
    /// GitHub (Enterprise) API base URL; `None` means api.github.com.
    pub api_url: Option<String>,
    /// Maximum repositories scanned concurrently.
    pub concurrency: usize,
    /// Records requested per page.
    pub per_page: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organizations: Vec::new(),
            pr_stale_days: 14,
            branch_stale_days: 14,
            alert_days: 7,
            ignore_branches: parse_name_list(DEFAULT_IGNORE_BRANCHES)
                .into_iter()
                .collect(),
            repo_pattern: ".*".to_string(),
            exempt_pr_branches: false,
            include_archived: false,
            api_url: None,
            concurrency: 5,
            per_page: MAX_PER_PAGE,
        }
    }
}

impl Settings {
    /// Overlays every key present in the config file.
    pub fn merge_file(&mut self, file: ConfigFile) {
        debug!("Applying config file values");
        if let Some(organizations) = file.organizations {
            self.organizations = organizations;
        }
        if let Some(days) = file.pr_stale_days {
            self.pr_stale_days = days;
        }
        if let Some(days) = file.branch_stale_days {
            self.branch_stale_days = days;
        }
        if let Some(days) = file.alert_days {
            self.alert_days = days;
        }
        if let Some(names) = file.ignore_branches {
            self.ignore_branches = names;
        }
        if let Some(pattern) = file.repo_pattern {
            self.repo_pattern = pattern;
        }
        if let Some(exempt) = file.exempt_pr_branches {
            self.exempt_pr_branches = exempt;
        }
        if let Some(include) = file.include_archived {
            self.include_archived = include;
        }
        if file.api_url.is_some() {
            self.api_url = file.api_url;
        }
        if let Some(concurrency) = file.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(per_page) = file.per_page {
            self.per_page = per_page;
        }
    }

    /// Builds the threshold policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] if the alert window is too wide.
    pub fn policy(&self) -> Result<ThresholdPolicy, ConfigError> {
        Ok(ThresholdPolicy::new(
            self.pr_stale_days,
            self.branch_stale_days,
            self.alert_days,
            self.ignore_branches.iter().cloned(),
        )?
        .with_pr_branch_exemption(self.exempt_pr_branches))
    }

    /// Builds the scan scope.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any scope setting is invalid.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        Ok(ScanConfig::new(
            self.organizations.clone(),
            &self.repo_pattern,
            self.per_page,
            self.concurrency,
        )?
        .with_archived(self.include_archived))
    }

    /// Parses the API URL, if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL doesn't parse.
    pub fn api_url(&self) -> Result<Option<Url>, ConfigError> {
        self.api_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
                    url: url.to_string(),
                    source: e,
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.pr_stale_days, 14);
        assert_eq!(settings.branch_stale_days, 14);
        assert_eq!(settings.alert_days, 7);
        assert_eq!(settings.concurrency, 5);
        assert_eq!(settings.per_page, 100);

        let policy = settings.policy().unwrap();
        assert!(policy.is_ignored_branch("master"));
        assert!(policy.is_ignored_branch("develop"));
    }

    #[test]
    fn default_pull_request_alert_window_is_open() {
        let policy = Settings::default().policy().unwrap();
        let eight_days = 8 * 24;

        assert_eq!(
            crate::classify::classify_age(
                eight_days,
                policy.stale_days_for_prs(),
                policy.alert_lead_days()
            ),
            crate::classify::Verdict::Alerting
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        settings.merge_file(ConfigFile {
            organizations: Some(vec!["acme".to_string()]),
            alert_days: Some(2),
            ignore_branches: Some(vec!["main".to_string()]),
            ..Default::default()
        });

        assert_eq!(settings.organizations, vec!["acme".to_string()]);
        assert_eq!(settings.alert_days, 2);
        assert_eq!(settings.pr_stale_days, 14);

        let policy = settings.policy().unwrap();
        assert!(policy.is_ignored_branch("main"));
        assert!(!policy.is_ignored_branch("master"));
    }

    #[test]
    fn invalid_alert_window_is_config_error() {
        let settings = Settings {
            pr_stale_days: 3,
            ..Default::default()
        };
        assert!(matches!(
            settings.policy(),
            Err(ConfigError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn parses_api_url() {
        let mut settings = Settings::default();
        assert!(settings.api_url().unwrap().is_none());

        settings.api_url = Some("https://github.example.com/api/v3/".to_string());
        let url = settings.api_url().unwrap().unwrap();
        assert_eq!(url.host_str(), Some("github.example.com"));

        settings.api_url = Some("not a url".to_string());
        assert!(matches!(
            settings.api_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
