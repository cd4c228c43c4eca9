//! Staleness thresholds and branch exclusion rules.

use super::ConfigError;
use std::collections::HashSet;

/// Immutable staleness/alert windows and exclusion rules.
///
/// The alert zone for a resource is `[stale_days - alert_lead_days, stale_days)`
/// days of inactivity; construction guarantees it never starts below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdPolicy {
    stale_days_for_prs: u32,
    stale_days_for_branches: u32,
    alert_lead_days: u32,
    ignored_branch_names: HashSet<String>,
    exempt_pr_branches: bool,
}

impl ThresholdPolicy {
    /// Builds a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] when `alert_lead_days` exceeds
    /// either stale threshold.
    pub fn new<I, S>(
        stale_days_for_prs: u32,
        stale_days_for_branches: u32,
        alert_lead_days: u32,
        ignored_branch_names: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if alert_lead_days > stale_days_for_prs {
            return Err(ConfigError::InvalidPolicy {
                message: format!(
                    "alert days ({alert_lead_days}) must not exceed pull request stale days ({stale_days_for_prs})"
                ),
            });
        }
        if alert_lead_days > stale_days_for_branches {
            return Err(ConfigError::InvalidPolicy {
                message: format!(
                    "alert days ({alert_lead_days}) must not exceed branch stale days ({stale_days_for_branches})"
                ),
            });
        }

        let ignored_branch_names = ignored_branch_names
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Ok(Self {
            stale_days_for_prs,
            stale_days_for_branches,
            alert_lead_days,
            ignored_branch_names,
            exempt_pr_branches: false,
        })
    }

    /// Exempts branches that back an open pull request in the same repository.
    #[must_use]
    pub fn with_pr_branch_exemption(mut self, exempt: bool) -> Self {
        self.exempt_pr_branches = exempt;
        self
    }

    /// Days of inactivity after which a pull request is stale.
    pub fn stale_days_for_prs(&self) -> u32 {
        self.stale_days_for_prs
    }

    /// Days of inactivity after which a branch is stale.
    pub fn stale_days_for_branches(&self) -> u32 {
        self.stale_days_for_branches
    }

    /// Days before the stale cutoff at which alerting starts.
    pub fn alert_lead_days(&self) -> u32 {
        self.alert_lead_days
    }

    /// Branch names that are never classified.
    pub fn ignored_branch_names(&self) -> &HashSet<String> {
        &self.ignored_branch_names
    }

    /// Returns true if the branch name is on the ignore list.
    pub fn is_ignored_branch(&self, name: &str) -> bool {
        self.ignored_branch_names.contains(name)
    }

    /// Whether branches with an open pull request are exempt.
    pub fn exempt_pr_branches(&self) -> bool {
        self.exempt_pr_branches
    }
}

/// Splits a comma-separated list into a set of names, dropping blanks.
pub fn parse_name_list(list: &str) -> HashSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
