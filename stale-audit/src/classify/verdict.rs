//! Classification outcomes.

use serde::Serialize;
use std::fmt;

/// Outcome of classifying one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Neither stale nor close to it, or exempt.
    Ignored,
    /// Approaching the stale threshold.
    Alerting,
    /// Past the stale threshold.
    Stale,
}

impl Verdict {
    /// Returns the verdict as a string for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Alerting => "alerting",
            Self::Stale => "stale",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a branch was exempted before its age was considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exemption {
    /// Branch name is on the ignore list.
    IgnoredName,
    /// Branch protection is enabled.
    Protected,
    /// Branch is the head of an open pull request.
    OpenPullRequest,
}

impl Exemption {
    /// Returns the exemption as a string for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoredName => "ignored_name",
            Self::Protected => "protected",
            Self::OpenPullRequest => "open_pull_request",
        }
    }
}

impl fmt::Display for Exemption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
