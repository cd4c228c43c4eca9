//! Pull request records.

use super::ScanTarget;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An open pull request as returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    /// Repository the pull request belongs to.
    pub repository: ScanTarget,

    /// Globally unique pull request ID.
    pub id: u64,

    /// Pull request number within the repository.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Login of the pull request author.
    pub author: String,

    /// Last time the pull request was updated.
    pub updated_at: DateTime<Utc>,

    /// Browser URL of the pull request.
    pub url: String,

    /// Head branch name, only set when the head lives in the same repository.
    pub head_ref: Option<String>,
}
