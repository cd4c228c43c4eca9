//! Head commit metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity used when a commit carries no usable author or committer data.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Author identity and timestamp of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    /// Commit SHA.
    pub sha: String,

    /// Hosting-service login linked to the commit author, if any.
    pub author_login: Option<String>,

    /// Git committer email.
    pub committer_email: Option<String>,

    /// Git committer name.
    pub committer_name: Option<String>,

    /// Git author email.
    pub author_email: Option<String>,

    /// Git author name.
    pub author_name: Option<String>,

    /// When the commit was authored, falling back to the committer date.
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Returns the identity staleness is attributed to.
    ///
    /// Prefers the author login, then the committer email and name, then the
    /// author email and name. Blank values are skipped.
    #[must_use]
    pub fn identity(&self) -> &str {
        [
            self.author_login.as_deref(),
            self.committer_email.as_deref(),
            self.committer_name.as_deref(),
            self.author_email.as_deref(),
            self.author_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or(UNKNOWN_IDENTITY)
    }
}
