//! Organization/repository pairs to be audited.

use serde::Serialize;
use std::fmt;

/// One organization/repository pair to be audited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScanTarget {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repository: String,
}

impl ScanTarget {
    /// Creates a new scan target.
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
        }
    }

    /// Full repository name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository)
    }
}

/// A repository listed under an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Repository owner login.
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Whether the repository is archived (read-only).
    pub archived: bool,
}

impl RepositoryRecord {
    /// Converts the listing into a scan target.
    #[must_use]
    pub fn to_target(&self) -> ScanTarget {
        ScanTarget::new(&self.owner, &self.name)
    }
}
