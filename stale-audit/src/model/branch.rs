//! Branch records and their commit decoration.

use super::{CommitInfo, ScanTarget};
use serde::Serialize;

/// A branch as listed by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRecord {
    /// Repository the branch belongs to.
    pub repository: ScanTarget,

    /// Branch name.
    pub name: String,

    /// Whether branch protection is enabled.
    pub protected: bool,

    /// SHA of the head commit.
    pub head_sha: String,

    /// API URL of the head commit.
    pub url: String,
}

/// A branch paired with its resolved head commit; the unit that gets classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratedBranch {
    /// The branch listing.
    pub branch: BranchRecord,

    /// Metadata of the branch head commit.
    pub commit: CommitInfo,
}

impl DecoratedBranch {
    /// Pairs a branch with its head commit.
    #[must_use]
    pub fn new(branch: BranchRecord, commit: CommitInfo) -> Self {
        Self { branch, commit }
    }

    /// Identity the branch is attributed to.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.commit.identity()
    }
}
