//! Per-repository outcomes.

use serde::Serialize;

/// Result of scanning a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepositoryOutcome {
    /// Every pull request and branch was fetched and classified.
    Scanned {
        /// Repository full name.
        repository: String,
        /// Pull requests examined.
        pull_requests: usize,
        /// Branches examined.
        branches: usize,
        /// Branches skipped because their head commit couldn't be resolved.
        unresolved_branches: usize,
    },

    /// The repository couldn't be fetched; it contributed nothing.
    Failed {
        /// Repository full name.
        repository: String,
        /// Error message.
        error: String,
    },

    /// The scan was cancelled before the repository finished.
    Cancelled {
        /// Repository full name.
        repository: String,
    },
}

impl RepositoryOutcome {
    /// Repository full name.
    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Scanned { repository, .. }
            | Self::Failed { repository, .. }
            | Self::Cancelled { repository } => repository,
        }
    }

    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scanned { .. } => "scanned",
            Self::Failed { .. } => "failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
