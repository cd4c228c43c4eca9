//! Run summary types.

use super::result::RepositoryOutcome;
use serde::Serialize;

/// Summary of a complete scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Organizations enumerated successfully.
    pub organizations_scanned: usize,

    /// Organizations whose repository listing failed.
    pub organizations_failed: usize,

    /// Repositories listed across all organizations.
    pub repositories_discovered: usize,

    /// Repositories excluded by the name pattern or archive filter.
    pub repositories_filtered: usize,

    /// Repositories fully scanned.
    pub repositories_scanned: usize,

    /// Repositories skipped because of a fetch error.
    pub repositories_failed: usize,

    /// Repositories abandoned because of cancellation.
    pub repositories_cancelled: usize,

    /// Pull requests examined.
    pub pull_requests_examined: usize,

    /// Branches examined.
    pub branches_examined: usize,

    /// Branches whose head commit couldn't be resolved.
    pub branches_unresolved: usize,

    /// Whether the scan was cancelled.
    pub cancelled: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a repository outcome.
    pub fn record_result(&mut self, result: &RepositoryOutcome) {
        match result {
            RepositoryOutcome::Scanned {
                pull_requests,
                branches,
                unresolved_branches,
                ..
            } => {
                self.repositories_scanned += 1;
                self.pull_requests_examined += pull_requests;
                self.branches_examined += branches;
                self.branches_unresolved += unresolved_branches;
            }
            RepositoryOutcome::Failed { .. } => self.repositories_failed += 1,
            RepositoryOutcome::Cancelled { .. } => {
                self.repositories_cancelled += 1;
                self.cancelled = true;
            }
        }
    }

    /// Returns true if any repository or organization was skipped due to errors.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.repositories_failed > 0 || self.organizations_failed > 0
    }

    /// Returns true if everything was scanned without errors or cancellation.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures() && !self.cancelled
    }
}
