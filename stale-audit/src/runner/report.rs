//! Final scan output.

use crate::aggregate::ScanResult;
use crate::summary::{RepositoryOutcome, RunSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a scan produced, handed read-only to reporting consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Instant all ages were measured against.
    pub scanned_at: DateTime<Utc>,

    /// Flagged records by user.
    pub result: ScanResult,

    /// Counters for the run.
    pub summary: RunSummary,

    /// Per-repository outcomes, in completion order.
    pub outcomes: Vec<RepositoryOutcome>,
}

impl ScanReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(scanned_at: DateTime<Utc>) -> Self {
        Self {
            scanned_at,
            result: ScanResult::new(),
            summary: RunSummary::new(),
            outcomes: Vec::new(),
        }
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Outcomes of repositories that failed.
    pub fn failed(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RepositoryOutcome::Failed { .. }))
    }
}
