//! Per-user aggregation of classified records.
//!
//! [`ScanResult`] holds four user-keyed buckets. Records are appended with
//! [`accumulate`]; a repository builds its own batch and the batch is folded
//! into the run's result with [`ScanResult::merge`] only once the repository
//! has been fully processed.

mod flagged;

pub use flagged::Flagged;

use crate::classify::Verdict;
use crate::model::{DecoratedBranch, PullRequestRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Records per user identity, in discovery order.
pub type UserBuckets<T> = BTreeMap<String, Vec<Flagged<T>>>;

/// Stale and alerting records keyed by the responsible user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Pull requests past the stale threshold, by author login.
    pub stale_pull_requests: UserBuckets<PullRequestRecord>,

    /// Pull requests approaching the stale threshold, by author login.
    pub alerting_pull_requests: UserBuckets<PullRequestRecord>,

    /// Branches past the stale threshold, by head commit identity.
    pub stale_branches: UserBuckets<DecoratedBranch>,

    /// Branches approaching the stale threshold, by head commit identity.
    pub alerting_branches: UserBuckets<DecoratedBranch>,
}

/// A record type with a stale and an alerting bucket in [`ScanResult`].
pub trait Bucketed: Sized {
    /// Returns the (stale, alerting) buckets for this record type.
    fn buckets(result: &mut ScanResult) -> (&mut UserBuckets<Self>, &mut UserBuckets<Self>);
}

impl Bucketed for PullRequestRecord {
    fn buckets(result: &mut ScanResult) -> (&mut UserBuckets<Self>, &mut UserBuckets<Self>) {
        (
            &mut result.stale_pull_requests,
            &mut result.alerting_pull_requests,
        )
    }
}

impl Bucketed for DecoratedBranch {
    fn buckets(result: &mut ScanResult) -> (&mut UserBuckets<Self>, &mut UserBuckets<Self>) {
        (&mut result.stale_branches, &mut result.alerting_branches)
    }
}

/// Appends a record to the bucket matching its verdict under `identity`.
///
/// Ignored records are dropped. Returns true if the record was stored. Each
/// record must be accumulated at most once per scan; calling this twice with
/// the same record stores it twice.
pub fn accumulate<T: Bucketed>(
    verdict: Verdict,
    entry: Flagged<T>,
    identity: &str,
    result: &mut ScanResult,
) -> bool {
    let (stale, alerting) = T::buckets(result);
    let bucket = match verdict {
        Verdict::Ignored => return false,
        Verdict::Stale => stale,
        Verdict::Alerting => alerting,
    };

    bucket.entry(identity.to_string()).or_default().push(entry);
    true
}

fn merge_buckets<T>(into: &mut UserBuckets<T>, from: UserBuckets<T>) {
    for (user, records) in from {
        into.entry(user).or_default().extend(records);
    }
}

fn count<T>(buckets: &UserBuckets<T>) -> usize {
    buckets.values().map(Vec::len).sum()
}

impl ScanResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every record of `other`, keeping each user's order.
    pub fn merge(&mut self, other: ScanResult) {
        merge_buckets(&mut self.stale_pull_requests, other.stale_pull_requests);
        merge_buckets(&mut self.alerting_pull_requests, other.alerting_pull_requests);
        merge_buckets(&mut self.stale_branches, other.stale_branches);
        merge_buckets(&mut self.alerting_branches, other.alerting_branches);
    }

    /// Returns true if no record was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total flagged records across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.stale_pull_request_count()
            + self.alerting_pull_request_count()
            + self.stale_branch_count()
            + self.alerting_branch_count()
    }

    /// Number of stale pull requests.
    #[must_use]
    pub fn stale_pull_request_count(&self) -> usize {
        count(&self.stale_pull_requests)
    }

    /// Number of alerting pull requests.
    #[must_use]
    pub fn alerting_pull_request_count(&self) -> usize {
        count(&self.alerting_pull_requests)
    }

    /// Number of stale branches.
    #[must_use]
    pub fn stale_branch_count(&self) -> usize {
        count(&self.stale_branches)
    }

    /// Number of alerting branches.
    #[must_use]
    pub fn alerting_branch_count(&self) -> usize {
        count(&self.alerting_branches)
    }

    /// Every identity with at least one flagged record, sorted.
    #[must_use]
    pub fn users(&self) -> BTreeSet<&str> {
        self.stale_pull_requests
            .keys()
            .chain(self.alerting_pull_requests.keys())
            .chain(self.stale_branches.keys())
            .chain(self.alerting_branches.keys())
            .map(String::as_str)
            .collect()
    }
}
