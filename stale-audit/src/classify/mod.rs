//! Age/threshold classification.
//!
//! [`classify_age`] is the whole algorithm; [`Classifier`] binds it to a
//! [`ThresholdPolicy`] and a fixed "now" so that every record in a scan is
//! measured against the same instant.

mod verdict;

pub use verdict::{Exemption, Verdict};

use crate::config::ThresholdPolicy;
use crate::model::{BranchRecord, DecoratedBranch, PullRequestRecord};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

const HOURS_PER_DAY: i64 = 24;

/// Classifies an age in whole hours against a stale threshold and alert lead.
///
/// Boundaries belong to the lower verdict: exactly `stale_days * 24` hours is
/// still Alerting, exactly `(stale_days - alert_lead_days) * 24` is Ignored.
#[must_use]
pub fn classify_age(age_hours: i64, stale_days: u32, alert_lead_days: u32) -> Verdict {
    let stale_after = i64::from(stale_days) * HOURS_PER_DAY;
    let alert_after = i64::from(stale_days.saturating_sub(alert_lead_days)) * HOURS_PER_DAY;

    if age_hours > stale_after {
        Verdict::Stale
    } else if age_hours > alert_after {
        Verdict::Alerting
    } else {
        Verdict::Ignored
    }
}

/// Whole days left before a record of this age becomes stale; 0 once stale.
#[must_use]
pub fn days_until_stale(age_hours: i64, stale_days: u32) -> u32 {
    let remaining = i64::from(stale_days) * HOURS_PER_DAY - age_hours.max(0);
    if remaining <= 0 {
        return 0;
    }
    // Round up: 1 hour left still reads as "1 day".
    u32::try_from((remaining + HOURS_PER_DAY - 1) / HOURS_PER_DAY).unwrap_or(u32::MAX)
}

/// Applies a [`ThresholdPolicy`] to records as of a fixed instant.
#[derive(Debug, Clone)]
pub struct Classifier {
    policy: Arc<ThresholdPolicy>,
    now: DateTime<Utc>,
}

impl Classifier {
    /// Creates a classifier measuring ages relative to `now`.
    pub fn new(policy: Arc<ThresholdPolicy>, now: DateTime<Utc>) -> Self {
        Self { policy, now }
    }

    /// The policy in use.
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// The reference instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Whole hours elapsed since `timestamp`, truncated. Future timestamps count as 0.
    #[must_use]
    pub fn age_hours(&self, timestamp: DateTime<Utc>) -> i64 {
        (self.now - timestamp).num_hours().max(0)
    }

    /// Classifies a pull request by its last update.
    #[must_use]
    pub fn classify_pull_request(&self, pull: &PullRequestRecord) -> Verdict {
        classify_age(
            self.age_hours(pull.updated_at),
            self.policy.stale_days_for_prs(),
            self.policy.alert_lead_days(),
        )
    }

    /// Checks the branch pre-filters, in order: ignore list, protection, open PR.
    ///
    /// Runs before the head commit is resolved, so exempt branches cost no
    /// commit lookup. `open_pr_heads` holds head ref names of open pull
    /// requests in the branch's repository; it is only consulted when the
    /// policy exempts such branches.
    #[must_use]
    pub fn branch_exemption(
        &self,
        branch: &BranchRecord,
        open_pr_heads: &HashSet<String>,
    ) -> Option<Exemption> {
        if self.policy.is_ignored_branch(&branch.name) {
            Some(Exemption::IgnoredName)
        } else if branch.protected {
            Some(Exemption::Protected)
        } else if self.policy.exempt_pr_branches() && open_pr_heads.contains(&branch.name) {
            Some(Exemption::OpenPullRequest)
        } else {
            None
        }
    }

    /// Classifies a decorated branch, applying the pre-filters first.
    #[must_use]
    pub fn classify_branch(
        &self,
        branch: &DecoratedBranch,
        open_pr_heads: &HashSet<String>,
    ) -> Verdict {
        if self.branch_exemption(&branch.branch, open_pr_heads).is_some() {
            return Verdict::Ignored;
        }

        classify_age(
            self.age_hours(branch.commit.timestamp),
            self.policy.stale_days_for_branches(),
            self.policy.alert_lead_days(),
        )
    }

    /// Days until a pull request of this age is stale.
    #[must_use]
    pub fn pull_request_days_left(&self, age_hours: i64) -> u32 {
        days_until_stale(age_hours, self.policy.stale_days_for_prs())
    }

    /// Days until a branch of this age is stale.
    #[must_use]
    pub fn branch_days_left(&self, age_hours: i64) -> u32 {
        days_until_stale(age_hours, self.policy.stale_days_for_branches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitInfo, ScanTarget};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn classifier(policy: ThresholdPolicy) -> Classifier {
        Classifier::new(Arc::new(policy), now())
    }

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(14, 14, 7, ["master", "develop"]).unwrap()
    }

    fn pull(hours_ago: i64) -> PullRequestRecord {
        PullRequestRecord {
            repository: ScanTarget::new("acme", "widgets"),
            id: 1,
            number: 1,
            title: "Change".to_string(),
            author: "octocat".to_string(),
            updated_at: now() - Duration::hours(hours_ago),
            url: "https://github.com/acme/widgets/pull/1".to_string(),
            head_ref: None,
        }
    }

    fn branch(name: &str, protected: bool, hours_ago: i64) -> DecoratedBranch {
        DecoratedBranch::new(
            BranchRecord {
                repository: ScanTarget::new("acme", "widgets"),
                name: name.to_string(),
                protected,
                head_sha: "abc".to_string(),
                url: "https://api.github.com/repos/acme/widgets/commits/abc".to_string(),
            },
            CommitInfo {
                sha: "abc".to_string(),
                author_login: Some("octocat".to_string()),
                committer_email: None,
                committer_name: None,
                author_email: None,
                author_name: None,
                timestamp: now() - Duration::hours(hours_ago),
            },
        )
    }

    #[test]
    fn boundaries_belong_to_lower_verdict() {
        assert_eq!(classify_age(336, 14, 7), Verdict::Alerting);
        assert_eq!(classify_age(337, 14, 7), Verdict::Stale);
        assert_eq!(classify_age(168, 14, 7), Verdict::Ignored);
        assert_eq!(classify_age(169, 14, 7), Verdict::Alerting);
    }

    #[test]
    fn ranges_partition_ages() {
        for (stale, lead) in [(14, 7), (7, 0), (7, 7), (0, 0), (30, 1)] {
            let stale_after = i64::from(stale) * 24;
            let alert_after = i64::from(stale - lead) * 24;
            for age in 0..=(stale_after + 48) {
                let expected = if age > stale_after {
                    Verdict::Stale
                } else if age > alert_after {
                    Verdict::Alerting
                } else {
                    Verdict::Ignored
                };
                assert_eq!(classify_age(age, stale, lead), expected, "age {age}");
            }
        }
    }

    #[test]
    fn zero_lead_never_alerts() {
        assert_eq!(classify_age(24 * 7, 7, 0), Verdict::Ignored);
        assert_eq!(classify_age(24 * 7 + 1, 7, 0), Verdict::Stale);
    }

    #[test]
    fn pull_request_scenarios() {
        let classifier = classifier(policy());
        assert_eq!(classifier.classify_pull_request(&pull(400)), Verdict::Stale);
        assert_eq!(classifier.classify_pull_request(&pull(200)), Verdict::Alerting);
        assert_eq!(classifier.classify_pull_request(&pull(100)), Verdict::Ignored);
    }

    #[test]
    fn future_timestamps_are_fresh() {
        let classifier = classifier(policy());
        assert_eq!(classifier.age_hours(now() + Duration::hours(5)), 0);
        assert_eq!(classifier.classify_pull_request(&pull(-5)), Verdict::Ignored);
    }

    #[test]
    fn ignored_and_protected_branches_are_always_ignored() {
        let classifier = classifier(policy());
        let heads = HashSet::new();

        assert_eq!(
            classifier.classify_branch(&branch("feature/x", false, 500), &heads),
            Verdict::Stale
        );
        assert_eq!(
            classifier.classify_branch(&branch("master", false, 500), &heads),
            Verdict::Ignored
        );
        assert_eq!(
            classifier.classify_branch(&branch("release", true, 10_000), &heads),
            Verdict::Ignored
        );
        assert_eq!(
            classifier.branch_exemption(&branch("master", true, 0).branch, &heads),
            Some(Exemption::IgnoredName)
        );
        assert_eq!(
            classifier.branch_exemption(&branch("release", true, 0).branch, &heads),
            Some(Exemption::Protected)
        );
    }

    #[test]
    fn open_pr_exemption_follows_policy() {
        let heads: HashSet<String> = ["feature/x".to_string()].into_iter().collect();
        let stale = branch("feature/x", false, 500);

        let without = classifier(policy());
        assert_eq!(without.classify_branch(&stale, &heads), Verdict::Stale);

        let with = classifier(policy().with_pr_branch_exemption(true));
        assert_eq!(with.classify_branch(&stale, &heads), Verdict::Ignored);
        assert_eq!(
            with.branch_exemption(&stale.branch, &heads),
            Some(Exemption::OpenPullRequest)
        );
    }

    #[test]
    fn branches_use_branch_threshold() {
        let policy = ThresholdPolicy::new(30, 10, 5, Vec::<String>::new()).unwrap();
        let classifier = classifier(policy);
        let heads = HashSet::new();

        assert_eq!(
            classifier.classify_branch(&branch("feature/y", false, 24 * 11), &heads),
            Verdict::Stale
        );
        assert_eq!(
            classifier.classify_pull_request(&pull(24 * 11)),
            Verdict::Ignored
        );
    }

    #[test]
    fn counts_days_until_stale() {
        assert_eq!(days_until_stale(200, 14), 6);
        assert_eq!(days_until_stale(335, 14), 1);
        assert_eq!(days_until_stale(336, 14), 0);
        assert_eq!(days_until_stale(400, 14), 0);
        assert_eq!(days_until_stale(-3, 1), 1);
    }
}
