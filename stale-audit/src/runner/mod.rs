//! Orchestrates a stale pull request and branch scan.
//!
//! Organizations are enumerated one after another; the resulting
//! repositories are then scanned concurrently. Each repository fills its own
//! [`ScanResult`] batch, which is merged into the run's result only once the
//! repository completes, so a failed or cancelled repository contributes
//! nothing.

mod config;
mod error;
mod report;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use report::ScanReport;

use crate::aggregate::{accumulate, Flagged, ScanResult};
use crate::classify::Classifier;
use crate::config::{ScanConfig, ThresholdPolicy};
use crate::fetch::{FetchError, PageFetcher, PageSource};
use crate::github::GitHubClient;
use crate::model::{DecoratedBranch, ScanTarget};
use crate::resolve::{CachingResolver, CommitResolver};
use crate::summary::{RepositoryOutcome, RunSummary};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Runner wired to the GitHub REST API.
pub type GitHubRunner = Runner<GitHubClient, CachingResolver<Arc<GitHubClient>>>;

/// Orchestrates a full scan.
pub struct Runner<S, R> {
    source: Arc<S>,
    resolver: Arc<R>,
    policy: Arc<ThresholdPolicy>,
    scan: ScanConfig,
}

/// Result of one repository, before it is folded into the run.
struct RepositoryScan {
    outcome: RepositoryOutcome,
    batch: Option<ScanResult>,
}

/// Counters gathered while classifying one repository.
struct RepositoryCounts {
    pull_requests: usize,
    branches: usize,
    unresolved_branches: usize,
}

impl GitHubRunner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let client = Arc::new(GitHubClient::new(
            config.token(),
            config.api_url(),
            config.scan().concurrency(),
        )?);
        let resolver = Arc::new(CachingResolver::new(client.clone()));

        Ok(Self::with_clients(
            client,
            resolver,
            config.policy().clone(),
            config.scan().clone(),
        ))
    }
}

impl<S, R> Runner<S, R>
where
    S: PageSource + 'static,
    R: CommitResolver + 'static,
{
    /// Builds a runner over arbitrary page and commit sources.
    pub fn with_clients(
        source: Arc<S>,
        resolver: Arc<R>,
        policy: ThresholdPolicy,
        scan: ScanConfig,
    ) -> Self {
        Self {
            source,
            resolver,
            policy: Arc::new(policy),
            scan,
        }
    }

    /// The threshold policy in use.
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// The scan scope in use.
    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Executes the full scan, measuring ages against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Auth`] if credentials are rejected before any
    /// repository is scanned. Per-repository failures are reported in the
    /// returned [`ScanReport`] instead.
    pub async fn run(&self, cancel: CancellationToken) -> Result<ScanReport, RunnerError> {
        self.run_at(Utc::now(), cancel).await
    }

    /// Executes the full scan, measuring ages against `now`.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> Result<ScanReport, RunnerError> {
        let mut report = ScanReport::new(now);

        if cancel.is_cancelled() {
            info!("Scan cancelled before start");
            report.summary.cancelled = true;
            return Ok(report);
        }

        match self.source.ready(&cancel).await {
            Ok(()) => {}
            Err(FetchError::Cancelled) => {
                info!("Scan cancelled while waiting for rate limit");
                report.summary.cancelled = true;
                return Ok(report);
            }
            Err(e) if e.is_auth() => {
                return Err(RunnerError::Auth {
                    message: e.to_string(),
                });
            }
            Err(e) => warn!(error = %e, "Rate limit check failed, continuing"),
        }

        let fetcher = PageFetcher::new(self.source.clone(), self.scan.per_page(), cancel.clone());
        let targets = self.discover_targets(&fetcher, &mut report.summary).await?;

        if targets.is_empty() {
            warn!("No repositories to scan");
            return Ok(report);
        }

        info!(
            count = targets.len(),
            concurrency = self.scan.concurrency(),
            "Scanning repositories"
        );

        let classifier = Classifier::new(self.policy.clone(), now);
        let mut scans = stream::iter(targets)
            .map(|target| self.scan_repository(&fetcher, &classifier, target, &cancel))
            .buffer_unordered(self.scan.concurrency());

        while let Some(scan) = scans.next().await {
            report.summary.record_result(&scan.outcome);
            if let Some(batch) = scan.batch {
                report.result.merge(batch);
            }
            report.outcomes.push(scan.outcome);
        }

        if cancel.is_cancelled() {
            report.summary.cancelled = true;
        }

        info!(
            scanned = report.summary.repositories_scanned,
            failed = report.summary.repositories_failed,
            flagged = report.result.total(),
            "Scan complete"
        );
        Ok(report)
    }

    /// Lists every organization's repositories and applies the scope filters.
    async fn discover_targets(
        &self,
        fetcher: &PageFetcher<S>,
        summary: &mut RunSummary,
    ) -> Result<Vec<ScanTarget>, RunnerError> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();

        for organization in self.scan.organizations() {
            let span = info_span!("organization", org = %organization);
            let repositories = match fetcher.repositories(organization).instrument(span).await {
                Ok(repositories) => repositories,
                Err(FetchError::Cancelled) => {
                    info!("Scan cancelled during repository discovery");
                    summary.cancelled = true;
                    break;
                }
                Err(e) if e.is_auth() => {
                    return Err(RunnerError::Auth {
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    error!(org = %organization, error = %e, "Failed to list repositories");
                    summary.organizations_failed += 1;
                    continue;
                }
            };

            info!(org = %organization, count = repositories.len(), "Found repositories");
            summary.organizations_scanned += 1;
            summary.repositories_discovered += repositories.len();

            for repository in repositories {
                let excluded = !self.scan.matches_repository(&repository.name)
                    || (repository.archived && !self.scan.include_archived());
                if excluded {
                    debug!(
                        repo = %repository.name,
                        archived = repository.archived,
                        "Repository filtered out"
                    );
                    summary.repositories_filtered += 1;
                    continue;
                }

                let target = repository.to_target();
                if seen.insert(target.clone()) {
                    targets.push(target);
                }
            }
        }

        Ok(targets)
    }

    async fn scan_repository(
        &self,
        fetcher: &PageFetcher<S>,
        classifier: &Classifier,
        target: ScanTarget,
        cancel: &CancellationToken,
    ) -> RepositoryScan {
        let repository = target.full_name();
        let span = info_span!("repository", repo = %repository);

        async {
            if cancel.is_cancelled() {
                return RepositoryScan {
                    outcome: RepositoryOutcome::Cancelled { repository },
                    batch: None,
                };
            }

            match self.source.ready(cancel).await {
                Ok(()) => {}
                Err(FetchError::Cancelled) => {
                    return RepositoryScan {
                        outcome: RepositoryOutcome::Cancelled { repository },
                        batch: None,
                    };
                }
                Err(e) => warn!(error = %e, "Rate limit check failed, continuing"),
            }

            info!("Scanning repository");
            match self
                .classify_repository(fetcher, classifier, &target, cancel)
                .await
            {
                Ok((batch, counts)) => {
                    info!(
                        pull_requests = counts.pull_requests,
                        branches = counts.branches,
                        unresolved = counts.unresolved_branches,
                        flagged = batch.total(),
                        "Repository scanned"
                    );
                    RepositoryScan {
                        outcome: RepositoryOutcome::Scanned {
                            repository,
                            pull_requests: counts.pull_requests,
                            branches: counts.branches,
                            unresolved_branches: counts.unresolved_branches,
                        },
                        batch: Some(batch),
                    }
                }
                Err(FetchError::Cancelled) => {
                    info!("Repository scan cancelled, discarding partial results");
                    RepositoryScan {
                        outcome: RepositoryOutcome::Cancelled { repository },
                        batch: None,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to scan repository, skipping");
                    RepositoryScan {
                        outcome: RepositoryOutcome::Failed {
                            repository,
                            error: e.to_string(),
                        },
                        batch: None,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Fetches, classifies and buckets one repository's records.
    ///
    /// A branch whose head commit can't be resolved is skipped and counted;
    /// it never lands in a bucket and never affects other branches.
    async fn classify_repository(
        &self,
        fetcher: &PageFetcher<S>,
        classifier: &Classifier,
        target: &ScanTarget,
        cancel: &CancellationToken,
    ) -> Result<(ScanResult, RepositoryCounts), FetchError> {
        let pulls = fetcher.pull_requests(target).await?;
        let branches = fetcher.branches(target).await?;

        let mut batch = ScanResult::new();
        let mut counts = RepositoryCounts {
            pull_requests: pulls.len(),
            branches: branches.len(),
            unresolved_branches: 0,
        };

        let open_pr_heads: HashSet<String> =
            pulls.iter().filter_map(|pull| pull.head_ref.clone()).collect();

        for pull in pulls {
            let verdict = classifier.classify_pull_request(&pull);
            let age_hours = classifier.age_hours(pull.updated_at);
            debug!(
                number = pull.number,
                author = %pull.author,
                age_hours,
                verdict = %verdict,
                "Classified pull request"
            );

            let identity = pull.author.clone();
            let entry = Flagged::new(pull, age_hours, classifier.pull_request_days_left(age_hours));
            accumulate(verdict, entry, &identity, &mut batch);
        }

        for branch in branches {
            if let Some(exemption) = classifier.branch_exemption(&branch, &open_pr_heads) {
                debug!(branch = %branch.name, reason = %exemption, "Branch exempt");
                continue;
            }

            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let commit = match self
                .resolver
                .resolve(&target.owner, &target.repository, &branch.head_sha)
                .await
            {
                Ok(commit) => commit,
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(
                        branch = %branch.name,
                        sha = %branch.head_sha,
                        error = %e,
                        "Could not resolve head commit, skipping branch"
                    );
                    counts.unresolved_branches += 1;
                    continue;
                }
            };

            let decorated = DecoratedBranch::new(branch, commit);
            let verdict = classifier.classify_branch(&decorated, &open_pr_heads);
            let age_hours = classifier.age_hours(decorated.commit.timestamp);
            debug!(
                branch = %decorated.branch.name,
                identity = %decorated.identity(),
                age_hours,
                verdict = %verdict,
                "Classified branch"
            );

            let identity = decorated.identity().to_string();
            let entry = Flagged::new(decorated, age_hours, classifier.branch_days_left(age_hours));
            accumulate(verdict, entry, &identity, &mut batch);
        }

        Ok((batch, counts))
    }
}
