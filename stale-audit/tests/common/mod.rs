//! In-memory hosting service for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use stale_audit::{
    BranchRecord, CommitInfo, CommitResolver, FetchError, PageResponse, PageSource, Pagination,
    PullRequestRecord, RawRecord, RepositoryRecord, Resource, ScanTarget,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Fixed reference instant for every test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

#[derive(Default)]
pub struct MockHost {
    repositories: HashMap<String, Vec<RepositoryRecord>>,
    pulls: HashMap<String, Vec<PullRequestRecord>>,
    branches: HashMap<String, Vec<BranchRecord>>,
    commits: HashMap<String, CommitInfo>,
    failing: HashSet<String>,
    auth_failure: bool,
    cancel_on: Option<(String, CancellationToken)>,
    throttle_from: Option<usize>,
    ready_calls: Mutex<usize>,
    resolved: Mutex<Vec<String>>,
    page_requests: Mutex<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository(mut self, org: &str, name: &str, archived: bool) -> Self {
        self.repositories
            .entry(org.to_string())
            .or_default()
            .push(RepositoryRecord {
                owner: org.to_string(),
                name: name.to_string(),
                archived,
            });
        self
    }

    pub fn pull(mut self, repo: &ScanTarget, number: u64, author: &str, age_hours: i64) -> Self {
        self.pulls
            .entry(repo.full_name())
            .or_default()
            .push(PullRequestRecord {
                repository: repo.clone(),
                id: 1000 + number,
                number,
                title: format!("PR {number}"),
                author: author.to_string(),
                updated_at: hours_ago(age_hours),
                url: format!("https://github.com/{}/pull/{number}", repo.full_name()),
                head_ref: Some(format!("pr-{number}")),
            });
        self
    }

    pub fn branch(
        mut self,
        repo: &ScanTarget,
        name: &str,
        protected: bool,
        author: Option<&str>,
        age_hours: i64,
    ) -> Self {
        let sha = format!("{}-{name}", repo.full_name());
        self.branches
            .entry(repo.full_name())
            .or_default()
            .push(BranchRecord {
                repository: repo.clone(),
                name: name.to_string(),
                protected,
                head_sha: sha.clone(),
                url: format!("https://api.github.com/repos/{}/commits/{sha}", repo.full_name()),
            });
        if let Some(author) = author {
            self.commits.insert(
                sha.clone(),
                CommitInfo {
                    sha,
                    author_login: Some(author.to_string()),
                    committer_email: Some(format!("{author}@example.com")),
                    committer_name: Some(author.to_string()),
                    author_email: None,
                    author_name: None,
                    timestamp: hours_ago(age_hours),
                },
            );
        }
        self
    }

    /// Makes every list request for `full_name` fail with a transport error.
    pub fn failing(mut self, full_name: &str) -> Self {
        self.failing.insert(full_name.to_string());
        self
    }

    pub fn rejecting_credentials(mut self) -> Self {
        self.auth_failure = true;
        self
    }

    /// Cancels `token` while resolving the given branch's head commit.
    pub fn cancel_on(mut self, repo: &ScanTarget, branch: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((format!("{}-{branch}", repo.full_name()), token));
        self
    }

    /// Makes the `call`th readiness check (0-based) and every later one wait
    /// an hour for quota, or until cancelled.
    pub fn throttle_from(mut self, call: usize) -> Self {
        self.throttle_from = Some(call);
        self
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    fn page_of(records: Vec<RawRecord>, page: u32, per_page: u8) -> PageResponse {
        let per_page = usize::from(per_page);
        let start = (page as usize - 1) * per_page;
        let items: Vec<RawRecord> = records.into_iter().skip(start).take(per_page + 1).collect();
        let has_more = items.len() > per_page;
        PageResponse {
            items: items.into_iter().take(per_page).collect(),
            pagination: if has_more {
                Pagination::Next(page + 1)
            } else {
                Pagination::Last
            },
        }
    }
}

#[async_trait]
impl PageSource for MockHost {
    async fn fetch_page(
        &self,
        resource: Resource<'_>,
        page: u32,
        per_page: u8,
    ) -> Result<PageResponse, FetchError> {
        self.page_requests
            .lock()
            .unwrap()
            .push(format!("{resource} #{page}"));
        tokio::task::yield_now().await;

        if self.auth_failure {
            return Err(FetchError::Auth {
                message: "Bad credentials".to_string(),
            });
        }

        let records = match resource {
            Resource::Repositories { organization } => {
                if self.failing.contains(organization) {
                    return Err(FetchError::transport("connection reset"));
                }
                self.repositories
                    .get(organization)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawRecord::Repository)
                    .collect()
            }
            Resource::PullRequests(target) => {
                if self.failing.contains(&target.full_name()) {
                    return Err(FetchError::transport("connection reset"));
                }
                self.pulls
                    .get(&target.full_name())
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawRecord::PullRequest)
                    .collect()
            }
            Resource::Branches(target) => self
                .branches
                .get(&target.full_name())
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(RawRecord::Branch)
                .collect(),
        };

        Ok(Self::page_of(records, page, per_page))
    }

    async fn ready(&self, cancel: &CancellationToken) -> Result<(), FetchError> {
        let call = {
            let mut calls = self.ready_calls.lock().unwrap();
            *calls += 1;
            *calls - 1
        };
        if !self.throttle_from.is_some_and(|from| call >= from) {
            return Ok(());
        }

        tokio::select! {
            () = tokio::time::sleep(std::time::Duration::from_secs(3600)) => Ok(()),
            () = cancel.cancelled() => Err(FetchError::Cancelled),
        }
    }
}

#[async_trait]
impl CommitResolver for MockHost {
    async fn resolve(
        &self,
        _owner: &str,
        _repo: &str,
        sha: &str,
    ) -> Result<CommitInfo, FetchError> {
        self.resolved.lock().unwrap().push(sha.to_string());
        tokio::task::yield_now().await;

        if let Some((trigger, token)) = &self.cancel_on {
            if trigger == sha {
                token.cancel();
            }
        }

        self.commits
            .get(sha)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                resource: format!("commit {sha}"),
            })
    }
}
