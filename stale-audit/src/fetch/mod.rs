//! Paginated collection retrieval.
//!
//! [`PageSource`] issues single page requests; [`PageFetcher`] drives it from
//! page 1 until the collection is exhausted, so callers see one complete list.

mod error;

pub use error::FetchError;

use crate::model::{BranchRecord, PullRequestRecord, RepositoryRecord, ScanTarget};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Kind of collection being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Repositories of an organization.
    Repositories,
    /// Open pull requests of a repository.
    PullRequests,
    /// Branches of a repository.
    Branches,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Repositories => "repositories",
            Self::PullRequests => "pull_requests",
            Self::Branches => "branches",
        })
    }
}

/// A collection to fetch, together with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// Repositories of an organization.
    Repositories { organization: &'a str },
    /// Open pull requests of a repository.
    PullRequests(&'a ScanTarget),
    /// Branches of a repository.
    Branches(&'a ScanTarget),
}

impl Resource<'_> {
    /// Kind of the collection.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Repositories { .. } => ResourceKind::Repositories,
            Self::PullRequests(_) => ResourceKind::PullRequests,
            Self::Branches(_) => ResourceKind::Branches,
        }
    }
}

impl fmt::Display for Resource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repositories { organization } => write!(f, "{organization} repositories"),
            Self::PullRequests(target) => write!(f, "{target} pull requests"),
            Self::Branches(target) => write!(f, "{target} branches"),
        }
    }
}

/// A record as returned by a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    /// An organization repository.
    Repository(RepositoryRecord),
    /// A pull request.
    PullRequest(PullRequestRecord),
    /// A branch.
    Branch(BranchRecord),
}

/// What the API said about the page after the one just received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Another page exists at this page number.
    Next(u32),
    /// The API reported this as the last page.
    Last,
    /// The response carried no usable pagination metadata.
    Unknown,
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// Records on this page.
    pub items: Vec<RawRecord>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Issues single page requests against the hosting API.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches one page (1-based) of the given collection.
    async fn fetch_page(
        &self,
        resource: Resource<'_>,
        page: u32,
        per_page: u8,
    ) -> Result<PageResponse, FetchError>;

    /// Waits until the source is ready to serve another unit of work.
    ///
    /// Implementations backed by a rate-limited API use this to pause while
    /// quota is low, returning [`FetchError::Cancelled`] if `cancel` fires
    /// first. The default is always ready.
    async fn ready(&self, _cancel: &CancellationToken) -> Result<(), FetchError> {
        Ok(())
    }
}

/// Retrieves complete collections by following pagination until exhaustion.
pub struct PageFetcher<S: ?Sized> {
    source: Arc<S>,
    per_page: u8,
    cancel: CancellationToken,
}

impl<S: PageSource + ?Sized> PageFetcher<S> {
    /// Creates a fetcher requesting `per_page` records per page.
    pub fn new(source: Arc<S>, per_page: u8, cancel: CancellationToken) -> Self {
        Self {
            source,
            per_page: per_page.max(1),
            cancel,
        }
    }

    /// Fetches every record of a collection.
    ///
    /// Pages are requested in strictly increasing order starting at 1, so no
    /// page is ever requested twice. Fetching stops on an empty page, when
    /// the API reports no next page, or, without pagination metadata, when a
    /// page comes back short.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] from the source, or
    /// [`FetchError::Cancelled`] if cancellation is requested between pages.
    pub async fn fetch_all(&self, resource: Resource<'_>) -> Result<Vec<RawRecord>, FetchError> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            if self.cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            debug!(resource = %resource, page, "Requesting page");
            let response = self.source.fetch_page(resource, page, self.per_page).await?;
            let received = response.items.len();
            records.extend(response.items);

            if received == 0 {
                break;
            }

            match response.pagination {
                Pagination::Next(next) if next > page => page = next,
                Pagination::Next(next) => {
                    warn!(resource = %resource, page, next, "Next page does not advance, stopping");
                    break;
                }
                Pagination::Last => break,
                Pagination::Unknown if received < usize::from(self.per_page) => break,
                Pagination::Unknown => page += 1,
            }
        }

        debug!(resource = %resource, count = records.len(), "Collection fetched");
        Ok(records)
    }

    /// Fetches all repositories of an organization.
    pub async fn repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryRecord>, FetchError> {
        let records = self
            .fetch_all(Resource::Repositories { organization })
            .await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match record {
                RawRecord::Repository(repository) => Some(repository),
                _ => None,
            })
            .collect())
    }

    /// Fetches all open pull requests of a repository.
    pub async fn pull_requests(
        &self,
        target: &ScanTarget,
    ) -> Result<Vec<PullRequestRecord>, FetchError> {
        let records = self.fetch_all(Resource::PullRequests(target)).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match record {
                RawRecord::PullRequest(pull) => Some(pull),
                _ => None,
            })
            .collect())
    }

    /// Fetches all branches of a repository.
    pub async fn branches(&self, target: &ScanTarget) -> Result<Vec<BranchRecord>, FetchError> {
        let records = self.fetch_all(Resource::Branches(target)).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match record {
                RawRecord::Branch(branch) => Some(branch),
                _ => None,
            })
            .collect())
    }
}
