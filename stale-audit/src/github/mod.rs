//! GitHub REST client.
//!
//! [`GitHubClient`] implements [`PageSource`] and [`CommitResolver`] on top of
//! octocrab. Every request passes through a shared [`RequestGate`] so the
//! number of in-flight calls stays bounded no matter how many repositories are
//! scanned at once.

mod error;
mod wire;

use crate::fetch::{FetchError, PageResponse, PageSource, Pagination, RawRecord, Resource};
use crate::model::CommitInfo;
use crate::rate_limit::{check_core_rate_limit, wait_if_needed, RequestGate};
use crate::resolve::CommitResolver;
use async_trait::async_trait;
use error::classify_error;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;
use wire::{BranchDto, CommitDto, PullRequestDto, RepositoryDto};

/// Query parameters shared by all list endpoints.
#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
}

/// Octocrab-backed hosting client.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    gate: RequestGate,
}

impl GitHubClient {
    /// Builds an authenticated client.
    ///
    /// `api_url` selects a GitHub Enterprise instance; `None` targets github.com.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URI is rejected or the client can't be built.
    pub fn new(
        token: &str,
        api_url: Option<&Url>,
        max_in_flight: usize,
    ) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = api_url {
            builder = builder.base_uri(url.as_str())?;
        }

        Ok(Self::from_octocrab(
            builder.build()?,
            RequestGate::new(max_in_flight),
        ))
    }

    /// Wraps an existing octocrab instance.
    pub fn from_octocrab(octocrab: Octocrab, gate: RequestGate) -> Self {
        Self { octocrab, gate }
    }

    async fn get_page<T>(
        &self,
        route: &str,
        params: &ListParams,
        resource: &str,
    ) -> Result<Page<T>, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let _permit = self.gate.acquire().await?;
        self.octocrab
            .get::<Page<T>, _, _>(route, Some(params))
            .await
            .map_err(|e| classify_error(e, resource))
    }
}

#[async_trait]
impl PageSource for GitHubClient {
    async fn fetch_page(
        &self,
        resource: Resource<'_>,
        page: u32,
        per_page: u8,
    ) -> Result<PageResponse, FetchError> {
        let label = resource.to_string();
        debug!(resource = %label, page, per_page, "GET page");

        match resource {
            Resource::Repositories { organization } => {
                let params = ListParams {
                    per_page,
                    page,
                    state: None,
                };
                let route = format!("/orgs/{organization}/repos");
                let page = self.get_page::<RepositoryDto>(&route, &params, &label).await?;
                Ok(PageResponse {
                    pagination: pagination(&page),
                    items: page
                        .items
                        .into_iter()
                        .map(|dto| RawRecord::Repository(dto.into_record(organization)))
                        .collect(),
                })
            }
            Resource::PullRequests(target) => {
                let params = ListParams {
                    per_page,
                    page,
                    state: Some("open"),
                };
                let route = format!("/repos/{}/{}/pulls", target.owner, target.repository);
                let page = self.get_page::<PullRequestDto>(&route, &params, &label).await?;
                Ok(PageResponse {
                    pagination: pagination(&page),
                    items: page
                        .items
                        .into_iter()
                        .map(|dto| RawRecord::PullRequest(dto.into_record(target)))
                        .collect(),
                })
            }
            Resource::Branches(target) => {
                let params = ListParams {
                    per_page,
                    page,
                    state: None,
                };
                let route = format!("/repos/{}/{}/branches", target.owner, target.repository);
                let page = self.get_page::<BranchDto>(&route, &params, &label).await?;
                Ok(PageResponse {
                    pagination: pagination(&page),
                    items: page
                        .items
                        .into_iter()
                        .map(|dto| RawRecord::Branch(dto.into_record(target)))
                        .collect(),
                })
            }
        }
    }

    async fn ready(&self, cancel: &CancellationToken) -> Result<(), FetchError> {
        let info = check_core_rate_limit(&self.octocrab)
            .await
            .map_err(|e| classify_error(e, "rate limit"))?;
        wait_if_needed(&info, cancel).await?;
        Ok(())
    }
}

#[async_trait]
impl CommitResolver for GitHubClient {
    async fn resolve(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitInfo, FetchError> {
        let label = format!("commit {owner}/{repo}@{sha}");
        debug!(resource = %label, "GET commit");

        let _permit = self.gate.acquire().await?;
        let route = format!("/repos/{owner}/{repo}/commits/{sha}");
        let commit = self
            .octocrab
            .get::<CommitDto, _, _>(route, None::<&()>)
            .await
            .map_err(|e| classify_error(e, &label))?;

        commit.into_info()
    }
}

/// Reads pagination from the Link header octocrab parsed into the page.
///
/// GitHub omits the header entirely when a collection fits one page, which
/// is reported as [`Pagination::Unknown`] rather than [`Pagination::Last`].
fn pagination<T>(page: &Page<T>) -> Pagination {
    match &page.next {
        Some(next) => next
            .query()
            .and_then(page_number)
            .map_or(Pagination::Unknown, Pagination::Next),
        None if page.prev.is_some() || page.first.is_some() || page.last.is_some() => {
            Pagination::Last
        }
        None => Pagination::Unknown,
    }
}

/// Extracts the `page` parameter from a query string.
fn page_number(query: &str) -> Option<u32> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_page_number_from_query() {
        assert_eq!(page_number("per_page=100&page=3"), Some(3));
        assert_eq!(page_number("page=12"), Some(12));
        assert_eq!(page_number("per_page=100"), None);
        assert_eq!(page_number("page=abc"), None);
    }

    #[test]
    fn serializes_list_params() {
        let params = ListParams {
            per_page: 50,
            page: 2,
            state: Some("open"),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "per_page": 50, "page": 2, "state": "open" })
        );

        let params = ListParams {
            per_page: 50,
            page: 2,
            state: None,
        };
        assert!(serde_json::to_value(&params).unwrap().get("state").is_none());
    }
}
