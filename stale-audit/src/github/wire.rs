//! REST payloads, trimmed to the fields the audit reads.

use crate::fetch::FetchError;
use crate::model::{BranchRecord, CommitInfo, PullRequestRecord, RepositoryRecord, ScanTarget};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryDto {
    pub name: String,
    pub owner: Option<UserDto>,
    #[serde(default)]
    pub archived: bool,
}

impl RepositoryDto {
    pub fn into_record(self, organization: &str) -> RepositoryRecord {
        RepositoryRecord {
            owner: self
                .owner
                .map(|owner| owner.login)
                .unwrap_or_else(|| organization.to_string()),
            name: self.name,
            archived: self.archived,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestDto {
    pub id: u64,
    pub number: u64,
    pub title: Option<String>,
    pub user: Option<UserDto>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub head: HeadDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadDto {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub repo: Option<HeadRepositoryDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadRepositoryDto {
    pub full_name: String,
}

impl PullRequestDto {
    pub fn into_record(self, target: &ScanTarget) -> PullRequestRecord {
        // Fork heads share names with unrelated local branches.
        let same_repository = self
            .head
            .repo
            .as_ref()
            .is_some_and(|repo| repo.full_name.eq_ignore_ascii_case(&target.full_name()));

        PullRequestRecord {
            repository: target.clone(),
            id: self.id,
            number: self.number,
            title: self.title.unwrap_or_default(),
            author: self
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| crate::model::UNKNOWN_IDENTITY.to_string()),
            updated_at: self.updated_at,
            url: self.html_url,
            head_ref: same_repository.then_some(self.head.ref_name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchDto {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
    pub commit: BranchCommitDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchCommitDto {
    pub sha: String,
    pub url: String,
}

impl BranchDto {
    pub fn into_record(self, target: &ScanTarget) -> BranchRecord {
        BranchRecord {
            repository: target.clone(),
            name: self.name,
            protected: self.protected,
            head_sha: self.commit.sha,
            url: self.commit.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDto {
    pub sha: String,
    pub author: Option<UserDto>,
    pub commit: GitCommitDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitCommitDto {
    pub author: Option<GitActorDto>,
    pub committer: Option<GitActorDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitActorDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl CommitDto {
    pub fn into_info(self) -> Result<CommitInfo, FetchError> {
        let committed = self.commit.committer.as_ref().and_then(|actor| actor.date);
        let authored = self.commit.author.as_ref().and_then(|actor| actor.date);
        let timestamp = authored.or(committed).ok_or_else(|| FetchError::Incomplete {
            resource: format!("commit {}", self.sha),
            field: "date".to_string(),
        })?;

        let (committer_name, committer_email) = self
            .commit
            .committer
            .map(|actor| (actor.name, actor.email))
            .unwrap_or_default();
        let (author_name, author_email) = self
            .commit
            .author
            .map(|actor| (actor.name, actor.email))
            .unwrap_or_default();

        Ok(CommitInfo {
            sha: self.sha,
            author_login: self.author.map(|user| user.login),
            committer_email,
            committer_name,
            author_email,
            author_name,
            timestamp,
        })
    }
}
