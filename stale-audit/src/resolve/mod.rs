//! Branch head commit resolution.
//!
//! A branch listing carries no activity timestamp, so every branch that
//! survives the pre-filters costs one commit lookup. [`CommitResolver`] keeps
//! that lookup behind a seam so batching or caching can be swapped in.

use crate::fetch::FetchError;
use crate::model::CommitInfo;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Looks up the author identity and timestamp of a commit.
#[async_trait]
pub trait CommitResolver: Send + Sync {
    /// Resolves `sha` in `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the commit doesn't exist and
    /// [`FetchError::Transport`] on network failures.
    async fn resolve(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitInfo, FetchError>;
}

#[async_trait]
impl<T: CommitResolver + ?Sized> CommitResolver for Arc<T> {
    async fn resolve(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitInfo, FetchError> {
        (**self).resolve(owner, repo, sha).await
    }
}

/// Memoizes successful resolutions; branches sharing a head commit cost one lookup.
pub struct CachingResolver<R> {
    inner: R,
    cache: Mutex<HashMap<(String, String, String), CommitInfo>>,
}

impl<R: CommitResolver> CachingResolver<R> {
    /// Wraps a resolver with an in-memory cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached commits.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Returns true if nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

#[async_trait]
impl<R: CommitResolver> CommitResolver for CachingResolver<R> {
    async fn resolve(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitInfo, FetchError> {
        let key = (owner.to_string(), repo.to_string(), sha.to_string());
        if let Some(info) = self.cache.lock().await.get(&key) {
            debug!(sha, "Commit cache hit");
            return Ok(info.clone());
        }

        // Failures are not cached so a transient error can be retried later.
        let info = self.inner.resolve(owner, repo, sha).await?;
        self.cache.lock().await.insert(key, info.clone());
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommitResolver for CountingResolver {
        async fn resolve(
            &self,
            _owner: &str,
            _repo: &str,
            sha: &str,
        ) -> Result<CommitInfo, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if sha == "missing" {
                return Err(FetchError::NotFound {
                    resource: sha.to_string(),
                });
            }
            Ok(CommitInfo {
                sha: sha.to_string(),
                author_login: Some("octocat".to_string()),
                committer_email: None,
                committer_name: None,
                author_email: None,
                author_name: None,
                timestamp: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn caches_successful_lookups() {
        let resolver = CachingResolver::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });

        let first = resolver.resolve("acme", "widgets", "abc").await.unwrap();
        let second = resolver.resolve("acme", "widgets", "abc").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.len().await, 1);
    }

    #[tokio::test]
    async fn does_not_cache_failures() {
        let resolver = CachingResolver::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });

        assert!(resolver.resolve("acme", "widgets", "missing").await.is_err());
        assert!(resolver.resolve("acme", "widgets", "missing").await.is_err());

        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 2);
        assert!(resolver.is_empty().await);
    }

    #[tokio::test]
    async fn keys_by_repository() {
        let resolver = CachingResolver::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });

        resolver.resolve("acme", "widgets", "abc").await.unwrap();
        resolver.resolve("acme", "gadgets", "abc").await.unwrap();

        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 2);
    }
}
