//! Rate limiting utilities for GitHub API.
//!
//! [`RequestGate`] caps concurrent requests; [`wait_if_needed`] pauses the
//! scan when the core quota runs low, until the window resets or the scan is
//! cancelled.

mod gate;
mod info;

pub use gate::RequestGate;
pub use info::RateLimitInfo;

use crate::fetch::FetchError;
use octocrab::Octocrab;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT: Duration = Duration::from_secs(3600);

/// Remaining core requests below which a repository scan waits for reset.
///
/// A repository costs a handful of listing requests plus one per branch.
const MIN_REMAINING_THRESHOLD: u32 = 50;

/// Checks the current rate limit status for core API (repos, pulls, commits).
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Waits if the rate limit is low, returning true if we waited.
///
/// # Errors
///
/// Returns [`FetchError::Cancelled`] if `cancel` fires during the wait.
pub async fn wait_if_needed(
    info: &RateLimitInfo,
    cancel: &CancellationToken,
) -> Result<bool, FetchError> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait) = info.wait_duration(now, MIN_REMAINING_THRESHOLD, MAX_WAIT) else {
        return Ok(false);
    };

    if wait == MAX_WAIT {
        warn!(
            reset = info.reset,
            max_wait_secs = MAX_WAIT.as_secs(),
            "Rate limit reset too far in future, capping wait time"
        );
    }

    info!(
        remaining = info.remaining,
        limit = info.limit,
        wait_secs = wait.as_secs(),
        "Rate limit low, waiting for reset"
    );

    tokio::select! {
        () = tokio::time::sleep(wait) => Ok(true),
        () = cancel.cancelled() => {
            info!("Rate limit wait cancelled");
            Err(FetchError::Cancelled)
        }
    }
}
