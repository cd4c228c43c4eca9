//! Shared cap on in-flight API requests.

use crate::fetch::FetchError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of requests in flight across all scan workers.
#[derive(Debug, Clone)]
pub struct RequestGate {
    semaphore: Arc<Semaphore>,
}

impl RequestGate {
    /// Creates a gate admitting at most `capacity` concurrent requests.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Cancelled`] if the semaphore has been closed.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, FetchError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FetchError::Cancelled)
    }
}
