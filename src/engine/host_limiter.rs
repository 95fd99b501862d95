//! Per-host concurrency bound on in-flight fetches (`spec.md` §4.5, §5).
//!
//! One counting semaphore per host, created lazily on first use. Mirrors
//! the teacher's `DomainLimiter` (`crawl_engine/domain_limiter.rs`), which
//! wraps a `DashMap<String, Arc<Semaphore>>` the same way.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps concurrent fetches to `MAX_CONCURRENT_REQS_PER_HOST` per host,
/// independently across hosts — there is no global fetch cap.
pub struct HostLimiter {
    semaphores: DashMap<String, Arc<Semaphore>>,
    capacity: usize,
}

impl HostLimiter {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphores: DashMap::new(),
            capacity,
        }
    }

    /// Acquires one permit for `host`, waiting if that host is already at
    /// capacity. Dropping the permit releases it back to that host's
    /// semaphore.
    pub async fn acquire(&self, host: &str) -> OwnedSemaphorePermit {
        let semaphore = self
            .semaphores
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.capacity)))
            .clone();

        semaphore
            .acquire_owned()
            .await
            .expect("semaphore is never closed")
    }
}
