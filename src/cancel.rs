//! Cooperative cancellation signal shared between host workers and the emitter.
//!
//! Mirrors the `Notify` + `AtomicBool` pairing the teacher's event bus uses
//! for its own shutdown signal (`crawl_events/bus.rs`): the flag gives a
//! cheap synchronous check, the `Notify` lets waiters avoid polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A cheaply-cloneable cancellation signal.
///
/// Setting it cancelled is one-way: there is no uncancel. Cloned handles
/// all observe the same underlying state.
#[derive(Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Mark the signal cancelled and wake every waiter.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel()` has been called. Resolves immediately if
    /// it already has been.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        // Notify::notify_waiters only wakes tasks already registered as
        // waiting, so re-check after subscribing to close the race where
        // cancel() fires between the is_cancelled() check above and the
        // notified() registration below.
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_immediately_if_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        tokio::time::timeout(std::time::Duration::from_millis(50), token.cancelled())
            .await
            .expect("cancelled() should resolve immediately");
    }

    #[tokio::test]
    async fn cancelled_wakes_waiters() {
        let token = CancelToken::new();
        let waiter = token.clone();

        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        token.cancel();

        tokio::time::timeout(std::time::Duration::from_millis(200), handle)
            .await
            .expect("waiter should have been woken")
            .expect("task should not panic");
    }

    #[test]
    fn is_cancelled_reflects_state() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
