//! Per-host FIFO queues and the enqueue protocol (`spec.md` §3, §4.3).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use url::Url;

use super::normalize::{self, CanonicalUrl, NormalizeError};
use super::registry::{NodeId, NodeRegistry};

/// A queued (url, remaining-depth) pair. `depth` is the number of
/// additional link-hops permitted from this page; `0` means fetch but do
/// not enqueue discovered links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub url: CanonicalUrl,
    pub depth: u32,
}

/// Outcome of an `enqueue` call: the id assigned to the url, and whether
/// this call is the one that should spawn a host worker for its host (true
/// exactly when this is the first entry ever queued for that host).
pub struct EnqueueOutcome {
    pub id: NodeId,
    pub spawn_worker_for_host: Option<String>,
}

/// Host → ordered queue of entries, guarded by a single mutex held only
/// for the critical sections described in `spec.md` §4.3.
pub struct HostQueueSet {
    queues: Mutex<HashMap<String, VecDeque<QueueEntry>>>,
    registry: NodeRegistry,
    outstanding: AtomicU64,
}

impl HostQueueSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            registry: NodeRegistry::new(),
            outstanding: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Called once per record actually delivered to the client sink.
    pub fn mark_delivered(&self) -> u64 {
        self.outstanding.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Enqueues an already-resolved absolute URL.
    pub fn enqueue(&self, raw_url: &str, depth: u32) -> Result<EnqueueOutcome, NormalizeError> {
        let canonical = normalize::normalize(raw_url, None)?;
        Ok(self.enqueue_canonical(canonical, depth))
    }

    /// Enqueues a possibly-relative URL discovered on a page served by
    /// `base_host`.
    pub fn enqueue_relative(
        &self,
        raw_url: &str,
        base_host: &str,
        depth: u32,
    ) -> Result<EnqueueOutcome, NormalizeError> {
        let canonical = normalize::normalize(raw_url, Some(base_host))?;
        Ok(self.enqueue_canonical(canonical, depth))
    }

    fn enqueue_canonical(&self, canonical: CanonicalUrl, depth: u32) -> EnqueueOutcome {
        // The registry is the sole gate: wasNew is the only authority for
        // "increment outstanding work and enqueue" (spec.md §9), closing
        // the race where two enqueuers could otherwise both see a fresh
        // insert and double-count.
        let (id, was_new) = self.registry.register_or_get(&canonical);
        if !was_new {
            return EnqueueOutcome {
                id,
                spawn_worker_for_host: None,
            };
        }

        self.outstanding.fetch_add(1, Ordering::SeqCst);

        let host = host_of(&canonical);
        let entry = QueueEntry {
            url: canonical,
            depth,
        };

        let mut queues = self.queues.lock().unwrap();
        let is_new_host = !queues.contains_key(&host);
        queues.entry(host.clone()).or_default().push_back(entry);
        drop(queues);

        EnqueueOutcome {
            id,
            spawn_worker_for_host: is_new_host.then_some(host),
        }
    }

    /// Pops the head entry for `host`. Deletes the host key once its
    /// queue is drained, per `spec.md` §4.3.
    pub fn dequeue(&self, host: &str) -> Option<QueueEntry> {
        let mut queues = self.queues.lock().unwrap();
        let entries = queues.get_mut(host)?;
        let entry = entries.pop_front();
        if entries.is_empty() {
            queues.remove(host);
        }
        entry
    }
}

impl Default for HostQueueSet {
    fn default() -> Self {
        Self::new()
    }
}

fn host_of(url: &CanonicalUrl) -> String {
    Url::parse(url.as_str())
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
