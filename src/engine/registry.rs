//! Assigns each canonical URL a stable, monotonically increasing id
//! (`spec.md` §3, §4.2).

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::normalize::CanonicalUrl;

/// A 64-bit node identifier. `0` is reserved and never assigned; the first
/// registered URL gets `1`.
pub type NodeId = u64;

/// Write-once-per-key concurrent map from canonical URL to node id.
#[derive(Default)]
pub struct NodeRegistry {
    ids: DashMap<String, NodeId>,
    next_id: AtomicU64,
}

impl NodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `url` if unseen, otherwise returns its existing id.
    /// `was_new` is `true` for exactly one caller among any number of
    /// concurrent callers racing on the same url.
    pub fn register_or_get(&self, url: &CanonicalUrl) -> (NodeId, bool) {
        // DashMap's entry API takes the per-shard lock for the whole
        // closure, so the read-then-insert below is atomic with respect to
        // other callers targeting the same key.
        let mut was_new = false;
        let id = *self
            .ids
            .entry(url.as_str().to_string())
            .or_insert_with(|| {
                was_new = true;
                self.next_id.fetch_add(1, Ordering::SeqCst) + 1
            });
        (id, was_new)
    }

    #[must_use]
    pub fn lookup(&self, url: &CanonicalUrl) -> Option<NodeId> {
        self.ids.get(url.as_str()).map(|id| *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> CanonicalUrl {
        super::super::normalize::normalize(s, None).unwrap()
    }

    #[test]
    fn first_registration_gets_id_one() {
        let registry = NodeRegistry::new();
        let (id, was_new) = registry.register_or_get(&url("http://h/a"));
        assert_eq!(id, 1);
        assert!(was_new);
    }

    #[test]
    fn repeated_registration_is_idempotent() {
        let registry = NodeRegistry::new();
        let (first, _) = registry.register_or_get(&url("http://h/a"));
        let (second, was_new) = registry.register_or_get(&url("http://h/a"));
        assert_eq!(first, second);
        assert!(!was_new);
    }

    #[test]
    fn ids_are_dense_and_in_first_sight_order() {
        let registry = NodeRegistry::new();
        let (a, _) = registry.register_or_get(&url("http://h/a"));
        let (b, _) = registry.register_or_get(&url("http://h/b"));
        let (c, _) = registry.register_or_get(&url("http://h/c"));
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn lookup_returns_none_for_unregistered_url() {
        let registry = NodeRegistry::new();
        assert_eq!(registry.lookup(&url("http://h/a")), None);
    }

    #[tokio::test]
    async fn concurrent_registration_of_the_same_url_yields_exactly_one_new() {
        let registry = Arc::new(NodeRegistry::new());
        let target = url("http://h/a");

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let registry = Arc::clone(&registry);
            let target = target.clone();
            tasks.push(tokio::spawn(async move { registry.register_or_get(&target).1 }));
        }

        let mut new_count = 0;
        for task in tasks {
            if task.await.unwrap() {
                new_count += 1;
            }
        }

        assert_eq!(new_count, 1);
        assert_eq!(registry.len(), 1);
    }
}
