//! The unit of output: one record per visited (or robots-blocked) page.

use serde::{Deserialize, Serialize};

use super::registry::NodeId;

/// `spec.md` §3 / §6. Field order and names match the wire JSON shape
/// exactly — no unknown keys, arrays always present even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: NodeId,
    pub url: String,
    pub title: String,
    #[serde(rename = "linksFound")]
    pub links_found: usize,
    pub errors: Vec<String>,
    pub neighbors: Vec<NodeId>,
    #[serde(rename = "responseTime")]
    pub response_time: u64,
}

impl PageRecord {
    /// A record for a URL whose robots policy disallowed the fetch
    /// (`spec.md` §4.5, §7): only the id, url, and the fixed error string.
    pub fn robots_blocked(id: NodeId, url: String) -> Self {
        Self {
            id,
            url,
            title: String::new(),
            links_found: 0,
            errors: vec!["Path blocked by robots.txt".to_string()],
            neighbors: Vec::new(),
            response_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_exact_wire_keys() {
        let record = PageRecord {
            id: 7,
            url: "http://h/a".to_string(),
            title: "A".to_string(),
            links_found: 2,
            errors: vec![],
            neighbors: vec![1, 2],
            response_time: 42,
        };

        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["errors", "id", "linksFound", "neighbors", "responseTime", "title", "url"]
        );
    }

    #[test]
    fn robots_blocked_carries_only_the_fixed_error() {
        let record = PageRecord::robots_blocked(3, "http://h/private".to_string());
        assert_eq!(record.errors, vec!["Path blocked by robots.txt".to_string()]);
        assert_eq!(record.title, "");
        assert_eq!(record.links_found, 0);
        assert!(record.neighbors.is_empty());
    }
}
