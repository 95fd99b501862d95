//! Issues one page fetch and builds its [`PageRecord`] (`spec.md` §4.6).

use std::time::Instant;

use crate::html::HtmlParser;

use super::queue::HostQueueSet;
use super::record::PageRecord;
use super::registry::NodeId;

/// Result of a single page fetch: the record to emit, plus any hosts
/// discovered for the first time while enqueueing neighbors — the caller
/// is responsible for spawning a host worker for each (spec.md §4.3).
pub struct FetchOutcome {
    pub record: PageRecord,
    pub new_hosts: Vec<String>,
}

/// Fetches `url` (already registered under `id`) and returns its record.
///
/// `depth` is the remaining-hops budget carried from the queue entry: on
/// success, discovered links are enqueued with `depth - 1` when `depth >
/// 0`, or just checked against the registry (for back-edges) when `depth
/// == 0`.
pub async fn fetch_page(
    client: &reqwest::Client,
    parser: &dyn HtmlParser,
    queue: &HostQueueSet,
    id: NodeId,
    url: &str,
    base_host: &str,
    depth: u32,
) -> FetchOutcome {
    let start = Instant::now();
    let result = client.get(url).send().await;
    let response_time = start.elapsed().as_millis() as u64;

    let response = match result {
        Ok(response) => response,
        Err(err) => return transport_error(id, url, response_time, err.to_string()),
    };

    if !response.status().is_success() {
        let status_line = format!("{} {}", response.status().as_u16(), status_reason(&response));
        return transport_error(id, url, response_time, status_line);
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => return transport_error(id, url, response_time, err.to_string()),
    };

    let parsed = parser.parse(&body);
    let links_found = parsed.links.len();
    let mut neighbors = Vec::new();
    let mut new_hosts = Vec::new();

    for href in &parsed.links {
        if depth > 0 {
            match queue.enqueue_relative(href, base_host, depth - 1) {
                Ok(outcome) => {
                    neighbors.push(outcome.id);
                    if let Some(host) = outcome.spawn_worker_for_host {
                        new_hosts.push(host);
                    }
                }
                Err(_) => continue,
            }
        } else {
            // depth == 0: do not enqueue, but surface a back-edge if the
            // target is already a known node (spec.md §4.6 step 7).
            if let Ok(canonical) = super::normalize::normalize(href, Some(base_host)) {
                if let Some(existing_id) = queue.registry().lookup(&canonical) {
                    neighbors.push(existing_id);
                }
            }
        }
    }

    FetchOutcome {
        record: PageRecord {
            id,
            url: url.to_string(),
            title: parsed.title,
            links_found,
            errors: Vec::new(),
            neighbors,
            response_time,
        },
        new_hosts,
    }
}

fn transport_error(id: NodeId, url: &str, response_time: u64, detail: String) -> FetchOutcome {
    FetchOutcome {
        record: PageRecord {
            id,
            url: url.to_string(),
            title: String::new(),
            links_found: 0,
            errors: vec![format!("Error fetching page: {detail}")],
            neighbors: Vec::new(),
            response_time,
        },
        new_hosts: Vec::new(),
    }
}

fn status_reason(response: &reqwest::Response) -> &str {
    response.status().canonical_reason().unwrap_or("Unknown Status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::ParsedPage;
    use std::time::Duration;

    struct StubParser(ParsedPage);

    impl HtmlParser for StubParser {
        fn parse(&self, _body: &[u8]) -> ParsedPage {
            self.0.clone()
        }
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn success_builds_record_with_title_links_and_neighbors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/a")
            .with_status(200)
            .with_body("<html><title>A</title></html>")
            .create_async()
            .await;

        let parser = StubParser(ParsedPage {
            title: "A".to_string(),
            links: vec!["/b".to_string(), "/c".to_string()],
        });

        let queue = HostQueueSet::new();
        let url = format!("{}/a", server.url());
        let outcome = queue.enqueue(&url, 1).unwrap();
        let host = server.host_with_port();

        let outcome = fetch_page(&client(), &parser, &queue, outcome.id, &url, &host, 1).await;

        assert_eq!(outcome.record.title, "A");
        assert_eq!(outcome.record.links_found, 2);
        assert_eq!(outcome.record.neighbors.len(), 2);
        assert!(outcome.record.errors.is_empty());
        // /b and /c are both new to a host already seen via /a itself, so
        // no *new* host worker is required here.
        assert!(outcome.new_hosts.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn depth_zero_does_not_enqueue_but_reports_known_back_edges() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/a")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let host = server.host_with_port();
        // Root-relative hrefs normalize against https://<base_host> (spec.md
        // §4.1 rule 1), so the pre-registered "known" url must use the same
        // scheme to collapse to the identical canonical string.
        let known_url = format!("https://{host}/known");

        let parser = StubParser(ParsedPage {
            title: String::new(),
            links: vec!["/known".to_string(), "/unknown".to_string()],
        });

        let queue = HostQueueSet::new();
        queue.enqueue(&known_url, 0).unwrap();

        let url = format!("{}/a", server.url());
        let outcome = queue.enqueue(&url, 0).unwrap();

        let outcome = fetch_page(&client(), &parser, &queue, outcome.id, &url, &host, 0).await;

        assert_eq!(outcome.record.neighbors.len(), 1);
        assert_eq!(outcome.record.links_found, 2);
    }

    #[tokio::test]
    async fn non_200_status_is_reported_without_parsing_body() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/missing").with_status(404).create_async().await;

        let parser = StubParser(ParsedPage::default());
        let queue = HostQueueSet::new();
        let url = format!("{}/missing", server.url());
        let outcome = queue.enqueue(&url, 0).unwrap();
        let host = server.host_with_port();

        let outcome = fetch_page(&client(), &parser, &queue, outcome.id, &url, &host, 0).await;

        assert_eq!(outcome.record.errors.len(), 1);
        assert!(outcome.record.errors[0].starts_with("Error fetching page: "));
        assert!(outcome.record.title.is_empty());
    }
}
