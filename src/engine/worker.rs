//! Per-host draining task (`spec.md` §4.5).

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;

use crate::cancel::CancelToken;
use crate::html::HtmlParser;

use super::fetcher;
use super::host_limiter::HostLimiter;
use super::queue::HostQueueSet;
use super::record::PageRecord;
use super::robots::RobotsCache;

/// Fixed user-agent identifying outbound GETs; robots checks must pass
/// this exact string (`spec.md` §6).
pub const USER_AGENT: &str = "crawl-engine/0.1";

/// Drains `host`'s queue until it empties or `cancel` fires.
///
/// Never returns an error: every dequeued entry produces exactly one
/// record, success, robots-block, or transport failure, which is pushed
/// to `records`.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    host: String,
    queue: Arc<HostQueueSet>,
    robots: Arc<RobotsCache>,
    limiter: Arc<HostLimiter>,
    client: reqwest::Client,
    parser: Arc<dyn HtmlParser>,
    records: mpsc::Sender<PageRecord>,
    cancel: CancelToken,
    respect_robots: bool,
    default_crawl_delay: Duration,
) {
    loop {
        if cancel.is_cancelled() {
            debug!(target: "crawl_engine::worker", "host {host} stopping: cancelled");
            return;
        }

        let Some(entry) = queue.dequeue(&host) else {
            debug!(target: "crawl_engine::worker", "host {host} queue drained");
            return;
        };

        let id = queue
            .registry()
            .lookup(&entry.url)
            .expect("entry was registered at enqueue time");

        let (allowed, crawl_delay) = if respect_robots {
            let policy = robots.policy_for(&host).await;
            let delay = if policy.crawl_delay() > Duration::from_millis(0) {
                policy.crawl_delay()
            } else {
                default_crawl_delay
            };
            (policy.allows(entry.url.as_str(), USER_AGENT), delay)
        } else {
            (true, default_crawl_delay)
        };

        if !allowed {
            let record = PageRecord::robots_blocked(id, entry.url.into_string());
            if race_send(&records, record, &cancel).await.is_err() {
                return;
            }
            // No crawl delay: robots-blocked entries never dispatched a
            // fetch (spec.md §4.5 step 1).
            continue;
        }

        let permit = limiter.acquire(&host).await;
        let client = client.clone();
        let parser = Arc::clone(&parser);
        let queue_for_fetch = Arc::clone(&queue);
        let robots_for_fetch = Arc::clone(&robots);
        let limiter_for_fetch = Arc::clone(&limiter);
        let records = records.clone();
        let cancel_for_fetch = cancel.clone();
        let host_for_fetch = host.clone();
        let url = entry.url.into_string();
        let depth = entry.depth;

        tokio::spawn(async move {
            let _permit = permit;
            let outcome = fetcher::fetch_page(
                &client,
                parser.as_ref(),
                &queue_for_fetch,
                id,
                &url,
                &host_for_fetch,
                depth,
            )
            .await;

            for new_host in outcome.new_hosts {
                tokio::spawn(run(
                    new_host,
                    Arc::clone(&queue_for_fetch),
                    Arc::clone(&robots_for_fetch),
                    Arc::clone(&limiter_for_fetch),
                    client.clone(),
                    Arc::clone(&parser),
                    records.clone(),
                    cancel_for_fetch.clone(),
                    respect_robots,
                    default_crawl_delay,
                ));
            }

            let _ = race_send(&records, outcome.record, &cancel_for_fetch).await;
        });

        if crawl_delay > Duration::from_millis(0) {
            tokio::time::sleep(crawl_delay).await;
        }
    }
}

/// Sends `record`, racing it against cancellation so a cancelled crawl's
/// emitter (which stops draining) never leaves a sender blocked forever
/// (spec.md §9 design notes).
async fn race_send(
    records: &mpsc::Sender<PageRecord>,
    record: PageRecord,
    cancel: &CancelToken,
) -> Result<(), ()> {
    tokio::select! {
        result = records.send(record) => result.map_err(|_| ()),
        () = cancel.cancelled() => Err(()),
    }
}
