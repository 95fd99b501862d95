//! Seeds the crawl, spawns the emitter, waits for completion (`spec.md` §4.8).

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::html::HtmlParser;

use super::emitter;
use super::host_limiter::HostLimiter;
use super::queue::HostQueueSet;
use super::robots::RobotsCache;
use super::worker;

/// Runs a full crawl to completion (or until `cancel` fires), writing a
/// `PageRecord` per visited page to `sink` as SSE frames.
pub async fn crawl<W>(
    config: EngineConfig,
    parser: Arc<dyn HtmlParser>,
    cancel: CancelToken,
    sink: W,
) -> Result<(), EngineError>
where
    W: AsyncWrite + Unpin,
{
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .expect("client config is static and always valid");

    let queue = Arc::new(HostQueueSet::new());
    let robots = Arc::new(RobotsCache::new(client.clone()));
    let limiter = Arc::new(HostLimiter::new(config.max_concurrent_per_host()));
    let (records_tx, records_rx) = mpsc::channel(1);

    for seed in config.seeds() {
        // Per-seed normalization failures are suppressed individually and
        // never counted toward outstanding work (spec.md §4.8 step 1).
        match queue.enqueue(seed, config.max_depth()) {
            Ok(outcome) => {
                if let Some(host) = outcome.spawn_worker_for_host {
                    spawn_worker(
                        &host,
                        &queue,
                        &robots,
                        &limiter,
                        &client,
                        &parser,
                        &records_tx,
                        &cancel,
                        config.respect_robots(),
                        config.default_crawl_delay(),
                    );
                }
            }
            Err(_) => {
                warn!(target: "crawl_engine::facade", "seed {seed} failed to normalize, skipping");
            }
        }
    }

    if queue.outstanding() == 0 {
        debug!(target: "crawl_engine::facade", "no valid seeds, closing immediately");
    }

    emitter::run(records_rx, Arc::clone(&queue), cancel, sink).await
}

#[allow(clippy::too_many_arguments)]
fn spawn_worker(
    host: &str,
    queue: &Arc<HostQueueSet>,
    robots: &Arc<RobotsCache>,
    limiter: &Arc<HostLimiter>,
    client: &reqwest::Client,
    parser: &Arc<dyn HtmlParser>,
    records_tx: &mpsc::Sender<super::record::PageRecord>,
    cancel: &CancelToken,
    respect_robots: bool,
    default_crawl_delay: Duration,
) {
    tokio::spawn(worker::run(
        host.to_string(),
        Arc::clone(queue),
        Arc::clone(robots),
        Arc::clone(limiter),
        client.clone(),
        Arc::clone(parser),
        records_tx.clone(),
        cancel.clone(),
        respect_robots,
        default_crawl_delay,
    ));
}
