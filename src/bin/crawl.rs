//! Thin CLI demonstrating the crawl façade against real stdout.
//!
//! Does not implement an HTTP server (that stays a Non-goal of the
//! engine) — it wires `crawl_engine::crawl` straight to `tokio::io::stdout`
//! so the SSE frame stream can be inspected from a terminal.
//!
//! ```text
//! crawl http://example.com http://example.org -- --depth 2
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use log::info;

use crawl_engine::{CancelToken, EngineConfig};
use crawl_engine::html::ScraperHtmlParser;

fn parse_args() -> (Vec<String>, u32) {
    let mut seeds = Vec::new();
    let mut depth = 1;

    let mut args = std::env::args().skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--depth" => {
                if let Some(value) = args.next() {
                    depth = value.parse().unwrap_or(depth);
                }
            }
            seed => seeds.push(seed.to_string()),
        }
    }

    (seeds, depth)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let (seeds, depth) = parse_args();
    if seeds.is_empty() {
        eprintln!("usage: crawl <seed-url>... [--depth N]");
        return ExitCode::FAILURE;
    }

    info!(target: "crawl_engine::bin", "starting crawl of {} seed(s) at depth {depth}", seeds.len());

    let config = EngineConfig::builder().seeds(seeds).max_depth(depth).build();
    let parser: Arc<dyn crawl_engine::HtmlParser> = Arc::new(ScraperHtmlParser);
    let cancel = CancelToken::new();

    // Ctrl-C cooperatively cancels the crawl: in-flight fetches still run
    // to completion or their 3s timeout (spec.md §5), only new dispatch
    // and emission stop.
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(target: "crawl_engine::bin", "received ctrl-c, cancelling crawl");
            ctrlc_cancel.cancel();
        }
    });

    let stdout = tokio::io::stdout();
    match crawl_engine::crawl(config, parser, cancel, stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("crawl failed: {err}");
            ExitCode::FAILURE
        }
    }
}
