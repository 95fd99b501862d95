//! Concurrent breadth-limited web crawl engine with live-streamed page
//! records.
//!
//! [`engine::crawl`] is the entry point: given seed URLs, a depth bound,
//! and a cancellation signal, it fetches pages under per-host politeness
//! constraints and writes one SSE frame per visited page to a sink.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod html;
pub mod sse;

pub use cancel::CancelToken;
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{crawl, PageRecord};
pub use error::EngineError;
pub use html::{HtmlParser, ScraperHtmlParser};
