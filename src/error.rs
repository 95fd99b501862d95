//! Crate-level error types for failures that are not page-level.
//!
//! Page fetch failures never reach here — they are carried as strings on
//! `PageRecord.errors` per the engine's error-handling policy (every
//! registered URL produces exactly one record, success or failure). These
//! errors are for the handful of façade-level failures that can actually
//! abort a crawl.

use thiserror::Error;

/// Errors that can terminate a crawl outright.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The client sink closed or a write/encode failed while emitting a frame.
    #[error("failed to write to client sink: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// A seed or config value could not be serialized into a record frame.
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}
