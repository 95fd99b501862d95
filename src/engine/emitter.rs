//! Single consumer that serializes records to the client sink in arrival
//! order (`spec.md` §4.7).

use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::sse;

use super::queue::HostQueueSet;
use super::record::PageRecord;

/// Drains `records` and writes an SSE frame per record until either the
/// outstanding-work counter reaches zero or `cancel` fires, then writes
/// the terminal close frame.
pub async fn run<W>(
    mut records: mpsc::Receiver<PageRecord>,
    queue: Arc<HostQueueSet>,
    cancel: CancelToken,
    mut sink: W,
) -> Result<(), EngineError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(target: "crawl_engine::emitter", "cancelled, writing close frame");
                break;
            }
            maybe_record = records.recv() => {
                let Some(record) = maybe_record else {
                    // All senders dropped without the counter reaching
                    // zero — nothing left to produce more work either way.
                    break;
                };
                write_frame(&mut sink, &sse::data_frame(&record)?).await?;
                let remaining = queue.mark_delivered();
                if remaining == 0 {
                    debug!(target: "crawl_engine::emitter", "outstanding work reached zero");
                    break;
                }
            }
        }
    }

    write_frame(&mut sink, sse::close_frame()).await?;
    Ok(())
}

async fn write_frame<W>(sink: &mut W, frame: &str) -> Result<(), EngineError>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(frame.as_bytes())
        .await
        .map_err(EngineError::SinkWrite)?;
    sink.flush().await.map_err(EngineError::SinkWrite)
}
