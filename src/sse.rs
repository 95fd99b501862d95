//! Server-Sent Events frame encoding for the streaming wire format (`spec.md` §6).

use crate::engine::record::PageRecord;
use crate::error::EngineError;

/// Encodes one `event: data` frame carrying a JSON-serialized [`PageRecord`].
pub fn data_frame(record: &PageRecord) -> Result<String, EngineError> {
    let json = serde_json::to_string(record).map_err(EngineError::Encode)?;
    Ok(format!("event: data\ndata: {json}\n\n"))
}

/// The terminal frame written once, on normal completion or on cancel.
pub fn close_frame() -> &'static str {
    "event: close\ndata: \n\n"
}
