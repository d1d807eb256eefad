//! SSE stream decoding for chat responses.
//!
//! The response body is a line-oriented event stream: only `data: `-prefixed
//! lines carry payloads, a `[DONE]` sentinel marks normal completion, and
//! payloads are JSON objects carrying incremental `content`, a `done`
//! continuation marker, or a backend-signaled `error`. Decoding never fails:
//! malformed payloads are skipped and a stream that ends without the
//! sentinel yields whatever was accumulated.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;

/// Prefix marking a data line.
const DATA_PREFIX: &str = "data: ";

/// Sentinel payload marking normal stream completion.
const DONE_SENTINEL: &str = "[DONE]";

/// Fallback notice text when a backend error frame carries no message.
const DEFAULT_ERROR_NOTICE: &str = "Response may not have been saved";

/// A decoded data-line payload.
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(default)]
    content: Option<String>,
    #[serde(rename = "type", default)]
    frame_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// What processing one payload decided.
enum FrameAction {
    Continue,
    Terminate,
}

/// Decodes an SSE-framed byte stream, accumulating incremental content.
///
/// `on_partial` is invoked exactly once per content frame with the full
/// accumulated text so far. `on_notice` is invoked for backend-signaled
/// error frames; these are non-fatal and decoding continues.
///
/// Returns the accumulated text: on the `[DONE]` sentinel, on stream end,
/// or on a transport error mid-stream (logged, not raised).
pub async fn decode_stream<S, E>(
    stream: S,
    mut on_partial: impl FnMut(&str),
    mut on_notice: impl FnMut(&str),
) -> String
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);

    let mut accumulated = String::new();
    // Raw byte carry: a frame (or a multi-byte character) may be split
    // across chunk boundaries.
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "Chat stream read failed; returning accumulated text");
                return accumulated;
            }
        };

        buffer.extend_from_slice(&chunk);

        while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let FrameAction::Terminate =
                process_line(line.trim_end(), &mut accumulated, &mut on_partial, &mut on_notice)
            {
                return accumulated;
            }
        }
    }

    // Flush a trailing line the stream ended without terminating.
    if !buffer.is_empty() {
        let line = String::from_utf8_lossy(&buffer);
        let _ = process_line(line.trim_end(), &mut accumulated, &mut on_partial, &mut on_notice);
    }

    accumulated
}

fn process_line(
    line: &str,
    accumulated: &mut String,
    on_partial: &mut impl FnMut(&str),
    on_notice: &mut impl FnMut(&str),
) -> FrameAction {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return FrameAction::Continue;
    };

    if payload == DONE_SENTINEL {
        return FrameAction::Terminate;
    }

    // Malformed payloads are silently skipped
    let Ok(frame) = serde_json::from_str::<Frame>(payload) else {
        return FrameAction::Continue;
    };

    match frame.frame_type.as_deref() {
        Some("error") => {
            on_notice(frame.message.as_deref().unwrap_or(DEFAULT_ERROR_NOTICE));
            return FrameAction::Continue;
        }
        Some("done") => return FrameAction::Continue,
        _ => {}
    }

    if let Some(content) = frame.content {
        accumulated.push_str(&content);
        on_partial(accumulated);
    }

    FrameAction::Continue
}
