//! Reading the chat event stream.
//!
//! The whole body is accumulated before any line is parsed, so the message
//! list changes once per request, after the server closes the stream.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use stockchat_types::Role;
use tracing::warn;

const DATA_PREFIX: &str = "data: ";

/// One assistant (or other role) message recovered from a `data:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub role: Role,
    pub content: String,
}

/// Incremental UTF-8 decoder.
///
/// A multi-byte character split across two chunks is held back until its
/// remaining bytes arrive. Bytes that can never form valid UTF-8 become
/// U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Accumulator {
    text: String,
    pending: Vec<u8>,
}

impl Utf8Accumulator {
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&self.pending[..valid_up_to]) {
                        self.text.push_str(valid);
                    }
                    match e.error_len() {
                        // Truncated sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid_up_to);
                            return;
                        }
                        Some(bad) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + bad);
                        }
                    }
                }
            }
        }
    }

    /// Decoded text so far, excluding any held-back partial character.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Flush and return everything; a dangling partial character is replaced.
    pub fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            self.text.push_str(&String::from_utf8_lossy(&self.pending));
        }
        self.text
    }
}

/// Drain `body` to completion and decode it as UTF-8.
pub async fn read_to_end<S, E>(body: S) -> Result<String, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let mut body = std::pin::pin!(body);
    let mut acc = Utf8Accumulator::default();
    while let Some(chunk) = body.next().await {
        acc.push(&chunk?);
    }
    Ok(acc.finish())
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Extract messages from an accumulated event-stream body.
///
/// Lines starting with `data: ` are parsed as JSON; objects carrying a
/// non-empty `role` and `content` become [`ParsedEvent`]s in body order.
/// Malformed lines are logged and skipped without affecting the rest.
pub fn parse_events(body: &str) -> Vec<ParsedEvent> {
    let mut events = Vec::new();
    for line in body.split('\n') {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();

        let raw = match serde_json::from_str::<RawEvent>(payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, line = %payload, "skipping malformed event line");
                continue;
            }
        };

        let (Some(role), Some(content)) = (raw.role, raw.content) else {
            continue;
        };
        if role.is_empty() || content.is_empty() {
            continue;
        }
        match role.parse::<Role>() {
            Ok(role) => events.push(ParsedEvent { role, content }),
            Err(e) => warn!(error = %e, "skipping event with unknown role"),
        }
    }
    events
}
