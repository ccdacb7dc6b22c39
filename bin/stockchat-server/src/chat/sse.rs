//! Server-Sent-Events framing for chat replies.
//!
//! Every event is `data: {"id":…,"role":"assistant","content":…}\n\n`. There
//! is no terminal event and no keep-alive comments; end of body means done.

use std::convert::Infallible;

use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, BoxStream};
use futures::{future, StreamExt};
use stockchat_types::SseEvent;
use tracing::{error, warn};

use crate::llm::TokenStream;

pub type EventStream = BoxStream<'static, Result<Event, Infallible>>;

/// A stream carrying exactly one assistant event.
pub fn single(content: String) -> EventStream {
    stream::iter(encode(&SseEvent::assistant(content)).map(Ok)).boxed()
}

/// Forward upstream fragments one event each, at the upstream's pace.
///
/// An upstream error ends the stream; headers are already sent, so it can
/// only be logged.
pub fn relay(tokens: TokenStream) -> EventStream {
    tokens
        .inspect(|item| {
            if let Err(e) = item {
                error!(error = %e, "upstream stream failed; closing response");
            }
        })
        .take_while(|item| future::ready(item.is_ok()))
        .filter_map(|item| future::ready(item.ok().and_then(|t| encode(&SseEvent::assistant(t)))))
        .map(Ok)
        .boxed()
}

/// `200 text/event-stream` with `Cache-Control: no-cache` and
/// `Connection: keep-alive`.
pub fn into_response(events: EventStream) -> Response {
    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(events),
    )
        .into_response()
}

fn encode(event: &SseEvent) -> Option<Event> {
    match Event::default().json_data(event) {
        Ok(ev) => Some(ev),
        Err(e) => {
            warn!(error = %e, "failed to encode chat event");
            None
        }
    }
}
