//! `POST /api/chat`: inventory answers or relayed model output, as SSE.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use stockchat_types::{ErrorBody, SseEvent};
use tracing::warn;
use utoipa::OpenApi;

use crate::chat::{self, sse};
use crate::error::ServerError;
use crate::schemas::chat::{ChatBody, ChatFields};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(post_chat),
    components(schemas(ChatBody, ChatFields, SseEvent, ErrorBody))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(post_chat))
}

/// Answer a chat message as a Server-Sent-Events stream.
///
/// The body is parsed here rather than through the `Json` extractor so that
/// every malformed body, including non-JSON and a wrong content type, gets
/// the same 400 payload.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatBody,
    responses(
        (status = 200, description = "`data: <SseEvent>` frames", content_type = "text/event-stream", body = SseEvent),
        (status = 400, description = "Missing or invalid message", body = ErrorBody),
        (status = 500, description = "Store or model failure", body = ErrorBody),
    )
)]
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let parsed: ChatBody = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_len = body.len(), "rejecting chat body");
        ServerError::InvalidMessage
    })?;
    let request = parsed.resolve().ok_or(ServerError::InvalidMessage)?;

    let events = chat::dispatch(&state, request).await?;
    Ok(sse::into_response(events))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
