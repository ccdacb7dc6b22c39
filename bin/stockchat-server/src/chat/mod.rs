//! Chat request pipeline: classify, answer, stream.

pub mod intent;
pub mod inventory;
pub mod sse;

use tracing::{debug, info};

use crate::error::ServerError;
use crate::schemas::chat::ChatRequest;
use crate::state::AppState;
use intent::Intent;
use sse::EventStream;

/// Route one validated request to the inventory or the language model and
/// return the events to stream back.
///
/// The inventory path yields exactly one event. The model path yields one
/// event per upstream fragment. Failures before the first event become
/// `ServerError`s; nothing is retried.
pub async fn dispatch(state: &AppState, request: ChatRequest) -> Result<EventStream, ServerError> {
    let message = request
        .user_message()
        .ok_or(ServerError::InvalidMessage)?;

    match intent::classify(message) {
        Intent::Inventory { token } => {
            info!(%token, "inventory query");
            let text = inventory::answer(state.store.as_ref(), &state.stock_codes, &token).await?;
            debug!(reply_len = text.len(), "inventory reply ready");
            Ok(sse::single(text))
        }
        Intent::Conversation => {
            let turns = request.into_turns();
            info!(turns = turns.len(), "forwarding to language model");
            let tokens = state.llm.stream_chat(turns).await?;
            Ok(sse::relay(tokens))
        }
    }
}
