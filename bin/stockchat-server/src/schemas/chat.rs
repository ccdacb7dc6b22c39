//! Request body of `POST /api/chat`.

use serde::Deserialize;
use serde_json::Value;
use stockchat_types::{ChatTurn, Role};
use tracing::warn;
use utoipa::ToSchema;

/// Raw body as sent by chat UIs: either a bare JSON string or an object
/// carrying one of `messages`, `message` or `content`.
///
/// ```text
/// {"messages": [{"role": "user", "content": "somon"}]}
/// "somon"
/// {"message": "somon"}
/// {"content": "somon"}
/// ```
///
/// Unknown extra fields (ids, timestamps, model selectors) are ignored.
/// [`ChatBody::resolve`] picks the message.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ChatBody {
    Text(String),
    Fields(ChatFields),
}

/// Object form of [`ChatBody`]. Fields are kept loosely typed so that a
/// wrong-typed field is skipped rather than rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChatFields {
    #[serde(default)]
    #[schema(value_type = Option<Vec<ChatTurn>>)]
    pub messages: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub message: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub content: Option<Value>,
}

/// A chat request after the message has been located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// Full conversation; the last `user` turn is the message.
    Conversation { messages: Vec<ChatTurn> },
    /// A bare JSON string.
    Text(String),
    Message { message: String },
    Content { content: String },
}

impl ChatBody {
    /// Locate the message, checking in order: a `messages` array, a bare
    /// string, a non-empty `message` string, a non-empty `content` string.
    ///
    /// A `messages` array or a bare string ends the search even when it holds
    /// no usable message; `message` and `content` are skipped when empty or
    /// not strings. `None` means the body carries no message at all.
    pub fn resolve(self) -> Option<ChatRequest> {
        let fields = match self {
            ChatBody::Text(text) => return Some(ChatRequest::Text(text)),
            ChatBody::Fields(fields) => fields,
        };

        if let Some(messages @ Value::Array(_)) = fields.messages {
            return match serde_json::from_value::<Vec<ChatTurn>>(messages) {
                Ok(messages) => Some(ChatRequest::Conversation { messages }),
                Err(e) => {
                    warn!(error = %e, "messages array has malformed turns");
                    None
                }
            };
        }
        if let Some(message) = non_empty_string(fields.message) {
            return Some(ChatRequest::Message { message });
        }
        non_empty_string(fields.content).map(|content| ChatRequest::Content { content })
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

impl ChatRequest {
    /// The message to classify, or `None` when absent or empty.
    pub fn user_message(&self) -> Option<&str> {
        let message = match self {
            ChatRequest::Conversation { messages } => messages
                .iter()
                .rev()
                .find(|turn| turn.role == Role::User.as_str())
                .map(|turn| turn.content.as_str()),
            ChatRequest::Text(message)
            | ChatRequest::Message { message }
            | ChatRequest::Content { content: message } => Some(message.as_str()),
        };
        message.filter(|m| !m.is_empty())
    }

    /// Turns to forward to the language model: the whole history for a
    /// conversation, otherwise the single user message.
    pub fn into_turns(self) -> Vec<ChatTurn> {
        match self {
            ChatRequest::Conversation { messages } => messages,
            ChatRequest::Text(message)
            | ChatRequest::Message { message }
            | ChatRequest::Content { content: message } => vec![ChatTurn::user(message)],
        }
    }
}
