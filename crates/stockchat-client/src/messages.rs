use stockchat_types::{ChatMessage, ChatTurn, Role};

use crate::reader::ParsedEvent;

/// Ordered, append-only conversation held by the client.
#[derive(Debug, Clone, Default)]
pub struct MessageList {
    messages: Vec<ChatMessage>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(Role::User, content))
    }

    /// Append one message per event, each with a fresh id. Returns how many
    /// were appended.
    pub fn apply_events(&mut self, events: impl IntoIterator<Item = ParsedEvent>) -> usize {
        let before = self.messages.len();
        for event in events {
            self.push(ChatMessage::new(event.role, event.content));
        }
        self.messages.len() - before
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The conversation in request form.
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(ChatMessage::to_turn).collect()
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
