//! Upstream language-model client.
//!
//! [`CompletionProvider`] streams a chat completion as text fragments. The
//! server only depends on the trait; [`openai::OpenAiProvider`] is the
//! production implementation.

pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;
use stockchat_types::ChatTurn;
use thiserror::Error;

/// Incremental text fragments, in upstream order.
pub type TokenStream = BoxStream<'static, Result<String, LlmError>>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("upstream HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("no API key configured for the language-model provider")]
    MissingApiKey,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Start a streaming completion over `turns`.
    ///
    /// Connection and status errors are returned here, before any fragment
    /// is produced; later failures arrive as `Err` items on the stream.
    async fn stream_chat(&self, turns: Vec<ChatTurn>) -> Result<TokenStream, LlmError>;
}

#[cfg(test)]
pub mod testing {
    //! Provider doubles for handler tests.

    use std::sync::Mutex;

    use futures::stream;

    use super::*;

    /// Replays a fixed list of fragments and records what it was asked.
    #[derive(Default)]
    pub struct ScriptedProvider {
        pub fragments: Vec<String>,
        pub calls: Mutex<Vec<Vec<ChatTurn>>>,
    }

    impl ScriptedProvider {
        pub fn new(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn stream_chat(&self, turns: Vec<ChatTurn>) -> Result<TokenStream, LlmError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(turns);
            }
            let items: Vec<Result<String, LlmError>> =
                self.fragments.iter().cloned().map(Ok).collect();
            Ok(Box::pin(stream::iter(items)))
        }
    }

    /// Refuses every request, like an upstream without credentials.
    pub struct RefusingProvider;

    #[async_trait]
    impl CompletionProvider for RefusingProvider {
        async fn stream_chat(&self, _: Vec<ChatTurn>) -> Result<TokenStream, LlmError> {
            Err(LlmError::MissingApiKey)
        }
    }
}
