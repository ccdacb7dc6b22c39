//! OpenAI-compatible streaming chat completions over `reqwest`.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stockchat_types::ChatTurn;
use tracing::{debug, warn};

use super::{CompletionProvider, LlmError, TokenStream};
use crate::config::OpenAiConfig;

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(cfg: &OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionChunk {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.delta)
            .and_then(|d| d.content)
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn stream_chat(&self, turns: Vec<ChatTurn>) -> Result<TokenStream, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        debug!(model = %self.model, turns = turns.len(), "starting upstream completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages: &turns,
                stream: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(LlmError::Status { status, body });
        }

        Ok(delta_stream(response.bytes_stream().boxed()))
    }
}

/// Turn an upstream SSE body into its `delta.content` fragments.
fn delta_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> TokenStream {
    struct State {
        body: BoxStream<'static, reqwest::Result<Bytes>>,
        decoder: DeltaDecoder,
        pending: VecDeque<String>,
        finished: bool,
    }

    let state = State {
        body,
        decoder: DeltaDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(fragment) = st.pending.pop_front() {
                return Some((Ok(fragment), st));
            }
            if st.finished || st.decoder.is_done() {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.decoder.push(&chunk)),
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(LlmError::Http(e)), st));
                }
                None => {
                    st.pending.extend(st.decoder.finish());
                    st.finished = true;
                }
            }
        }
    })
    .boxed()
}

/// Line-oriented decoder for OpenAI's streaming format.
///
/// Bytes are buffered until a full line is available so that lines (and
/// multi-byte characters) split across network chunks decode correctly.
#[derive(Debug, Default)]
struct DeltaDecoder {
    buf: Vec<u8>,
    done: bool,
}

impl DeltaDecoder {
    fn is_done(&self) -> bool {
        self.done
    }

    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        while !self.done {
            let Some(pos) = self.buf.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.decode_line(&line, &mut out);
        }
        out
    }

    /// Flush a final line that had no trailing newline.
    fn finish(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.done && !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.decode_line(&line, &mut out);
        }
        out
    }

    fn decode_line(&mut self, raw: &[u8], out: &mut Vec<String>) {
        let line = String::from_utf8_lossy(raw);
        let Some(data) = line.trim_end().strip_prefix("data:") else {
            return;
        };
        let data = data.trim_start();
        if data == "[DONE]" {
            self.done = true;
            self.buf.clear();
            return;
        }
        match serde_json::from_str::<CompletionChunk>(data) {
            Ok(chunk) => out.extend(chunk.into_content()),
            Err(e) => warn!(error = %e, line = %data, "skipping undecodable upstream chunk"),
        }
    }
}
