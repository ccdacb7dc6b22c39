use reqwest::{Client, Url};
use serde::Serialize;
use stockchat_types::{ChatTurn, ErrorBody};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::messages::MessageList;
use crate::reader::{parse_events, read_to_end, ParsedEvent};

/// HTTP client for `POST /api/chat`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: Url,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    messages: &'a [ChatTurn],
}

impl ChatClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&format!("{}/api/chat", base_url.trim_end_matches('/')))
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        Ok(Self {
            http: Client::builder().build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post the whole conversation and return the events of the reply.
    ///
    /// The response body is read to the end before it is parsed.
    pub async fn send(&self, conversation: &MessageList) -> Result<Vec<ParsedEvent>, ClientError> {
        let turns = conversation.turns();
        debug!(endpoint = %self.endpoint, turns = turns.len(), "posting chat");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatBody { messages: &turns })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = read_to_end(response.bytes_stream()).await?;
        debug!(raw = %body, "chat stream complete");
        Ok(parse_events(&body))
    }

    /// Append `content` as a user message, send the conversation and append
    /// the reply. Returns how many reply messages were appended.
    ///
    /// On error the user message stays in the list.
    pub async fn ask(
        &self,
        conversation: &mut MessageList,
        content: impl Into<String>,
    ) -> Result<usize, ClientError> {
        conversation.push_user(content);
        let events = self.send(conversation).await?;
        let added = conversation.apply_events(events);
        info!(added, total = conversation.len(), "reply received");
        Ok(added)
    }
}

#[cfg(test)]
mod test {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP/1.1 response, returning the base URL and a
    /// handle yielding the raw request.
    async fn one_shot_server(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..end]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= end + 4 + length
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            ChatClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ChatClient::new("ftp://host"),
            Err(ClientError::InvalidUrl(_))
        ));
        let client = ChatClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:3000/api/chat");
    }

    #[tokio::test]
    async fn ask_appends_reply_after_full_read() {
        let (base, server) = one_shot_server(
            "HTTP/1.1 200 OK\r\n\
             content-type: text/event-stream\r\n\
             connection: close\r\n\r\n\
             data: {\"id\":\"1\",\"role\":\"assistant\",\"content\":\"Levrek (Kod: FISH002) - Alternatifler: Çipura\"}\n\n",
        )
        .await;

        let client = ChatClient::new(&base).unwrap();
        let mut conversation = MessageList::new();
        let added = client.ask(&mut conversation, "levrek").await.unwrap();

        assert_eq!(added, 1);
        assert_eq!(conversation.len(), 2);
        assert_eq!(
            conversation.messages()[1].content,
            "Levrek (Kod: FISH002) - Alternatifler: Çipura"
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.contains(r#"{"messages":[{"role":"user","content":"levrek"}]}"#));
    }

    #[tokio::test]
    async fn error_payload_becomes_api_error() {
        let (base, _server) = one_shot_server(
            "HTTP/1.1 400 Bad Request\r\n\
             content-type: application/json\r\n\
             connection: close\r\n\r\n\
             {\"error\":\"Mesaj eksik veya geçersiz\"}",
        )
        .await;

        let client = ChatClient::new(&base).unwrap();
        let mut conversation = MessageList::new();
        let err = client.ask(&mut conversation, "").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Mesaj eksik veya geçersiz");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(conversation.len(), 1);
    }
}
