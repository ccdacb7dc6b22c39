//! Client side of stockchat: post a conversation, read the event stream,
//! and keep the resulting message list.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), stockchat_client::ClientError> {
//! use stockchat_client::{ChatClient, MessageList};
//!
//! let client = ChatClient::new("http://localhost:3000")?;
//! let mut conversation = MessageList::new();
//! client.ask(&mut conversation, "somon var mı?").await?;
//! for message in conversation.messages() {
//!     println!("{}: {}", message.role, message.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod reader;

pub use client::ChatClient;
pub use error::ClientError;
pub use messages::MessageList;
pub use reader::{parse_events, read_to_end, ParsedEvent, Utf8Accumulator};
