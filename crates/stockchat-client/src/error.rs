use thiserror::Error;

/// Errors returned by [`ChatClient`](crate::ChatClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting, sending, or reading the body failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status and an `{"error": …}` body
    /// (or an unparseable one, carried verbatim).
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The configured server URL could not be used.
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}
