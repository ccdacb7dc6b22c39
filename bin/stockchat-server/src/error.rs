//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON `{"error": …}`
//! body with an appropriate status code.
//!
//! Store and upstream failures are logged with full detail, but the client
//! only ever sees the fixed generic message; it cannot tell a database outage
//! from a model-provider outage.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stockchat_types::ErrorBody;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::llm::LlmError;

/// Body message for a request without a usable chat message.
pub const INVALID_MESSAGE: &str = "Mesaj eksik veya geçersiz";

/// Body message for every internal failure.
pub const SERVER_ERROR: &str = "Sunucu hatası";

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body carried no extractable, non-empty message.
    #[error("missing or invalid chat message")]
    InvalidMessage,

    /// A supplementary lookup route found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("language-model error: {0}")]
    Upstream(#[from] LlmError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidMessage => (StatusCode::BAD_REQUEST, INVALID_MESSAGE.to_owned()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::Store(e) => {
                error!(error = %e, "inventory store error");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_owned())
            }
            ServerError::Upstream(e) => {
                error!(error = %e, "language-model provider error");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_owned())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
