//! Per-request tracing span and trace-ID propagation.
//!
//! Request bodies are buffered (up to [`MAX_REQUEST_BODY`]) so small JSON
//! payloads can be logged; response bodies are passed through untouched
//! because chat replies are streams.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServerError;

pub const X_TRACE_ID: &str = "x-trace-id";

/// Largest request body accepted; anything bigger is rejected with 400.
pub const MAX_REQUEST_BODY: usize = 2 * 1024 * 1024;

/// Largest request body logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");

        let id_header = HeaderValue::from_str(&trace_id.to_string()).ok();
        let (mut parts, body) = req.into_parts();

        let mut response = match Limited::new(body, MAX_REQUEST_BODY).collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                log_body(&parts.headers, &bytes);
                if let Some(value) = &id_header {
                    parts.headers.insert(X_TRACE_ID, value.clone());
                }
                next.run(Request::from_parts(parts, Body::from(bytes))).await
            }
            Err(e) => {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    warn!(limit = MAX_REQUEST_BODY, "request body too large");
                } else {
                    warn!(error = %e, "failed to read request body");
                }
                ServerError::InvalidMessage.into_response()
            }
        };

        if let Some(value) = id_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        // For streams this is time-to-headers, not time-to-last-byte.
        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response headers sent"
        );

        response
    }
    .instrument(span)
    .await
}

fn log_body(headers: &HeaderMap, bytes: &Bytes) {
    if bytes.is_empty() {
        return;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match std::str::from_utf8(bytes) {
        Ok(text) if content_type.contains("application/json") && bytes.len() <= MAX_LOGGED_BODY => {
            debug!(body = %text, "request body");
        }
        _ => debug!(content_type, size = bytes.len(), "request body [not logged]"),
    }
}
