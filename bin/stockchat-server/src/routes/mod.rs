//! Axum router construction.
//!
//! [`build`] assembles the application router:
//! - `/api/chat` and the `/api/stock/*` lookups
//! - `/health`
//! - Swagger UI and the OpenAPI document (toggle with `STOCKCHAT_ENABLE_SWAGGER`)
//! - CORS and per-request trace-ID middleware

mod chat;
pub mod doc;
mod health;
mod stock;

use std::sync::Arc;

use axum::{middleware, Router};
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api = Router::new().merge(chat::router()).merge(stock::router());

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    // The trace layer is added last so it wraps CORS and sees every request.
    app
        .layer(cors::cors_layer(&state.config))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
