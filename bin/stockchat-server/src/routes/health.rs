//! Liveness endpoint for load balancers.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(HealthResponse)))]
pub struct HealthApi;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    pub version: String,
    /// Whether an upstream API key is configured. Without one, only the
    /// inventory path of `/api/chat` can succeed.
    pub model_configured: bool,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Process liveness. Touches neither the store nor the model provider.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        model_configured: state.config.openai.api_key.is_some(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chat::intent::StockCodePattern;
    use crate::config::Config;
    use crate::db::testing::UnreachableStore;
    use crate::llm::testing::RefusingProvider;

    fn state(config: Config) -> Arc<AppState> {
        Arc::new(AppState {
            config: Arc::new(config),
            store: Arc::new(UnreachableStore),
            llm: Arc::new(RefusingProvider),
            stock_codes: StockCodePattern::new("FISH").unwrap(),
        })
    }

    #[tokio::test]
    async fn healthy_even_when_backends_are_down() {
        let Json(body) = get_health(State(state(Config::default()))).await;
        assert_eq!(body.status, "ok");
        assert!(!body.version.is_empty());
        assert!(!body.model_configured);
    }

    #[tokio::test]
    async fn reports_model_key_presence() {
        let mut config = Config::default();
        config.openai.api_key = Some("sk-test".into());
        let Json(body) = get_health(State(state(config))).await;
        assert!(body.model_configured);
    }
}
