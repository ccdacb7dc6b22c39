use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// CORS for the browser chat UI.
///
/// With `STOCKCHAT_CORS_ORIGINS` set, only those origins are allowed; an
/// unset or unparseable list falls back to any origin.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;

    async fn allowed_origin(config: &Config, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(config));
        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn wildcard_without_allow_list() {
        let config = Config::default();
        assert_eq!(
            allowed_origin(&config, "http://ui.example").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn allow_list_restricts_origins() {
        let config = Config {
            cors_allowed_origins: Some("http://ui.example, http://admin.example".into()),
            ..Config::default()
        };
        assert_eq!(
            allowed_origin(&config, "http://admin.example").await.as_deref(),
            Some("http://admin.example")
        );
        assert_eq!(allowed_origin(&config, "http://evil.example").await, None);
    }
}
