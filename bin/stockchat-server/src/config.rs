//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for stockchat-server.
///
/// Every field has a default so the server starts without any environment
/// variables set; only the language-model path needs `OPENAI_API_KEY`.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// sqlx SQLite URL of the inventory store
    /// (default: `"sqlite://stockchat.db?mode=rwc"`).
    pub database_url: String,

    /// Upper bound on pooled store connections.
    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Prefix of tokens treated as stock codes, e.g. `FISH` for `FISH001`.
    pub stock_code_prefix: String,

    /// Upstream model settings.
    pub openai: OpenAiConfig,
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

// Keep the key out of `{:?}` output.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("STOCKCHAT_BIND", "0.0.0.0:3000"),
            database_url: env_or("STOCKCHAT_DATABASE_URL", "sqlite://stockchat.db?mode=rwc"),
            db_max_connections: parse_env("STOCKCHAT_DB_MAX_CONNECTIONS", 5),
            log_level: env_or("STOCKCHAT_LOG", "info"),
            log_json: parse_bool("STOCKCHAT_LOG_JSON", false),
            cors_allowed_origins: std::env::var("STOCKCHAT_CORS_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            enable_swagger: parse_bool("STOCKCHAT_ENABLE_SWAGGER", true),
            stock_code_prefix: env_or("STOCKCHAT_STOCK_CODE_PREFIX", "FISH"),
            openai: OpenAiConfig {
                api_key: std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|v| !v.is_empty()),
                base_url: env_or("STOCKCHAT_OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: env_or("STOCKCHAT_OPENAI_MODEL", "gpt-3.5-turbo"),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".into(),
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            log_level: "info".into(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
            stock_code_prefix: "FISH".into(),
            openai: OpenAiConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-3.5-turbo".into(),
            },
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| match v.trim() {
            "1" => true,
            "0" => false,
            s if s.eq_ignore_ascii_case("true") => true,
            s if s.eq_ignore_ascii_case("false") => false,
            _ => default,
        })
        .unwrap_or(default)
}
