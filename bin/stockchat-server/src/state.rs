//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::chat::intent::StockCodePattern;
use crate::config::Config;
use crate::db::InventoryStore;
use crate::llm::CompletionProvider;

/// State shared across all HTTP handlers.
///
/// Built once in `main`; the store's connection pool lives as long as the
/// last clone of this state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Inventory lookups.
    pub store: Arc<dyn InventoryStore>,
    /// Streaming language-model client.
    pub llm: Arc<dyn CompletionProvider>,
    /// Compiled from `config.stock_code_prefix`.
    pub stock_codes: StockCodePattern,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("stock_codes", &self.stock_codes)
            .finish_non_exhaustive()
    }
}
