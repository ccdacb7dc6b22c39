//! stockchat-server: inventory-aware chat over Server-Sent Events.
//!
//! `main` is the composition root. The store pool and the model client are
//! created here once, handed to every handler through [`AppState`], and the
//! pool is closed after the HTTP server has drained.

mod chat;
mod config;
mod db;
mod error;
mod llm;
mod middleware;
mod normalize;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::chat::intent::StockCodePattern;
use crate::config::Config;
use crate::db::sqlite::SqliteStore;
use crate::llm::openai::OpenAiProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    init_tracing(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), "stockchat-server starting");

    let store = Arc::new(
        SqliteStore::connect(&cfg.database_url, cfg.db_max_connections)
            .await
            .with_context(|| format!("opening inventory store at {}", cfg.database_url))?,
    );
    info!(
        database_url = %cfg.database_url,
        max_connections = cfg.db_max_connections,
        "inventory store ready"
    );

    if cfg.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; messages without words will fail with 500");
    }
    let llm = Arc::new(OpenAiProvider::new(&cfg.openai)?);
    info!(model = %cfg.openai.model, base_url = %cfg.openai.base_url, "model client ready");

    let stock_codes = StockCodePattern::new(&cfg.stock_code_prefix)
        .with_context(|| format!("invalid stock code prefix {:?}", cfg.stock_code_prefix))?;
    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {:?}", cfg.bind_address))?;

    let app = routes::build(Arc::new(AppState {
        config: Arc::new(cfg),
        store: store.clone(),
        llm,
        stock_codes,
    }));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("inventory store closed; bye");
    Ok(())
}

/// `RUST_LOG` wins over `STOCKCHAT_LOG`; an unparseable filter falls back to
/// `info` with a warning on stderr, since the subscriber is not up yet.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|e| {
            eprintln!(
                "WARN: STOCKCHAT_LOG={:?} is not a valid tracing filter ({e}); using \"info\"",
                cfg.log_level
            );
            EnvFilter::new("info")
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);
    if cfg.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = sigterm => {}
    }
    info!("shutting down; draining in-flight requests");
}
