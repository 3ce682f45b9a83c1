mod config;
mod db;
mod errors;
mod feedback;
mod llm_client;
mod pipeline;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::store::{FeedbackStore, MemoryFeedbackStore, PgFeedbackStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MockMate API v{}", env!("CARGO_PKG_VERSION"));
    config.warn_on_degraded();

    // Initialize LLM client (one pooled HTTP client for the whole process)
    let llm = LlmClient::new(&config).context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm.default_model(),
        config.llm_timeout_secs
    );

    // Initialize feedback store
    let feedback_store: Arc<dyn FeedbackStore> = match &config.database_url {
        Some(url) => Arc::new(PgFeedbackStore::new(create_pool(url).await?)),
        None => Arc::new(MemoryFeedbackStore::new()),
    };

    let state = AppState {
        llm: Arc::new(llm),
        feedback_store,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin list

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
