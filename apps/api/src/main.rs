mod candidates;
mod config;
mod db;
mod embeddings;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod reports;
mod routes;
mod screening;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::embeddings::HttpEmbedder;
use crate::llm_client::{Generator, LlmClient};
use crate::routes::build_router;
use crate::screening::scoring::RelevanceScorer;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
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

    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    ensure_schema(&pool).await?;
    let store = Arc::new(PgStore::new(pool));

    // Initialize LLM client behind the cooldown-gated generator
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        &config.llm_base_url,
        config.llm_model.clone(),
    )?;
    info!(
        "LLM client initialized (model: {}, cooldown: {:?})",
        llm.model(),
        config.llm_cooldown
    );
    let generator = Generator::new(Arc::new(llm), config.llm_cooldown);

    // Initialize embedding client
    let embedder = HttpEmbedder::new(
        &config.embedding_url,
        config.embedding_model.clone(),
        config.embedding_api_key.clone(),
    )?;
    info!("Embedding client initialized (model: {})", embedder.model());
    let scorer = RelevanceScorer::new(Arc::new(embedder));

    let state = AppState {
        store,
        generator,
        scorer,
    };

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
