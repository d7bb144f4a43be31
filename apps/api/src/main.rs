mod config;
mod db;
mod errors;
mod ingestion;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::ingestion::spawn_ingest_scheduler;
use crate::jobs::store::PgJobStore;
use crate::llm_client::embeddings::{EmbeddingClient, EMBEDDING_MODEL};
use crate::llm_client::{build_http_client, LlmClient, CHAT_MODEL};
use crate::resume::parser::LlmResumeParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // One HTTP client shared by the model clients and the job feed
    let http = build_http_client()?;

    let chat = Arc::new(LlmClient::new(http.clone(), config.groq_api_key.clone()));
    info!("Chat client initialized (model: {CHAT_MODEL})");

    let embedder = Arc::new(EmbeddingClient::new(
        http.clone(),
        config.openai_api_key.clone(),
    ));
    info!("Embedding client initialized (model: {EMBEDDING_MODEL})");

    let state = AppState {
        jobs: Arc::new(PgJobStore::new(db)),
        resume_parser: Arc::new(LlmResumeParser::new(chat.clone())),
        chat,
        embedder,
        http,
        config: config.clone(),
    };

    spawn_ingest_scheduler(state.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
