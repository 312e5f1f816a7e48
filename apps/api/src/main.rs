mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod repository;
mod resumes;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{CompletionBackend, LlmClient};
use crate::matching::JobMatcher;
use crate::repository::PgResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{LocalBackend, ObjectBackend, S3Backend, StorageGateway};

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

    info!("Starting Resume Intel API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    let repo = Arc::new(PgResumeRepository::new(db));

    // Initialize storage: S3 when configured, local filesystem always
    let remote: Option<Arc<dyn ObjectBackend>> = match S3Backend::from_config(&config).await {
        Some(s3) => {
            info!("S3 storage enabled");
            Some(Arc::new(s3))
        }
        None => {
            info!("S3 not configured, using local storage only");
            None
        }
    };
    let local = Arc::new(LocalBackend::new(&config.local_upload_dir));
    let storage = Arc::new(StorageGateway::new(remote, local));

    // Initialize LLM client (optional; analysis degrades to heuristic without it)
    let llm: Option<Arc<dyn CompletionBackend>> = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.llm_model.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, LLM tier disabled");
            None
        }
    };

    let engine = Arc::new(AnalysisEngine::from_config(llm.clone(), &config.scoring));
    let matcher = Arc::new(JobMatcher::new(llm, &config.scoring));

    // Build app state
    let state = AppState {
        repo,
        storage,
        engine,
        matcher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
