mod cache;
mod config;
mod cv;
mod documents;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{MemoryProfileCache, ProfileCache, RedisProfileCache};
use crate::config::Config;
use crate::cv::{CvPipeline, LlmProfileExtractor, ProfileExtractor};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cv-api v{}", env!("CARGO_PKG_VERSION"));

    let cache: Arc<dyn ProfileCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).context("invalid REDIS_URL")?;
            info!("Redis profile cache initialized");
            Arc::new(RedisProfileCache::new(client, config.cache_ttl))
        }
        None => {
            info!("REDIS_URL not set, using in-process profile cache");
            Arc::new(MemoryProfileCache::new(config.cache_ttl))
        }
    };

    let extractor: Option<Arc<dyn ProfileExtractor>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.ai_timeout)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmProfileExtractor::new(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, AI parsing disabled; using rule-based extraction only");
            None
        }
    };

    let pipeline = CvPipeline::new(
        extractor,
        cache,
        config.ai_timeout,
        config.min_text_chars,
    );
    info!(
        ai_enabled = pipeline.ai_enabled(),
        timeout_secs = config.ai_timeout.as_secs(),
        "CV pipeline ready"
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
