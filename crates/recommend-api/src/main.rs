mod config;
mod error;
mod rank;
mod search;
mod server;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recommend_common::cache::RecommendationCache;
use recommend_common::embedding::Embedder;
use recommend_common::llm::{LlmClient, LlmConfig};
use recommend_common::redis::RedisCache;
use recommend_common::vectordb::VectorDb;
use recommend_common::ASSESSMENT_TABLE;

use config::Config;
use search::SearchEngine;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("starting recommendation service");

    let config = Config::from_env()?;
    info!(
        lancedb_path = %config.lancedb_path,
        bind_addr = %config.bind_addr,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    let redis_cache = RedisCache::new(config.redis_url.as_deref());
    if redis_cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }
    let cache = RecommendationCache::new(redis_cache);

    info!("initializing embedding model (may download on first run)");
    let embedder = Arc::new(Embedder::new().await?);
    info!("embedding model ready");

    let vectordb = Arc::new(VectorDb::connect(&config.lancedb_path).await?);
    match vectordb.count_rows(ASSESSMENT_TABLE).await {
        Ok(0) => warn!("assessment table is empty, run recommend-ingest first"),
        Ok(rows) => info!(rows, "assessment table loaded"),
        Err(e) => warn!(error = %e, "assessment table missing, run recommend-ingest first"),
    }

    let llm = match LlmConfig::from_env() {
        Some(llm_config) => {
            info!(
                base_url = %llm_config.base_url,
                model = %llm_config.model,
                "llm client configured"
            );
            Some(LlmClient::new(llm_config)?)
        }
        None => {
            info!("LLM_BASE_URL not set, running without enhancement or reranking");
            None
        }
    };

    let state = Arc::new(AppState {
        search: SearchEngine::new(embedder, vectordb),
        llm,
        cache,
    });

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "http server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
