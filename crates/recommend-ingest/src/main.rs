mod config;
mod error;
mod ingest;

use tracing::info;
use tracing_subscriber::EnvFilter;

use recommend_common::cache::RecommendationCache;
use recommend_common::catalog;
use recommend_common::embedding::Embedder;
use recommend_common::redis::RedisCache;
use recommend_common::vectordb::VectorDb;
use recommend_common::ASSESSMENT_TABLE;

use config::Config;

/// Query used to sanity-check the fresh index before declaring success.
const SMOKE_QUERY: &str = "Java developer with communication skills";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("starting catalog ingestion");

    let config = Config::from_env()?;
    info!(
        catalog = %config.catalog_path,
        lancedb_path = %config.lancedb_path,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 1. Load and normalize the scraped catalog
    let assessments = catalog::load_catalog(std::path::Path::new(&config.catalog_path))?;
    anyhow::ensure!(!assessments.is_empty(), "catalog is empty, nothing to ingest");

    // 2. Compose document texts
    let texts: Vec<String> = assessments.iter().map(catalog::compose_document_text).collect();

    // 3. Embed all documents with the pinned model
    info!("initializing embedding model (may download on first run)");
    let embedder = Embedder::new().await?;
    info!(documents = texts.len(), "generating embeddings");
    let embeddings = embedder.embed_documents(&texts).await?;

    // 4. Replace the LanceDB table (drop-then-create, idempotent)
    let batch = ingest::build_record_batch(&assessments, &texts, &embeddings)?;
    let schema = batch.schema();

    let vectordb = VectorDb::connect(&config.lancedb_path).await?;
    vectordb
        .create_or_replace_table(ASSESSMENT_TABLE, schema, vec![batch])
        .await?;

    let row_count = vectordb.count_rows(ASSESSMENT_TABLE).await?;
    anyhow::ensure!(
        row_count == assessments.len(),
        "row count mismatch after ingest: expected {}, got {row_count}",
        assessments.len()
    );
    info!(rows = row_count, table = ASSESSMENT_TABLE, "ingestion complete");

    // 5. Every cached recommendation list is stale now
    let redis = RedisCache::new(config.redis_url.as_deref());
    if redis.is_available().await {
        RecommendationCache::new(redis).invalidate_all().await;
        info!("recommendation cache invalidated");
    }

    // 6. Smoke query against the fresh index
    let query_embedding = embedder.embed_query(SMOKE_QUERY).await?;
    let batches = vectordb.search(ASSESSMENT_TABLE, &query_embedding, 3).await?;
    let hits: usize = batches.iter().map(|b| b.num_rows()).sum();
    info!(query = SMOKE_QUERY, hits, "smoke query done");
    anyhow::ensure!(hits > 0, "smoke query returned no results");

    Ok(())
}
