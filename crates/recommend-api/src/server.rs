use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use recommend_common::cache::RecommendationCache;
use recommend_common::llm::LlmClient;
use recommend_common::model::Recommendation;

use crate::error::ApiError;
use crate::rank;
use crate::search::SearchEngine;

pub struct AppState {
    pub search: SearchEngine,
    pub llm: Option<LlmClient>,
    pub cache: RecommendationCache,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<Recommendation>,
    pub processing_time: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: String,
    pub recommend: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/recommend", post(recommend))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Assessment Recommendation API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            health: "/health".to_string(),
            recommend: "/recommend (POST)".to_string(),
        },
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Assessment Recommendation API is running".to_string(),
    })
}

/// Recommend relevant assessments for a job query.
///
/// Pipeline: cache lookup → LLM query enhancement → vector search →
/// LLM reranking → 5–10 results. The two LLM steps degrade gracefully; the
/// others surface as HTTP errors.
async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let started = Instant::now();

    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    if let Some(cached) = state.cache.get_recommendations(&query).await {
        info!(query = %query, "recommendation cache hit");
        return Ok(Json(RecommendResponse {
            query,
            recommendations: cached,
            processing_time: started.elapsed().as_secs_f64(),
        }));
    }

    let enhanced = match &state.llm {
        Some(llm) => rank::enhance_query(llm, &query).await,
        None => query.clone(),
    };

    let catalog_size = state.search.catalog_size().await?;
    let limit = rank::CANDIDATE_LIMIT.min(catalog_size);
    if limit == 0 {
        return Err(ApiError::NoResults);
    }

    let candidates = state.search.search(&enhanced, limit).await?;
    if candidates.is_empty() {
        return Err(ApiError::NoResults);
    }

    let reranked = match &state.llm {
        Some(llm) => rank::rerank(llm, &query, &candidates).await,
        None => candidates.iter().take(rank::MAX_RESULTS).cloned().collect(),
    };
    let selected = rank::finalize(reranked, &candidates);

    let recommendations: Vec<Recommendation> = selected
        .into_iter()
        .map(|c| Recommendation {
            assessment_name: c.name,
            url: c.url,
            score: c.score,
        })
        .collect();

    state.cache.set_recommendations(&query, &recommendations).await;

    info!(
        query = %query,
        results = recommendations.len(),
        "recommendation served"
    );

    Ok(Json(RecommendResponse {
        query,
        recommendations,
        processing_time: started.elapsed().as_secs_f64(),
    }))
}
