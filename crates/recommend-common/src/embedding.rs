/// Embedding wrapper around fastembed.
///
/// Both ingestion and the recommendation service MUST embed through this type:
/// similarity search silently degrades to noise if the catalog and the queries
/// are embedded with different models. The model is pinned here
/// (nomic-embed-text-v1.5, 768 dimensions) and nowhere else.
///
/// `TextEmbedding` from fastembed is synchronous and CPU-bound, and the inner
/// ONNX runtime is `!Send`, so the model is wrapped in `Arc` and every embed
/// call goes through `tokio::task::spawn_blocking`.
///
/// nomic-embed-text-v1.5 uses task-prefixed inputs:
/// - Documents: "search_document: {text}"
/// - Queries: "search_query: {text}"
use std::sync::Arc;

use crate::error::CoreError;

/// Dimensionality of the pinned embedding model.
pub const EMBEDDING_DIM: usize = 768;

/// Batch size for document embedding, bounds peak memory during ONNX inference.
const DOCUMENT_BATCH_SIZE: usize = 4;

pub struct Embedder {
    model: Arc<fastembed::TextEmbedding>,
}

impl Embedder {
    /// Initialize the embedding model.
    ///
    /// Downloads the model on first run (~300MB); the download happens
    /// synchronously inside a blocking task.
    pub async fn new() -> Result<Self, CoreError> {
        let model = tokio::task::spawn_blocking(|| {
            let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::NomicEmbedTextV15)
                .with_show_download_progress(true);
            fastembed::TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| CoreError::Embedding(format!("spawn_blocking join error: {e}")))?
        .map_err(|e| CoreError::Embedding(format!("model initialization failed: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// Embed assessment documents for indexing.
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        let prefixed: Vec<String> = texts
            .iter()
            .map(|t| format!("search_document: {t}"))
            .collect();
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || model.embed(prefixed, Some(DOCUMENT_BATCH_SIZE)))
            .await
            .map_err(|e| CoreError::Embedding(format!("spawn_blocking join error: {e}")))?
            .map_err(|e| CoreError::Embedding(format!("document embedding failed: {e}")))
    }

    /// Embed a single job query for search.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, CoreError> {
        let prefixed = vec![format!("search_query: {query}")];
        let model = Arc::clone(&self.model);
        let mut results = tokio::task::spawn_blocking(move || model.embed(prefixed, None))
            .await
            .map_err(|e| CoreError::Embedding(format!("spawn_blocking join error: {e}")))?
            .map_err(|e| CoreError::Embedding(format!("query embedding failed: {e}")))?;
        results
            .pop()
            .ok_or_else(|| CoreError::Embedding("empty embedding result".to_string()))
    }
}
