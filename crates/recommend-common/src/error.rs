/// Error types shared across the recommendation crates.
///
/// These errors represent failures in infrastructure components (Redis, vector DB,
/// embeddings, catalog loading) that both the ingestion binary and the HTTP service
/// depend on. Application-specific errors are defined in each binary crate and wrap
/// `CoreError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("vector db error: {0}")]
    VectorDb(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("catalog error: {0}")]
    Catalog(String),
}
