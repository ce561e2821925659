/// Redis caching layer for recommendation results.
///
/// Lives in the shared crate because two binaries touch the same keys: the
/// HTTP service reads and writes them, and the ingestion binary invalidates
/// them after replacing the vector table.
///
/// Key schema (namespaced to avoid collisions):
/// - `rec:v1:recommend:{sha256(query)}`: JSON-serialized Vec<Recommendation> (TTL: 3600s)
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::model::Recommendation;
use crate::redis::RedisCache;

const KEY_PREFIX: &str = "rec:v1:";
const RECOMMEND_TTL_SECS: u64 = 3600;

pub struct RecommendationCache {
    redis: RedisCache,
}

impl RecommendationCache {
    pub fn new(redis: RedisCache) -> Self {
        Self { redis }
    }

    pub async fn get_recommendations(&self, query: &str) -> Option<Vec<Recommendation>> {
        let key = recommend_key(query);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_recommendations(&self, query: &str, recommendations: &[Recommendation]) {
        let key = recommend_key(query);
        if let Ok(json) = serde_json::to_string(recommendations) {
            self.redis.set_with_ttl(&key, &json, RECOMMEND_TTL_SECS).await;
        }
    }

    /// Delete all cached recommendations. Called after re-ingestion.
    pub async fn invalidate_all(&self) {
        self.redis.delete_by_prefix(KEY_PREFIX).await;
    }
}

/// Deterministic cache key for a query using SHA-256.
fn recommend_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}recommend:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::recommend_key;

    #[test]
    fn keys_are_stable_and_distinct() {
        let a = recommend_key("Java developer");
        let b = recommend_key("Java developer");
        let c = recommend_key("Python developer");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("rec:v1:recommend:"));
    }
}
