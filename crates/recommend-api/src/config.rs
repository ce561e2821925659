use crate::error::ApiError;

/// Service configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem path to the LanceDB data directory.
    pub lancedb_path: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Redis connection URL. `None` disables the recommendation cache.
    pub redis_url: Option<String>,
}

impl Config {
    /// Required:
    /// - `LANCEDB_PATH`: path to the LanceDB data directory
    ///
    /// Optional:
    /// - `BIND_ADDR`: listen address (default "0.0.0.0:8000")
    /// - `REDIS_URL`: Redis connection string
    ///
    /// LLM settings (`LLM_BASE_URL` and friends) are read separately by
    /// `LlmConfig::from_env`; the service runs without them.
    pub fn from_env() -> Result<Self, ApiError> {
        let lancedb_path = std::env::var("LANCEDB_PATH").map_err(|_| {
            ApiError::Config("LANCEDB_PATH environment variable is required".to_string())
        })?;

        Ok(Self {
            lancedb_path,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            redis_url: std::env::var("REDIS_URL").ok(),
        })
    }
}
