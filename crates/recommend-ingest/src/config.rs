use crate::error::IngestError;

/// Ingestion configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the scraped catalog JSON array.
    pub catalog_path: String,
    /// Filesystem path to the LanceDB data directory.
    pub lancedb_path: String,
    /// Redis connection URL. `None` skips cache invalidation.
    pub redis_url: Option<String>,
}

impl Config {
    /// Required:
    /// - `CATALOG_PATH`: path to the scraped assessments JSON file
    /// - `LANCEDB_PATH`: path to the LanceDB data directory
    ///
    /// Optional:
    /// - `REDIS_URL`: Redis connection string
    pub fn from_env() -> Result<Self, IngestError> {
        let catalog_path = std::env::var("CATALOG_PATH").map_err(|_| {
            IngestError::Config("CATALOG_PATH environment variable is required".to_string())
        })?;

        let lancedb_path = std::env::var("LANCEDB_PATH").map_err(|_| {
            IngestError::Config("LANCEDB_PATH environment variable is required".to_string())
        })?;

        Ok(Self {
            catalog_path,
            lancedb_path,
            redis_url: std::env::var("REDIS_URL").ok(),
        })
    }
}
