/// LanceDB vector database wrapper.
///
/// Typed interface over LanceDB for the embedded assessment catalog. The
/// `shl_assessments` table schema is:
/// - id: Utf8 (not null), "assessment_{idx}"
/// - name: Utf8 (not null)
/// - url: Utf8 (not null), unique key of the assessment
/// - description: Utf8 (not null)
/// - test_type: Utf8 (not null), single-letter code (K/P/C/S/O)
/// - category: Utf8 (not null)
/// - level: Utf8 (not null)
/// - text: Utf8 (not null), the document text that was embedded
/// - embedding: FixedSizeList<Float32, 768> (not null)
use std::sync::Arc;

use arrow_array::{RecordBatch, RecordBatchIterator};
use arrow_schema::Schema;
use lancedb::query::{ExecutableQuery, QueryBase};
use tracing::info;

use crate::error::CoreError;

pub struct VectorDb {
    db: lancedb::Connection,
}

impl VectorDb {
    /// Connect to a LanceDB database at the given filesystem path.
    pub async fn connect(path: &str) -> Result<Self, CoreError> {
        let db = lancedb::connect(path)
            .execute()
            .await
            .map_err(|e| CoreError::VectorDb(format!("connection failed: {e}")))?;
        Ok(Self { db })
    }

    /// Create or replace a table with the given schema and data.
    ///
    /// Drops the existing table (if any) and creates a fresh one. This is the
    /// only write path: re-ingestion fully replaces the collection, which keeps
    /// ingest idempotent for a catalog of a few hundred records.
    pub async fn create_or_replace_table(
        &self,
        table_name: &str,
        schema: Arc<Schema>,
        batches: Vec<RecordBatch>,
    ) -> Result<(), CoreError> {
        // Drop existing table if present (the table may not exist yet)
        let _ = self.db.drop_table(table_name).await;

        let batch_iter = RecordBatchIterator::new(batches.into_iter().map(Ok), schema);
        self.db
            .create_table(table_name, Box::new(batch_iter))
            .execute()
            .await
            .map_err(|e| CoreError::VectorDb(format!("create table failed: {e}")))?;

        info!(table = table_name, "vector table created");
        Ok(())
    }

    /// Number of rows in a table. Errors if the table does not exist.
    pub async fn count_rows(&self, table_name: &str) -> Result<usize, CoreError> {
        let table = self
            .db
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| CoreError::VectorDb(format!("open table failed: {e}")))?;
        table
            .count_rows(None)
            .await
            .map_err(|e| CoreError::VectorDb(format!("count rows failed: {e}")))
    }

    /// Search for the nearest vectors to the given query embedding.
    ///
    /// Returns up to `limit` results as RecordBatches, including a `_distance`
    /// column added by LanceDB.
    pub async fn search(
        &self,
        table_name: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<RecordBatch>, CoreError> {
        let table = self
            .db
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| CoreError::VectorDb(format!("open table failed: {e}")))?;

        let results = table
            .vector_search(query_embedding)
            .map_err(|e| CoreError::VectorDb(format!("vector search setup failed: {e}")))?
            .limit(limit)
            .execute()
            .await
            .map_err(|e| CoreError::VectorDb(format!("vector search failed: {e}")))?;

        futures::TryStreamExt::try_collect(results)
            .await
            .map_err(|e| CoreError::VectorDb(format!("collecting search results failed: {e}")))
    }
}
