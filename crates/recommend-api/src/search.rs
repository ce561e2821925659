/// Vector search over the embedded assessment catalog.
///
/// Embeds a query with the pinned model, performs nearest-neighbor search in
/// LanceDB, and converts distances to similarity scores.
use std::sync::Arc;

use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use tracing::warn;

use recommend_common::embedding::Embedder;
use recommend_common::error::CoreError;
use recommend_common::model::TestType;
use recommend_common::vectordb::VectorDb;
use recommend_common::ASSESSMENT_TABLE;

/// An assessment pulled back from vector search, before reranking.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub test_type: TestType,
    /// Similarity in [0, 1], derived from the search distance.
    pub score: f32,
}

pub struct SearchEngine {
    embedder: Arc<Embedder>,
    vectordb: Arc<VectorDb>,
}

impl SearchEngine {
    pub fn new(embedder: Arc<Embedder>, vectordb: Arc<VectorDb>) -> Self {
        Self { embedder, vectordb }
    }

    /// Number of assessments currently in the catalog table.
    pub async fn catalog_size(&self) -> Result<usize, CoreError> {
        self.vectordb.count_rows(ASSESSMENT_TABLE).await
    }

    /// Nearest-neighbor search for the query text, up to `limit` candidates
    /// ranked by similarity (lowest distance first).
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, CoreError> {
        let query_embedding = self.embedder.embed_query(query).await?;
        let batches = self
            .vectordb
            .search(ASSESSMENT_TABLE, &query_embedding, limit)
            .await?;
        Ok(extract_candidates(&batches))
    }
}

/// Convert a LanceDB distance to a similarity score.
///
/// Lower distance means more similar; invert so higher score = more similar,
/// clamped to [0, 1] per the response contract.
pub fn distance_to_score(distance: f32) -> f32 {
    (1.0_f32 - distance).clamp(0.0, 1.0)
}

/// Extract `Candidate` values from LanceDB search result batches.
///
/// Expected columns: id, name, url, description, test_type (all Utf8) and the
/// `_distance` column (Float32) LanceDB appends.
fn extract_candidates(batches: &[RecordBatch]) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for batch in batches {
        let num_rows = batch.num_rows();
        let schema = batch.schema();

        let id_col = get_string_column(batch, &schema, "id");
        let name_col = get_string_column(batch, &schema, "name");
        let url_col = get_string_column(batch, &schema, "url");
        let description_col = get_string_column(batch, &schema, "description");
        let test_type_col = get_string_column(batch, &schema, "test_type");
        let distance_col = get_float_column(batch, &schema, "_distance");

        let (Some(id_col), Some(name_col), Some(url_col), Some(description_col), Some(test_type_col)) =
            (id_col, name_col, url_col, description_col, test_type_col)
        else {
            warn!("search result batch missing expected columns");
            continue;
        };

        for row in 0..num_rows {
            let distance: f32 = distance_col.map(|c| c.value(row)).unwrap_or(0.0);
            candidates.push(Candidate {
                id: id_col.value(row).to_string(),
                name: name_col.value(row).to_string(),
                url: url_col.value(row).to_string(),
                description: description_col.value(row).to_string(),
                test_type: TestType::from_code(test_type_col.value(row)),
                score: distance_to_score(distance),
            });
        }
    }

    candidates
}

fn get_string_column<'a>(
    batch: &'a RecordBatch,
    schema: &arrow_schema::Schema,
    name: &str,
) -> Option<&'a StringArray> {
    let idx = schema.index_of(name).ok()?;
    batch.column(idx).as_any().downcast_ref::<StringArray>()
}

fn get_float_column<'a>(
    batch: &'a RecordBatch,
    schema: &arrow_schema::Schema,
    name: &str,
) -> Option<&'a Float32Array> {
    let idx = schema.index_of(name).ok()?;
    batch.column(idx).as_any().downcast_ref::<Float32Array>()
}

#[cfg(test)]
mod tests {
    use super::distance_to_score;

    #[test]
    fn scores_clamp_to_unit_interval() {
        assert_eq!(distance_to_score(0.0), 1.0);
        assert_eq!(distance_to_score(0.25), 0.75);
        assert_eq!(distance_to_score(1.5), 0.0);
        assert_eq!(distance_to_score(-0.5), 1.0);
    }
}
