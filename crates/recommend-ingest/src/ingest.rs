/// Record batch construction for the assessment table.
///
/// The ingestion flow is: load catalog JSON, compose one document text per
/// assessment, embed all documents, then write everything to LanceDB in a
/// single drop-then-create step. This module owns the Arrow plumbing for the
/// last step.
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};

use recommend_common::embedding::EMBEDDING_DIM;
use recommend_common::error::CoreError;
use recommend_common::model::Assessment;

/// Build an Arrow RecordBatch from the catalog and its embeddings.
///
/// Row ids are positional ("assessment_{idx}"), matching the catalog order.
pub fn build_record_batch(
    assessments: &[Assessment],
    texts: &[String],
    embeddings: &[Vec<f32>],
) -> Result<RecordBatch, CoreError> {
    if embeddings.len() != assessments.len() {
        return Err(CoreError::Embedding(format!(
            "embedding count mismatch: expected {}, got {}",
            assessments.len(),
            embeddings.len()
        )));
    }
    if texts.len() != assessments.len() {
        return Err(CoreError::Catalog(format!(
            "document text count mismatch: expected {}, got {}",
            assessments.len(),
            texts.len()
        )));
    }

    let ids: Vec<String> = (0..assessments.len())
        .map(|idx| format!("assessment_{idx}"))
        .collect();
    let names: Vec<&str> = assessments.iter().map(|a| a.name.as_str()).collect();
    let urls: Vec<&str> = assessments.iter().map(|a| a.url.as_str()).collect();
    let descriptions: Vec<&str> = assessments.iter().map(|a| a.description.as_str()).collect();
    let test_types: Vec<&str> = assessments.iter().map(|a| a.test_type.code()).collect();
    let categories: Vec<&str> = assessments.iter().map(|a| a.category.as_str()).collect();
    let levels: Vec<&str> = assessments.iter().map(|a| a.level.as_str()).collect();
    let text_strs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();

    let id_array: ArrayRef = Arc::new(StringArray::from(
        ids.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ));
    let name_array: ArrayRef = Arc::new(StringArray::from(names));
    let url_array: ArrayRef = Arc::new(StringArray::from(urls));
    let description_array: ArrayRef = Arc::new(StringArray::from(descriptions));
    let test_type_array: ArrayRef = Arc::new(StringArray::from(test_types));
    let category_array: ArrayRef = Arc::new(StringArray::from(categories));
    let level_array: ArrayRef = Arc::new(StringArray::from(levels));
    let text_array: ArrayRef = Arc::new(StringArray::from(text_strs));

    // Build the embedding column as FixedSizeList<Float32>
    let flat_values: Vec<f32> = embeddings.iter().flat_map(|e| e.iter().copied()).collect();
    let values_array = Float32Array::from(flat_values);
    let embedding_array: ArrayRef = Arc::new(
        FixedSizeListArray::try_new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            EMBEDDING_DIM as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| CoreError::VectorDb(format!("failed to build embedding array: {e}")))?,
    );

    let schema = Arc::new(assessment_schema());

    RecordBatch::try_new(
        schema,
        vec![
            id_array,
            name_array,
            url_array,
            description_array,
            test_type_array,
            category_array,
            level_array,
            text_array,
            embedding_array,
        ],
    )
    .map_err(|e| CoreError::VectorDb(format!("failed to build record batch: {e}")))
}

fn assessment_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("test_type", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("level", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new(
            "embedding",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM as i32,
            ),
            false,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommend_common::model::{Level, TestType};

    fn assessment(name: &str, url: &str) -> Assessment {
        Assessment {
            name: name.to_string(),
            url: url.to_string(),
            description: String::new(),
            test_type: TestType::Knowledge,
            category: "Technology".to_string(),
            skills: Vec::new(),
            duration: "N/A".to_string(),
            level: Level::All,
        }
    }

    fn zero_embedding() -> Vec<f32> {
        vec![0.0; EMBEDDING_DIM]
    }

    #[test]
    fn batch_has_one_row_per_assessment() {
        let assessments = vec![
            assessment("Java 8 (New)", "https://example.com/java-8"),
            assessment("Verify Numerical", "https://example.com/verify-n"),
        ];
        let texts = vec!["doc a".to_string(), "doc b".to_string()];
        let embeddings = vec![zero_embedding(), zero_embedding()];

        let batch = build_record_batch(&assessments, &texts, &embeddings).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 9);
        assert!(batch.schema().index_of("embedding").is_ok());
        assert!(batch.schema().index_of("url").is_ok());
    }

    #[test]
    fn embedding_count_mismatch_is_rejected() {
        let assessments = vec![assessment("A", "https://example.com/a")];
        let texts = vec!["doc".to_string()];
        let embeddings: Vec<Vec<f32>> = Vec::new();

        let err = build_record_batch(&assessments, &texts, &embeddings).unwrap_err();
        assert!(matches!(err, CoreError::Embedding(_)));
    }
}
