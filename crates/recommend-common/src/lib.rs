pub mod cache;
pub mod catalog;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod model;
pub mod redis;
pub mod vectordb;

/// LanceDB table holding the embedded assessment catalog.
pub const ASSESSMENT_TABLE: &str = "shl_assessments";
