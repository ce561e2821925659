use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use recommend_common::error::CoreError;

/// Errors are binary here: LLM failures never reach this type (the pipeline
/// falls back and keeps going), everything else surfaces as an HTTP status
/// with a JSON message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("No assessments found")]
    NoResults,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::EmptyQuery => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NoResults => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Config(_) | ApiError::Core(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {self}"),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses_match_contract() {
        assert_eq!(
            ApiError::EmptyQuery.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NoResults.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Core(CoreError::VectorDb("boom".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
