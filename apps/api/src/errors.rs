use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::ranking::RankingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required request field is absent; rejected before any work starts.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Résumé text or skill extraction failed.
    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("Ranking did not finish within {0}ms")]
    RankingTimeout(u64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                "MISSING_FIELD",
                format!("Missing required field: {field}"),
            ),
            AppError::Parse(msg) => {
                tracing::warn!("Parse error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PARSE_ERROR",
                    msg.clone(),
                )
            }
            AppError::Ranking(RankingError::ResumeEmbedding(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DEGENERATE_VECTOR",
                format!("Resume embedding cannot be compared: {e}"),
            ),
            AppError::Ranking(e) => {
                tracing::error!("Ranking error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RANKING_ERROR",
                    "Ranking jobs failed".to_string(),
                )
            }
            AppError::RankingTimeout(ms) => {
                tracing::warn!("Ranking timed out after {ms}ms");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "RANKING_TIMEOUT",
                    "Ranking jobs took too long".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
