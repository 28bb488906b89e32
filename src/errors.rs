use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestrator::{Snapshot, GENERIC_FAILURE};

/// HTTP-facing error. Never carries internal failure detail to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),

    /// Body could not be read as the expected JSON. Serde detail is logged only.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Conflict: {0}")]
    Conflict(&'static str),

    /// Generation failed; the snapshot already holds the generic message.
    #[error("Generation failed")]
    GenerationFailed(Box<Snapshot>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": { "code": "NOT_FOUND", "message": format!("{what} not found") } }),
            ),
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Required fields are missing",
                    "fields": fields
                } }),
            ),
            AppError::InvalidBody(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (
                    rejection.status(),
                    json!({ "error": {
                        "code": "INVALID_BODY",
                        "message": "Request body is not a valid generation config"
                    } }),
                )
            }
            AppError::Conflict(message) => (
                StatusCode::CONFLICT,
                json!({ "error": { "code": "CONFLICT", "message": message } }),
            ),
            AppError::GenerationFailed(snapshot) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": { "code": "GENERATION_FAILED", "message": GENERIC_FAILURE },
                    "session": snapshot
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
