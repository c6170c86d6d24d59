use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not identify any places in the query")]
    NoPlacesFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NoPlacesFound => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Could not identify any places in your query" })),
            )
                .into_response(),
            AppError::Internal(msg) => {
                tracing::error!("unhandled failure while serving request: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An unexpected error occurred" })),
                )
                    .into_response()
            }
        }
    }
}
