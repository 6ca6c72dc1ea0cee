use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    // description of the upstream failure is forwarded to the caller as-is
    #[error("Failed to get AI response: {0}")]
    RemoteFailure(String)
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        AppError::RemoteFailure(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {

        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" }))
            ).into_response(),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message }))
            ).into_response(),
            AppError::RemoteFailure(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get AI response", "message": message }))
            ).into_response()
        }

    }
}
