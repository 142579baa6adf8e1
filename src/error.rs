use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Directions API error: {0}")]
    DirectionsApi(String),

    #[error("Location service error: {0}")]
    LocationService(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::InvalidGeometry(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::InvalidTransition(ref e) => (StatusCode::CONFLICT, e.as_str()),
            AppError::DirectionsApi(ref e) => {
                tracing::error!("Directions API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Directions service error")
            }
            AppError::LocationService(ref e) => {
                tracing::error!("Location service error: {}", e);
                (StatusCode::BAD_GATEWAY, "Location service error")
            }
            AppError::Upload(ref e) => {
                tracing::warn!("Upload failed: {}", e);
                (StatusCode::BAD_GATEWAY, "Attachment storage error")
            }
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, e.as_str()),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
