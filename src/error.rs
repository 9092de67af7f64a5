use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for every API handler. Converted to a `{message, error?}`
/// JSON body at the boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage error")]
    Storage(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({ "message": "Database error", "error": e.to_string() })
            }
            ApiError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                json!({ "message": "Storage error", "error": e.to_string() })
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                json!({ "message": msg })
            }
            other => {
                tracing::warn!(status = %status, "Request failed: {other}");
                json!({ "message": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
