use crate::models::responses::ErrorResponse;
use crate::models::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

/// Every way a request can fail. Client errors carry their exact response
/// message; everything else is reported as a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing title or author")]
    MissingFields,
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Resource not found")]
    ResourceNotFound,
    #[error("Book not found")]
    BookNotFound,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Malformed request body: {0}")]
    Body(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound | ApiError::BookNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_server_error() {
            error!("Internal Server Error: {}", self);
            ErrorResponse::new("Internal Server Error")
        } else {
            ErrorResponse::new(self.to_string())
        };
        (status, Json(body)).into_response()
    }
}
