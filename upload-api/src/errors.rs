use crate::config::ValidationError;
use crate::object_store::ObjectStoreError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use letter_store::PersistError;
use serde::Serialize;

/// Errors that can occur while running the upload service
#[derive(thiserror::Error, Debug)]
pub enum UploadApiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("received {files} files but only {letters} letters")]
    MissingLetters { files: usize, letters: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("object store error: {0}")]
    ObjectStore(#[from] ObjectStoreError),

    #[error("document store error: {0}")]
    DocumentStore(#[from] PersistError),
}

#[derive(Serialize)]
struct ApiErrorResponse {
    error_message: String,
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadApiError::Multipart(e) => e.status(),
            UploadApiError::MissingLetters { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ApiErrorResponse {
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}
