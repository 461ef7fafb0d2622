//! # Directory Errors
//!
//! Error types shared by the profile, department, availability and
//! hospital configuration services.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::errors::ErrorBody;
use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Directory errors
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// A referenced record does not exist; the payload names the kind
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A field failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    AlreadyExists(String),

    /// The record exists but its state forbids the operation
    #[error("{0}")]
    InvalidState(String),

    /// Authentication or authorization failure
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl DirectoryError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DirectoryError::InvalidState(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Auth(auth_err) => auth_err.status_code(),
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::AlreadyExists(_) => StatusCode::CONFLICT,
            DirectoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        // Duplicates carry entity-specific messages; the services map
        // them at the call site. Anything reaching this conversion is a
        // plain storage failure.
        DirectoryError::Storage(err)
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "directory operation failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
