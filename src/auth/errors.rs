//! # Auth Errors
//!
//! Error types for identity, tokens, and access control.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Credential Errors
    // ==================
    /// Login failed (generic on purpose - never say which part was wrong)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("email already registered")]
    EmailAlreadyExists,

    /// Username already taken
    #[error("username already taken")]
    UsernameTaken,

    /// A signup or user-creation field failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Password does not meet requirements
    #[error("{0}")]
    WeakPassword(String),

    // ==================
    // Token Errors
    // ==================
    /// No Authorization header on the request
    #[error("missing authorization header")]
    MissingToken,

    /// Authorization header is not a bearer token
    #[error("invalid authorization header format")]
    MalformedAuthHeader,

    /// Signature did not verify or the payload is not a session token
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its expiry
    #[error("token expired")]
    TokenExpired,

    // ==================
    // Authorization
    // ==================
    /// Authenticated, but the role is not allowed here
    #[error("insufficient permissions")]
    Forbidden,

    // ==================
    // Lookups
    // ==================
    /// User does not exist
    #[error("user not found")]
    UserNotFound,

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("internal error: password hashing failed")]
    HashingFailed,

    /// Token signing failed
    #[error("internal error: token signing failed")]
    TokenSigningFailed,

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::MalformedAuthHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AuthError::Forbidden => StatusCode::FORBIDDEN,

            // 404 Not Found
            AuthError::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::UsernameTaken => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenSigningFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate("email") => AuthError::EmailAlreadyExists,
            StoreError::Duplicate("username") => AuthError::UsernameTaken,
            other => AuthError::Storage(other),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "auth operation failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::EmailAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::Storage(StoreError::Timeout).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credential_error_does_not_leak_detail() {
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("email"));
    }

    #[test]
    fn test_duplicate_store_errors_map_to_conflicts() {
        assert!(matches!(
            AuthError::from(StoreError::Duplicate("email")),
            AuthError::EmailAlreadyExists
        ));
        assert!(matches!(
            AuthError::from(StoreError::Duplicate("username")),
            AuthError::UsernameTaken
        ));
        assert!(matches!(
            AuthError::from(StoreError::Timeout),
            AuthError::Storage(StoreError::Timeout)
        ));
    }
}
