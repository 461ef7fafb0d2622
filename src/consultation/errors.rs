//! # Consultation Errors
//!
//! Error types for the consultation workflow.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::errors::ErrorBody;
use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for consultation operations
pub type ConsultationResult<T> = Result<T, ConsultationError>;

/// Consultation workflow errors
#[derive(Debug, Clone, Error)]
pub enum ConsultationError {
    // ==================
    // Missing Records (404)
    // ==================
    /// Referenced appointment does not exist
    #[error("appointment not found")]
    AppointmentNotFound,

    /// Consultation does not exist
    #[error("consultation not found")]
    NotFound,

    // ==================
    // Business Rules (400)
    // ==================
    /// Consultations only follow completed appointments
    #[error("consultation can only be created for completed appointments")]
    AppointmentNotCompleted,

    /// Patient and doctor must be the appointment's own
    #[error("patient and doctor must match the appointment")]
    PartyMismatch,

    /// Diagnosis is the one mandatory clinical field
    #[error("diagnosis is required")]
    MissingDiagnosis,

    /// The record's edit lock is closed
    #[error("consultation is not editable")]
    NotEditable,

    /// Listing requires a filter
    #[error("appointment_id or patient_id query parameter is required")]
    MissingListFilter,

    // ==================
    // Conflicts (409)
    // ==================
    /// At most one consultation per appointment
    #[error("consultation already exists for this appointment")]
    AlreadyExists,

    // ==================
    // Auth Errors
    // ==================
    /// Authentication or authorization failure
    #[error("{0}")]
    Auth(#[from] AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl ConsultationError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ConsultationError::AppointmentNotCompleted => StatusCode::BAD_REQUEST,
            ConsultationError::PartyMismatch => StatusCode::BAD_REQUEST,
            ConsultationError::MissingDiagnosis => StatusCode::BAD_REQUEST,
            ConsultationError::NotEditable => StatusCode::BAD_REQUEST,
            ConsultationError::MissingListFilter => StatusCode::BAD_REQUEST,

            // 401/403 from the guard
            ConsultationError::Auth(auth_err) => auth_err.status_code(),

            // 404 Not Found
            ConsultationError::AppointmentNotFound => StatusCode::NOT_FOUND,
            ConsultationError::NotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            ConsultationError::AlreadyExists => StatusCode::CONFLICT,

            // 500 Internal Server Error
            ConsultationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ConsultationError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store enforces the one-per-appointment rule under its
            // write lock; a racing insert surfaces as the same conflict
            // the lookup-before-insert path reports.
            StoreError::Duplicate(_) => ConsultationError::AlreadyExists,
            other => ConsultationError::Storage(other),
        }
    }
}

impl IntoResponse for ConsultationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "consultation operation failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
