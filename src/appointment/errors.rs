//! # Appointment Errors
//!
//! Error types for the appointment lifecycle.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::errors::ErrorBody;
use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for appointment operations
pub type AppointmentResult<T> = Result<T, AppointmentError>;

/// Appointment lifecycle errors
#[derive(Debug, Clone, Error)]
pub enum AppointmentError {
    // ==================
    // Missing Records (404)
    // ==================
    /// Referenced patient profile does not exist
    #[error("patient not found")]
    PatientNotFound,

    /// Referenced doctor profile does not exist
    #[error("doctor not found")]
    DoctorNotFound,

    /// Appointment does not exist
    #[error("appointment not found")]
    NotFound,

    // ==================
    // Business Rules (400)
    // ==================
    /// Scheduled datetime is not in the future
    #[error("appointment date must be in the future")]
    ScheduleInPast,

    /// Duration below one minute
    #[error("duration must be at least one minute")]
    InvalidDuration,

    /// COMPLETED status can never change
    #[error("cannot change status of completed appointment")]
    CompletedStatusImmutable,

    /// CANCELLED appointments accept no changes at all
    #[error("cannot update cancelled appointment")]
    CancelledImmutable,

    /// COMPLETED appointments are part of the medical record
    #[error("cannot delete completed appointment")]
    CompletedUndeletable,

    /// Listing requires exactly one party filter
    #[error("patient_id or doctor_id query parameter is required")]
    MissingListFilter,

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
    Storage(#[from] StoreError),
}

impl AppointmentError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppointmentError::ScheduleInPast => StatusCode::BAD_REQUEST,
            AppointmentError::InvalidDuration => StatusCode::BAD_REQUEST,
            AppointmentError::CompletedStatusImmutable => StatusCode::BAD_REQUEST,
            AppointmentError::CancelledImmutable => StatusCode::BAD_REQUEST,
            AppointmentError::CompletedUndeletable => StatusCode::BAD_REQUEST,
            AppointmentError::MissingListFilter => StatusCode::BAD_REQUEST,

            // 401/403 from the guard
            AppointmentError::Auth(auth_err) => auth_err.status_code(),

            // 404 Not Found
            AppointmentError::PatientNotFound => StatusCode::NOT_FOUND,
            AppointmentError::DoctorNotFound => StatusCode::NOT_FOUND,
            AppointmentError::NotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            AppointmentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppointmentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "appointment operation failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
