//! Patient HTTP Routes
//!
//! Patient-only endpoint for creating the caller's medical profile.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};

use crate::auth::user::InMemoryUserRepository;
use crate::auth::{AccessGuard, Role};
use crate::directory::errors::DirectoryError;
use crate::directory::patients::{
    CreatePatientRequest, InMemoryPatientRepository, PatientProfile, PatientService,
};

/// Shared patient state
pub struct PatientState {
    pub service: PatientService<InMemoryPatientRepository, InMemoryUserRepository>,
    pub guard: AccessGuard,
}

/// Patient routes with shared state
pub fn patient_routes(state: Arc<PatientState>) -> Router {
    Router::new()
        .route("/profile", post(create_profile_handler))
        .with_state(state)
}

/// Create a patient profile for an existing PATIENT account
async fn create_profile_handler(
    State(state): State<Arc<PatientState>>,
    headers: HeaderMap,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientProfile>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Patient])?;

    let patient = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}
