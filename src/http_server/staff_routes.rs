//! Staff HTTP Routes
//!
//! Admin-only doctor and nurse management: profile creation, doctor
//! lookup and weekly availability slots. Mounted under /admin.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::auth::user::InMemoryUserRepository;
use crate::auth::{AccessGuard, Role};
use crate::directory::availability::{
    AvailabilityService, AvailabilitySlot, CreateAvailabilityRequest, InMemoryAvailabilityRepository,
};
use crate::directory::doctors::{
    CreateDoctorRequest, DoctorProfile, DoctorService, InMemoryDoctorRepository,
};
use crate::directory::errors::DirectoryError;
use crate::directory::nurses::{CreateNurseRequest, InMemoryNurseRepository, NurseProfile, NurseService};

/// Shared staff management state
pub struct StaffState {
    pub doctors: DoctorService<InMemoryDoctorRepository, InMemoryUserRepository>,
    pub nurses: NurseService<InMemoryNurseRepository, InMemoryUserRepository>,
    pub availability: AvailabilityService<InMemoryAvailabilityRepository, InMemoryDoctorRepository>,
    pub guard: AccessGuard,
}

/// Staff routes with shared state. The static `availability` segment
/// takes precedence over the `:id` capture.
pub fn staff_routes(state: Arc<StaffState>) -> Router {
    Router::new()
        .route("/doctors", post(create_doctor_handler))
        .route("/doctors/availability", post(create_availability_handler))
        .route("/doctors/:id", get(get_doctor_handler))
        .route("/doctors/:id/availability", get(list_availability_handler))
        .route("/nurses", post(create_nurse_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// Attach a doctor profile to an existing account
async fn create_doctor_handler(
    State(state): State<Arc<StaffState>>,
    headers: HeaderMap,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<DoctorProfile>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let doctor = state.doctors.create(request).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// Fetch one doctor profile
async fn get_doctor_handler(
    State(state): State<Arc<StaffState>>,
    headers: HeaderMap,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorProfile>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let doctor = state.doctors.get(doctor_id).await?;
    Ok(Json(doctor))
}

/// Attach a nurse profile to an existing account
async fn create_nurse_handler(
    State(state): State<Arc<StaffState>>,
    headers: HeaderMap,
    Json(request): Json<CreateNurseRequest>,
) -> Result<(StatusCode, Json<NurseProfile>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let nurse = state.nurses.create(request).await?;
    Ok((StatusCode::CREATED, Json(nurse)))
}

/// Record a weekly availability slot for a doctor
async fn create_availability_handler(
    State(state): State<Arc<StaffState>>,
    headers: HeaderMap,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilitySlot>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let slot = state.availability.create(request).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// All availability slots for one doctor
async fn list_availability_handler(
    State(state): State<Arc<StaffState>>,
    headers: HeaderMap,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<AvailabilitySlot>>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let slots = state.availability.list_for_doctor(doctor_id).await?;
    Ok(Json(slots))
}
