//! Appointment HTTP Routes
//!
//! Lifecycle endpoints for appointments. Every route requires a valid
//! token; any role may book and manage appointments.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::appointment::model::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::appointment::repository::InMemoryAppointmentRepository;
use crate::appointment::{Appointment, AppointmentError, AppointmentService};
use crate::auth::AccessGuard;
use crate::directory::doctors::InMemoryDoctorRepository;
use crate::directory::patients::InMemoryPatientRepository;

/// Shared appointment state
pub struct AppointmentState {
    pub service: AppointmentService<
        InMemoryAppointmentRepository,
        InMemoryPatientRepository,
        InMemoryDoctorRepository,
    >,
    pub guard: AccessGuard,
}

/// Appointment routes with shared state
pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route(
            "/",
            get(list_appointments_handler).post(create_appointment_handler),
        )
        .route(
            "/:id",
            get(get_appointment_handler)
                .put(update_appointment_handler)
                .delete(delete_appointment_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListAppointmentsQuery {
    patient_id: Option<Uuid>,
    doctor_id: Option<Uuid>,
}

// ==================
// Handlers
// ==================

async fn create_appointment_handler(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppointmentError> {
    state.guard.authorize(&headers, &[])?;

    let appointment = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn get_appointment_handler(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppointmentError> {
    state.guard.authorize(&headers, &[])?;

    let appointment = state.service.get(appointment_id).await?;
    Ok(Json(appointment))
}

/// List by patient or doctor; exactly one filter is required
async fn list_appointments_handler(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppointmentError> {
    state.guard.authorize(&headers, &[])?;

    let appointments = if let Some(patient_id) = query.patient_id {
        state.service.list_for_patient(patient_id).await?
    } else if let Some(doctor_id) = query.doctor_id {
        state.service.list_for_doctor(doctor_id).await?
    } else {
        return Err(AppointmentError::MissingListFilter);
    };

    Ok(Json(appointments))
}

async fn update_appointment_handler(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppointmentError> {
    state.guard.authorize(&headers, &[])?;

    let appointment = state.service.update(appointment_id, request).await?;
    Ok(Json(appointment))
}

async fn delete_appointment_handler(
    State(state): State<Arc<AppointmentState>>,
    headers: HeaderMap,
    Path(appointment_id): Path<Uuid>,
) -> Result<StatusCode, AppointmentError> {
    state.guard.authorize(&headers, &[])?;

    state.service.delete(appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
