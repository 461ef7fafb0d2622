//! Consultation HTTP Routes
//!
//! Endpoints for the post-appointment consultation workflow. Every
//! route requires a valid token. The collection GET answers two
//! queries: by appointment (the single 1:1 record) or by patient (a
//! list).

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::appointment::repository::InMemoryAppointmentRepository;
use crate::auth::AccessGuard;
use crate::consultation::model::{CreateConsultationRequest, UpdateConsultationRequest};
use crate::consultation::repository::InMemoryConsultationRepository;
use crate::consultation::{Consultation, ConsultationError, ConsultationService};

/// Shared consultation state
pub struct ConsultationState {
    pub service: ConsultationService<InMemoryConsultationRepository, InMemoryAppointmentRepository>,
    pub guard: AccessGuard,
}

/// Consultation routes with shared state
pub fn consultation_routes(state: Arc<ConsultationState>) -> Router {
    Router::new()
        .route(
            "/",
            get(list_consultations_handler).post(create_consultation_handler),
        )
        .route(
            "/:id",
            get(get_consultation_handler).put(update_consultation_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListConsultationsQuery {
    appointment_id: Option<Uuid>,
    patient_id: Option<Uuid>,
}

// ==================
// Handlers
// ==================

async fn create_consultation_handler(
    State(state): State<Arc<ConsultationState>>,
    headers: HeaderMap,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<Consultation>), ConsultationError> {
    state.guard.authorize(&headers, &[])?;

    let consultation = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

async fn get_consultation_handler(
    State(state): State<Arc<ConsultationState>>,
    headers: HeaderMap,
    Path(consultation_id): Path<Uuid>,
) -> Result<Json<Consultation>, ConsultationError> {
    state.guard.authorize(&headers, &[])?;

    let consultation = state.service.get(consultation_id).await?;
    Ok(Json(consultation))
}

/// Query by appointment (one record) or patient (a list); exactly one
/// filter is required
async fn list_consultations_handler(
    State(state): State<Arc<ConsultationState>>,
    headers: HeaderMap,
    Query(query): Query<ListConsultationsQuery>,
) -> Result<Response, ConsultationError> {
    state.guard.authorize(&headers, &[])?;

    if let Some(appointment_id) = query.appointment_id {
        let consultation = state.service.get_by_appointment(appointment_id).await?;
        Ok(Json(consultation).into_response())
    } else if let Some(patient_id) = query.patient_id {
        let consultations = state.service.list_for_patient(patient_id).await?;
        Ok(Json(consultations).into_response())
    } else {
        Err(ConsultationError::MissingListFilter)
    }
}

async fn update_consultation_handler(
    State(state): State<Arc<ConsultationState>>,
    headers: HeaderMap,
    Path(consultation_id): Path<Uuid>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<Consultation>, ConsultationError> {
    state.guard.authorize(&headers, &[])?;

    let consultation = state.service.update(consultation_id, request).await?;
    Ok(Json(consultation))
}
