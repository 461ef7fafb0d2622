//! Hospital Config HTTP Routes
//!
//! Admin-only CRUD over hospital-wide configuration records.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::auth::{AccessGuard, Role};
use crate::directory::errors::DirectoryError;
use crate::directory::hospital_config::{
    CreateHospitalConfigRequest, HospitalConfig, HospitalConfigService,
    InMemoryHospitalConfigRepository, UpdateHospitalConfigRequest,
};

/// Shared hospital config state
pub struct HospitalConfigState {
    pub service: HospitalConfigService<InMemoryHospitalConfigRepository>,
    pub guard: AccessGuard,
}

/// Hospital config routes with shared state
pub fn hospital_config_routes(state: Arc<HospitalConfigState>) -> Router {
    Router::new()
        .route("/", get(list_configs_handler).post(create_config_handler))
        .route(
            "/:id",
            get(get_config_handler)
                .put(update_config_handler)
                .delete(delete_config_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn create_config_handler(
    State(state): State<Arc<HospitalConfigState>>,
    headers: HeaderMap,
    Json(request): Json<CreateHospitalConfigRequest>,
) -> Result<(StatusCode, Json<HospitalConfig>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let config = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

async fn get_config_handler(
    State(state): State<Arc<HospitalConfigState>>,
    headers: HeaderMap,
    Path(config_id): Path<Uuid>,
) -> Result<Json<HospitalConfig>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let config = state.service.get(config_id).await?;
    Ok(Json(config))
}

async fn list_configs_handler(
    State(state): State<Arc<HospitalConfigState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<HospitalConfig>>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let configs = state.service.list().await?;
    Ok(Json(configs))
}

async fn update_config_handler(
    State(state): State<Arc<HospitalConfigState>>,
    headers: HeaderMap,
    Path(config_id): Path<Uuid>,
    Json(request): Json<UpdateHospitalConfigRequest>,
) -> Result<Json<HospitalConfig>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let config = state.service.update(config_id, request).await?;
    Ok(Json(config))
}

async fn delete_config_handler(
    State(state): State<Arc<HospitalConfigState>>,
    headers: HeaderMap,
    Path(config_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    state.service.delete(config_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
