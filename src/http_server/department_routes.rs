//! Department HTTP Routes
//!
//! Admin-only department CRUD with soft delete and pagination.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AccessGuard, Role};
use crate::directory::departments::{
    CreateDepartmentRequest, Department, DepartmentPage, DepartmentService,
    InMemoryDepartmentRepository, UpdateDepartmentRequest,
};
use crate::directory::errors::DirectoryError;

/// Shared department state
pub struct DepartmentState {
    pub service: DepartmentService<InMemoryDepartmentRepository>,
    pub guard: AccessGuard,
}

/// Department routes with shared state
pub fn department_routes(state: Arc<DepartmentState>) -> Router {
    Router::new()
        .route("/", get(list_departments_handler).post(create_department_handler))
        .route(
            "/:id",
            get(get_department_handler)
                .put(update_department_handler)
                .delete(delete_department_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListDepartmentsQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

// ==================
// Handlers
// ==================

async fn create_department_handler(
    State(state): State<Arc<DepartmentState>>,
    headers: HeaderMap,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let department = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn get_department_handler(
    State(state): State<Arc<DepartmentState>>,
    headers: HeaderMap,
    Path(department_id): Path<Uuid>,
) -> Result<Json<Department>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let department = state.service.get(department_id).await?;
    Ok(Json(department))
}

async fn list_departments_handler(
    State(state): State<Arc<DepartmentState>>,
    headers: HeaderMap,
    Query(query): Query<ListDepartmentsQuery>,
) -> Result<Json<DepartmentPage>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let page = query.page.unwrap_or(1);
    // Cap rather than reject an oversized page_size
    let page_size = query.page_size.unwrap_or(10).min(100);

    let departments = state.service.list(page, page_size).await?;
    Ok(Json(departments))
}

async fn update_department_handler(
    State(state): State<Arc<DepartmentState>>,
    headers: HeaderMap,
    Path(department_id): Path<Uuid>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> Result<Json<Department>, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let department = state.service.update(department_id, request).await?;
    Ok(Json(department))
}

async fn delete_department_handler(
    State(state): State<Arc<DepartmentState>>,
    headers: HeaderMap,
    Path(department_id): Path<Uuid>,
) -> Result<StatusCode, DirectoryError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    state.service.delete(department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
