//! User Management HTTP Routes
//!
//! Admin-only account management: create staff/admin accounts, fetch
//! one account, list accounts page by page.

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::user::{CreateUserRequest, InMemoryUserRepository, User, UserPage};
use crate::auth::{AccessGuard, AuthError, AuthService, Role};

/// Shared user management state
pub struct UserAdminState {
    pub service: AuthService<InMemoryUserRepository>,
    pub guard: AccessGuard,
}

/// User management routes with shared state
pub fn user_routes(state: Arc<UserAdminState>) -> Router {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route("/:id", get(get_user_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

// ==================
// Handlers
// ==================

/// Create a doctor, nurse or admin account
async fn create_user_handler(
    State(state): State<Arc<UserAdminState>>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AuthError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let user = state.service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Fetch one account by id
async fn get_user_handler(
    State(state): State<Arc<UserAdminState>>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AuthError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let user = state.service.get_user(user_id).await?;
    Ok(Json(user))
}

/// Paginated account listing
async fn list_users_handler(
    State(state): State<Arc<UserAdminState>>,
    headers: HeaderMap,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserPage>, AuthError> {
    state.guard.authorize(&headers, &[Role::Admin])?;

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    let users = state.service.list_users(page, page_size).await?;
    Ok(Json(users))
}
