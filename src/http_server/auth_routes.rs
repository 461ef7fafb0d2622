//! Auth HTTP Routes
//!
//! Public endpoints: patient self-signup and login. Neither requires a
//! token; everything else in the API does.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Serialize;

use crate::auth::user::{InMemoryUserRepository, LoginRequest, SignupRequest, User};
use crate::auth::{AuthError, AuthService};

/// Shared auth state
pub struct AuthState {
    pub service: AuthService<InMemoryUserRepository>,
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .with_state(state)
}

/// Login response carrying the session token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ==================
// Handlers
// ==================

/// Patient self-signup
async fn signup_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), AuthError> {
    let user = state.service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password
async fn login_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let token = state.service.login(request).await?;
    Ok(Json(LoginResponse { token }))
}
