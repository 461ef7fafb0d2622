//! # Access Guard
//!
//! Request-level authentication and role checks.
//!
//! Every protected handler runs the same two-step sequence: prove who
//! the caller is, then check the role. Authentication always happens
//! first, so a request with a missing or bad token gets 401 even when
//! its role would also have been insufficient.

use axum::http::HeaderMap;
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};
use super::jwt::JwtManager;
use super::role::Role;

/// The authenticated caller of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Validates bearer tokens and enforces role requirements
#[derive(Clone)]
pub struct AccessGuard {
    tokens: JwtManager,
}

impl AccessGuard {
    pub fn new(tokens: JwtManager) -> Self {
        Self { tokens }
    }

    /// Authenticate a request from its headers.
    ///
    /// Requires an `Authorization: Bearer <token>` header carrying a
    /// valid, unexpired token.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<Identity> {
        let header = headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedAuthHeader)?;

        let claims = self.tokens.validate(token)?;
        let user_id = JwtManager::subject(&claims)?;

        Ok(Identity {
            user_id,
            role: claims.role,
        })
    }

    /// Authenticate, then require one of the allowed roles.
    ///
    /// An empty `allowed` slice admits any authenticated caller.
    pub fn authorize(&self, headers: &HeaderMap, allowed: &[Role]) -> AuthResult<Identity> {
        let identity = self.authenticate(headers)?;

        if !allowed.is_empty() && !allowed.contains(&identity.role) {
            return Err(AuthError::Forbidden);
        }

        Ok(identity)
    }
}
