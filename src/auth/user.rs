//! # User Accounts
//!
//! User model, request DTOs and the account repository.
//! Every staff member and patient in the system is backed by one user
//! record; profile records in the directory reference it by id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::verify_password;
use super::errors::AuthResult;
use super::role::Role;
use crate::store::{StoreError, StoreResult};

/// User account model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Login handle (unique)
    pub username: String,

    /// Email address (unique)
    pub email: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Role the account holds across the whole system
    pub role: Role,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a new active account with server-assigned id and timestamps.
    ///
    /// Callers are expected to have validated the fields and hashed the
    /// password already.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: Option<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verify a password against this account's stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }
}

/// Patient self-registration request
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Staff account creation request (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
}

/// One page of the account listing
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// User repository trait
///
/// Abstracts storage operations for accounts. Uniqueness of email and
/// username is the repository's responsibility: `create` must reject a
/// duplicate with [`StoreError::Duplicate`] even under concurrent inserts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account
    async fn create(&self, user: User) -> StoreResult<User>;

    /// Find an account by its ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Find an account by its email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Check whether a username is already taken
    async fn username_exists(&self, username: &str) -> StoreResult<bool>;

    /// List accounts in insertion order, windowed by offset/limit
    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<User>>;

    /// Total number of accounts
    async fn count(&self) -> StoreResult<usize>;
}

/// In-memory user repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> StoreResult<User> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        // Checked under the write lock so a racing insert cannot slip
        // a duplicate past the service's earlier existence check.
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> StoreResult<usize> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(users.len())
    }
}
