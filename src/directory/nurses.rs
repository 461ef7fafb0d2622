//! # Nurse Profiles
//!
//! Same shape as doctor profiles without the clinical fee or
//! availability details: a nurse profile ties a shift and license to
//! an existing NURSE account, one profile per user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{DirectoryError, DirectoryResult};
use crate::auth::{Role, UserRepository};
use crate::store::{bounded, StoreError, StoreResult};

/// Nurse profile model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseProfile {
    pub id: Uuid,

    /// Account this profile belongs to
    pub user_id: Uuid,

    pub license_number: String,

    pub department_id: Uuid,

    pub shift: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl NurseProfile {
    pub fn new(user_id: Uuid, license_number: String, department_id: Uuid, shift: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            license_number,
            department_id,
            shift,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Nurse profile creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNurseRequest {
    pub user_id: Uuid,
    pub license_number: String,
    pub department_id: Uuid,
    pub shift: String,
}

/// Nurse repository trait
#[async_trait]
pub trait NurseRepository: Send + Sync {
    /// Persist a new profile. Rejects a second profile for the same
    /// user with a duplicate error.
    async fn create(&self, nurse: NurseProfile) -> StoreResult<NurseProfile>;

    /// Find a profile by the owning user's ID
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<NurseProfile>>;
}

/// In-memory nurse repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryNurseRepository {
    nurses: std::sync::RwLock<Vec<NurseProfile>>,
}

impl InMemoryNurseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NurseRepository for InMemoryNurseRepository {
    async fn create(&self, nurse: NurseProfile) -> StoreResult<NurseProfile> {
        let mut nurses = self
            .nurses
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        // Checked under the write lock so a racing insert cannot slip a
        // second profile past the service's earlier existence check.
        if nurses.iter().any(|n| n.user_id == nurse.user_id) {
            return Err(StoreError::Duplicate("user_id"));
        }

        nurses.push(nurse.clone());
        Ok(nurse)
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<NurseProfile>> {
        let nurses = self
            .nurses
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(nurses.iter().find(|n| n.user_id == user_id).cloned())
    }
}

/// Nurse profile service
pub struct NurseService<N: NurseRepository, U: UserRepository> {
    nurses: Arc<N>,
    users: Arc<U>,
}

impl<N: NurseRepository, U: UserRepository> NurseService<N, U> {
    pub fn new(nurses: Arc<N>, users: Arc<U>) -> Self {
        Self { nurses, users }
    }

    /// Attach a nurse profile to an existing NURSE account
    pub async fn create(&self, request: CreateNurseRequest) -> DirectoryResult<NurseProfile> {
        let user = bounded(self.users.find_by_id(request.user_id))
            .await?
            .ok_or(DirectoryError::NotFound("user"))?;

        if user.role != Role::Nurse {
            return Err(DirectoryError::InvalidInput(
                "user is not a nurse".to_string(),
            ));
        }

        if bounded(self.nurses.find_by_user(user.id)).await?.is_some() {
            return Err(DirectoryError::AlreadyExists(
                "nurse already exists for this user".to_string(),
            ));
        }

        let nurse = NurseProfile::new(
            user.id,
            request.license_number.trim().to_string(),
            request.department_id,
            request.shift.trim().to_string(),
        );

        let nurse = bounded(self.nurses.create(nurse)).await.map_err(|e| {
            if matches!(e, StoreError::Duplicate(_)) {
                DirectoryError::AlreadyExists("nurse already exists for this user".to_string())
            } else {
                DirectoryError::Storage(e)
            }
        })?;

        tracing::info!(nurse_id = %nurse.id, user_id = %nurse.user_id, "nurse profile created");
        Ok(nurse)
    }
}
