//! # Doctor Profiles
//!
//! A doctor profile attaches clinical details to an existing user
//! account with the DOCTOR role. One profile per user; appointments
//! reference the profile id, not the account id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{DirectoryError, DirectoryResult};
use crate::auth::{Role, UserRepository};
use crate::store::{bounded, StoreError, StoreResult};

/// Doctor profile model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,

    /// Account this profile belongs to
    pub user_id: Uuid,

    pub specialization: String,

    pub license_number: String,

    pub department_id: Uuid,

    pub consultation_fee: f64,

    pub is_available: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl DoctorProfile {
    pub fn new(
        user_id: Uuid,
        specialization: String,
        license_number: String,
        department_id: Uuid,
        consultation_fee: f64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            specialization,
            license_number,
            department_id,
            consultation_fee,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Doctor profile creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub user_id: Uuid,
    pub specialization: String,
    pub license_number: String,
    pub department_id: Uuid,
    pub consultation_fee: f64,
}

/// Doctor repository trait
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Persist a new profile. Rejects a second profile for the same
    /// user with a duplicate error.
    async fn create(&self, doctor: DoctorProfile) -> StoreResult<DoctorProfile>;

    /// Find a profile by its own ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<DoctorProfile>>;

    /// Find a profile by the owning user's ID
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<DoctorProfile>>;
}

/// In-memory doctor repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryDoctorRepository {
    doctors: std::sync::RwLock<Vec<DoctorProfile>>,
}

impl InMemoryDoctorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn create(&self, doctor: DoctorProfile) -> StoreResult<DoctorProfile> {
        let mut doctors = self
            .doctors
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        // Checked under the write lock so a racing insert cannot slip a
        // second profile past the service's earlier existence check.
        if doctors.iter().any(|d| d.user_id == doctor.user_id) {
            return Err(StoreError::Duplicate("user_id"));
        }

        doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<DoctorProfile>> {
        let doctors = self
            .doctors
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<DoctorProfile>> {
        let doctors = self
            .doctors
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(doctors.iter().find(|d| d.user_id == user_id).cloned())
    }
}

/// Doctor profile service
pub struct DoctorService<D: DoctorRepository, U: UserRepository> {
    doctors: Arc<D>,
    users: Arc<U>,
}

impl<D: DoctorRepository, U: UserRepository> DoctorService<D, U> {
    pub fn new(doctors: Arc<D>, users: Arc<U>) -> Self {
        Self { doctors, users }
    }

    /// Attach a doctor profile to an existing DOCTOR account
    pub async fn create(&self, request: CreateDoctorRequest) -> DirectoryResult<DoctorProfile> {
        let user = bounded(self.users.find_by_id(request.user_id))
            .await?
            .ok_or(DirectoryError::NotFound("user"))?;

        if user.role != Role::Doctor {
            return Err(DirectoryError::InvalidInput(
                "user is not a doctor".to_string(),
            ));
        }

        if bounded(self.doctors.find_by_user(user.id)).await?.is_some() {
            return Err(DirectoryError::AlreadyExists(
                "doctor already exists for this user".to_string(),
            ));
        }

        let doctor = DoctorProfile::new(
            user.id,
            request.specialization.trim().to_string(),
            request.license_number.trim().to_string(),
            request.department_id,
            request.consultation_fee,
        );

        let doctor = bounded(self.doctors.create(doctor)).await.map_err(|e| {
            // A racing create for the same user lands here instead of
            // at the lookup above.
            if matches!(e, StoreError::Duplicate(_)) {
                DirectoryError::AlreadyExists("doctor already exists for this user".to_string())
            } else {
                DirectoryError::Storage(e)
            }
        })?;

        tracing::info!(doctor_id = %doctor.id, user_id = %doctor.user_id, "doctor profile created");
        Ok(doctor)
    }

    /// Get a doctor profile by its ID
    pub async fn get(&self, doctor_id: Uuid) -> DirectoryResult<DoctorProfile> {
        bounded(self.doctors.find_by_id(doctor_id))
            .await?
            .ok_or(DirectoryError::NotFound("doctor"))
    }
}
