//! # Patient Profiles
//!
//! A patient profile carries the medical-intake details for an
//! existing PATIENT account. Patients create their own profile after
//! signup; appointments reference the profile id.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{DirectoryError, DirectoryResult};
use crate::auth::{Role, UserRepository};
use crate::store::{bounded, StoreError, StoreResult};

/// Patient profile model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,

    /// Account this profile belongs to
    pub user_id: Uuid,

    /// ISO 8601 calendar date
    pub date_of_birth: NaiveDate,

    pub gender: String,

    pub blood_group: String,

    pub emergency_contact_name: String,

    pub emergency_contact_phone: String,

    #[serde(default)]
    pub medical_history: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PatientProfile {
    pub fn new(
        user_id: Uuid,
        date_of_birth: NaiveDate,
        gender: String,
        blood_group: String,
        emergency_contact_name: String,
        emergency_contact_phone: String,
        medical_history: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            date_of_birth,
            gender,
            blood_group,
            emergency_contact_name,
            emergency_contact_phone,
            medical_history,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patient profile creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub user_id: Uuid,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub medical_history: String,
}

/// Patient repository trait
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Persist a new profile. Rejects a second profile for the same
    /// user with a duplicate error.
    async fn create(&self, patient: PatientProfile) -> StoreResult<PatientProfile>;

    /// Find a profile by its own ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PatientProfile>>;

    /// Find a profile by the owning user's ID
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<PatientProfile>>;
}

/// In-memory patient repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryPatientRepository {
    patients: std::sync::RwLock<Vec<PatientProfile>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, patient: PatientProfile) -> StoreResult<PatientProfile> {
        let mut patients = self
            .patients
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        // Checked under the write lock so a racing insert cannot slip a
        // second profile past the service's earlier existence check.
        if patients.iter().any(|p| p.user_id == patient.user_id) {
            return Err(StoreError::Duplicate("user_id"));
        }

        patients.push(patient.clone());
        Ok(patient)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PatientProfile>> {
        let patients = self
            .patients
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<PatientProfile>> {
        let patients = self
            .patients
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(patients.iter().find(|p| p.user_id == user_id).cloned())
    }
}

/// Patient profile service
pub struct PatientService<P: PatientRepository, U: UserRepository> {
    patients: Arc<P>,
    users: Arc<U>,
}

impl<P: PatientRepository, U: UserRepository> PatientService<P, U> {
    pub fn new(patients: Arc<P>, users: Arc<U>) -> Self {
        Self { patients, users }
    }

    /// Attach a patient profile to an existing PATIENT account
    pub async fn create(&self, request: CreatePatientRequest) -> DirectoryResult<PatientProfile> {
        let user = bounded(self.users.find_by_id(request.user_id))
            .await?
            .ok_or(DirectoryError::NotFound("user"))?;

        if user.role != Role::Patient {
            return Err(DirectoryError::InvalidInput(
                "user is not a patient".to_string(),
            ));
        }

        if bounded(self.patients.find_by_user(user.id)).await?.is_some() {
            return Err(DirectoryError::AlreadyExists(
                "patient already exists for this user".to_string(),
            ));
        }

        let patient = PatientProfile::new(
            user.id,
            request.date_of_birth,
            request.gender.trim().to_string(),
            request.blood_group.trim().to_string(),
            request.emergency_contact_name.trim().to_string(),
            request.emergency_contact_phone.trim().to_string(),
            request.medical_history.trim().to_string(),
        );

        let patient = bounded(self.patients.create(patient)).await.map_err(|e| {
            if matches!(e, StoreError::Duplicate(_)) {
                DirectoryError::AlreadyExists("patient already exists for this user".to_string())
            } else {
                DirectoryError::Storage(e)
            }
        })?;

        tracing::info!(patient_id = %patient.id, user_id = %patient.user_id, "patient profile created");
        Ok(patient)
    }
}
