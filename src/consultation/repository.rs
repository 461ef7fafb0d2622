//! # Consultation Repository
//!
//! Storage operations for consultation records. The one-consultation-
//! per-appointment rule lives here, enforced under the write lock.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Consultation;
use crate::store::{StoreError, StoreResult};

/// Consultation repository trait
#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    /// Persist a new consultation. Rejects a second record for the same
    /// appointment with [`StoreError::Duplicate`].
    async fn create(&self, consultation: Consultation) -> StoreResult<Consultation>;

    /// Find a consultation by its ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Consultation>>;

    /// Find the consultation for an appointment, if any
    async fn find_by_appointment(&self, appointment_id: Uuid) -> StoreResult<Option<Consultation>>;

    /// All consultations for a patient
    async fn list_by_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Consultation>>;

    /// Replace a stored consultation; false when the id is unknown
    async fn update(&self, consultation: Consultation) -> StoreResult<bool>;
}

/// In-memory consultation repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryConsultationRepository {
    consultations: std::sync::RwLock<Vec<Consultation>>,
}

impl InMemoryConsultationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsultationRepository for InMemoryConsultationRepository {
    async fn create(&self, consultation: Consultation) -> StoreResult<Consultation> {
        let mut consultations = self
            .consultations
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        if consultations
            .iter()
            .any(|c| c.appointment_id == consultation.appointment_id)
        {
            return Err(StoreError::Duplicate("appointment_id"));
        }

        consultations.push(consultation.clone());
        Ok(consultation)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Consultation>> {
        let consultations = self
            .consultations
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(consultations.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_appointment(&self, appointment_id: Uuid) -> StoreResult<Option<Consultation>> {
        let consultations = self
            .consultations
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(consultations
            .iter()
            .find(|c| c.appointment_id == appointment_id)
            .cloned())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Consultation>> {
        let consultations = self
            .consultations
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(consultations
            .iter()
            .filter(|c| c.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn update(&self, consultation: Consultation) -> StoreResult<bool> {
        let mut consultations = self
            .consultations
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        if let Some(existing) = consultations.iter_mut().find(|c| c.id == consultation.id) {
            *existing = consultation;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
