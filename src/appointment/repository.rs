//! # Appointment Repository
//!
//! Storage operations for appointment records.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Appointment;
use crate::store::{StoreError, StoreResult};

/// Appointment repository trait
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Persist a new appointment
    async fn create(&self, appointment: Appointment) -> StoreResult<Appointment>;

    /// Find an appointment by its ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Appointment>>;

    /// All appointments for a patient, in booking order
    async fn list_by_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Appointment>>;

    /// All appointments for a doctor, in booking order
    async fn list_by_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<Appointment>>;

    /// Replace a stored appointment; false when the id is unknown
    async fn update(&self, appointment: Appointment) -> StoreResult<bool>;

    /// Remove an appointment; false when the id is unknown
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

/// In-memory appointment repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: std::sync::RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let mut appointments = self
            .appointments
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        let appointments = self
            .appointments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Appointment>> {
        let appointments = self
            .appointments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<Appointment>> {
        let appointments = self
            .appointments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn update(&self, appointment: Appointment) -> StoreResult<bool> {
        let mut appointments = self
            .appointments
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        if let Some(existing) = appointments.iter_mut().find(|a| a.id == appointment.id) {
            *existing = appointment;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut appointments = self
            .appointments
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        let len_before = appointments.len();
        appointments.retain(|a| a.id != id);
        Ok(appointments.len() != len_before)
    }
}
