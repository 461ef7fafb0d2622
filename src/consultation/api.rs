//! # Consultation Service
//!
//! Consultation creation and the edit lock. A consultation can only be
//! written against a COMPLETED appointment, by the appointment's own
//! patient and doctor, and each appointment gets at most one.

use std::sync::Arc;

use uuid::Uuid;

use super::errors::{ConsultationError, ConsultationResult};
use super::model::{Consultation, CreateConsultationRequest, UpdateConsultationRequest};
use super::repository::ConsultationRepository;
use crate::appointment::model::AppointmentStatus;
use crate::appointment::repository::AppointmentRepository;
use crate::store::bounded;

/// Consultation service
pub struct ConsultationService<C, A>
where
    C: ConsultationRepository,
    A: AppointmentRepository,
{
    consultations: Arc<C>,
    appointments: Arc<A>,
}

impl<C, A> ConsultationService<C, A>
where
    C: ConsultationRepository,
    A: AppointmentRepository,
{
    pub fn new(consultations: Arc<C>, appointments: Arc<A>) -> Self {
        Self {
            consultations,
            appointments,
        }
    }

    /// Create a consultation for a completed appointment.
    ///
    /// The lookup-before-insert here is advisory; the repository
    /// re-checks the one-per-appointment rule under its write lock, and
    /// a racing duplicate insert maps to the same conflict.
    pub async fn create(
        &self,
        request: CreateConsultationRequest,
    ) -> ConsultationResult<Consultation> {
        let appointment = bounded(self.appointments.find_by_id(request.appointment_id))
            .await?
            .ok_or(ConsultationError::AppointmentNotFound)?;

        if appointment.status != AppointmentStatus::Completed {
            tracing::warn!(
                appointment_id = %request.appointment_id,
                status = %appointment.status,
                "consultation rejected before completion"
            );
            return Err(ConsultationError::AppointmentNotCompleted);
        }

        if bounded(self.consultations.find_by_appointment(request.appointment_id))
            .await?
            .is_some()
        {
            return Err(ConsultationError::AlreadyExists);
        }

        if request.patient_id != appointment.patient_id
            || request.doctor_id != appointment.doctor_id
        {
            return Err(ConsultationError::PartyMismatch);
        }

        if request.diagnosis.trim().is_empty() {
            return Err(ConsultationError::MissingDiagnosis);
        }

        let consultation = Consultation::new(
            request.appointment_id,
            request.patient_id,
            request.doctor_id,
            request.diagnosis,
            request.notes,
        );

        let consultation = bounded(self.consultations.create(consultation)).await?;
        tracing::info!(
            consultation_id = %consultation.id,
            appointment_id = %consultation.appointment_id,
            "consultation recorded"
        );

        Ok(consultation)
    }

    /// Get a consultation by ID
    pub async fn get(&self, consultation_id: Uuid) -> ConsultationResult<Consultation> {
        bounded(self.consultations.find_by_id(consultation_id))
            .await?
            .ok_or(ConsultationError::NotFound)
    }

    /// Get the consultation written for an appointment
    pub async fn get_by_appointment(
        &self,
        appointment_id: Uuid,
    ) -> ConsultationResult<Consultation> {
        bounded(self.consultations.find_by_appointment(appointment_id))
            .await?
            .ok_or(ConsultationError::NotFound)
    }

    /// All consultations for a patient
    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> ConsultationResult<Vec<Consultation>> {
        Ok(bounded(self.consultations.list_by_patient(patient_id)).await?)
    }

    /// Update the clinical fields of an editable consultation
    pub async fn update(
        &self,
        consultation_id: Uuid,
        request: UpdateConsultationRequest,
    ) -> ConsultationResult<Consultation> {
        let existing = bounded(self.consultations.find_by_id(consultation_id))
            .await?
            .ok_or(ConsultationError::NotFound)?;

        if !existing.is_editable {
            tracing::warn!(consultation_id = %consultation_id, "update of locked consultation rejected");
            return Err(ConsultationError::NotEditable);
        }

        if request.diagnosis.trim().is_empty() {
            return Err(ConsultationError::MissingDiagnosis);
        }

        let mut updated = existing;
        updated.diagnosis = request.diagnosis;
        updated.notes = request.notes;

        if !bounded(self.consultations.update(updated.clone())).await? {
            return Err(ConsultationError::NotFound);
        }

        tracing::info!(consultation_id = %updated.id, "consultation updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::model::Appointment;
    use crate::appointment::repository::InMemoryAppointmentRepository;
    use crate::consultation::repository::InMemoryConsultationRepository;
    use chrono::{Duration, Utc};

    type TestService =
        ConsultationService<InMemoryConsultationRepository, InMemoryAppointmentRepository>;

    struct Fixture {
        service: TestService,
        consultations: Arc<InMemoryConsultationRepository>,
        appointments: Arc<InMemoryAppointmentRepository>,
    }

    fn fixture() -> Fixture {
        let consultations = Arc::new(InMemoryConsultationRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        Fixture {
            service: ConsultationService::new(consultations.clone(), appointments.clone()),
            consultations,
            appointments,
        }
    }

    async fn seed_appointment(
        appointments: &InMemoryAppointmentRepository,
        status: AppointmentStatus,
    ) -> Appointment {
        let mut appointment = Appointment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() + Duration::days(1),
            30,
            String::new(),
        );
        appointment.status = status;
        appointments.create(appointment.clone()).await.unwrap();
        appointment
    }

    fn request_for(appointment: &Appointment, diagnosis: &str) -> CreateConsultationRequest {
        CreateConsultationRequest {
            appointment_id: appointment.id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            diagnosis: diagnosis.to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_consultation_follows_completed_appointment() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;

        let consultation = f
            .service
            .create(request_for(&appointment, "flu"))
            .await
            .unwrap();

        assert!(consultation.is_editable);
        assert_eq!(consultation.appointment_id, appointment.id);
        assert_eq!(consultation.diagnosis, "flu");
    }

    #[tokio::test]
    async fn test_unknown_appointment() {
        let f = fixture();

        let result = f
            .service
            .create(CreateConsultationRequest {
                appointment_id: Uuid::new_v4(),
                patient_id: Uuid::new_v4(),
                doctor_id: Uuid::new_v4(),
                diagnosis: "flu".to_string(),
                notes: String::new(),
            })
            .await;
        assert!(matches!(result, Err(ConsultationError::AppointmentNotFound)));
    }

    #[tokio::test]
    async fn test_pending_appointment_rejected() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Pending).await;

        let result = f.service.create(request_for(&appointment, "flu")).await;
        assert!(matches!(
            result,
            Err(ConsultationError::AppointmentNotCompleted)
        ));
    }

    #[tokio::test]
    async fn test_second_consultation_conflicts() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;

        f.service
            .create(request_for(&appointment, "flu"))
            .await
            .unwrap();

        let result = f.service.create(request_for(&appointment, "cold")).await;
        assert!(matches!(result, Err(ConsultationError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_party_mismatch_rejected() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;

        let mut request = request_for(&appointment, "flu");
        request.patient_id = Uuid::new_v4();

        let result = f.service.create(request).await;
        assert!(matches!(result, Err(ConsultationError::PartyMismatch)));
    }

    #[tokio::test]
    async fn test_blank_diagnosis_rejected() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;

        let result = f.service.create(request_for(&appointment, "   ")).await;
        assert!(matches!(result, Err(ConsultationError::MissingDiagnosis)));
    }

    #[tokio::test]
    async fn test_lookup_by_appointment() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;
        let created = f
            .service
            .create(request_for(&appointment, "flu"))
            .await
            .unwrap();

        let found = f.service.get_by_appointment(appointment.id).await.unwrap();
        assert_eq!(found.id, created.id);

        let missing = f.service.get_by_appointment(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ConsultationError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_clinical_fields() {
        let f = fixture();
        let appointment = seed_appointment(&f.appointments, AppointmentStatus::Completed).await;
        let consultation = f
            .service
            .create(request_for(&appointment, "flu"))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                consultation.id,
                UpdateConsultationRequest {
                    diagnosis: "influenza A".to_string(),
                    notes: "prescribed oseltamivir".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.diagnosis, "influenza A");
        assert_eq!(updated.appointment_id, appointment.id);
        assert!(updated.is_editable);
    }

    #[tokio::test]
    async fn test_locked_consultation_rejects_update() {
        let f = fixture();

        // No operation clears the flag, so seed the store directly.
        let mut consultation = Consultation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "flu".to_string(),
            String::new(),
        );
        consultation.is_editable = false;
        f.consultations.create(consultation.clone()).await.unwrap();

        let result = f
            .service
            .update(
                consultation.id,
                UpdateConsultationRequest {
                    diagnosis: "revised".to_string(),
                    notes: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(ConsultationError::NotEditable)));
    }

    #[tokio::test]
    async fn test_update_unknown_consultation() {
        let f = fixture();

        let result = f
            .service
            .update(
                Uuid::new_v4(),
                UpdateConsultationRequest {
                    diagnosis: "flu".to_string(),
                    notes: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(ConsultationError::NotFound)));
    }
}
