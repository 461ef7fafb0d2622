//! # Appointment Service
//!
//! The appointment state machine. Booking resolves both parties and
//! always starts PENDING; updates enforce the terminal states
//! (COMPLETED locks the status, CANCELLED locks the record); deletion
//! refuses COMPLETED appointments.
//!
//! Stored availability slots are never consulted here. Double-booking
//! a doctor is allowed.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::errors::{AppointmentError, AppointmentResult};
use super::model::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use super::repository::AppointmentRepository;
use crate::directory::doctors::DoctorRepository;
use crate::directory::patients::PatientRepository;
use crate::store::bounded;

/// Appointment service
pub struct AppointmentService<A, P, D>
where
    A: AppointmentRepository,
    P: PatientRepository,
    D: DoctorRepository,
{
    appointments: Arc<A>,
    patients: Arc<P>,
    doctors: Arc<D>,
}

impl<A, P, D> AppointmentService<A, P, D>
where
    A: AppointmentRepository,
    P: PatientRepository,
    D: DoctorRepository,
{
    pub fn new(appointments: Arc<A>, patients: Arc<P>, doctors: Arc<D>) -> Self {
        Self {
            appointments,
            patients,
            doctors,
        }
    }

    /// Book a new appointment.
    ///
    /// Both parties must resolve, the schedule must be strictly in the
    /// future and the duration at least one minute. The stored record
    /// always starts PENDING.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> AppointmentResult<Appointment> {
        if bounded(self.patients.find_by_id(request.patient_id))
            .await?
            .is_none()
        {
            return Err(AppointmentError::PatientNotFound);
        }

        if bounded(self.doctors.find_by_id(request.doctor_id))
            .await?
            .is_none()
        {
            return Err(AppointmentError::DoctorNotFound);
        }

        if request.scheduled_at <= Utc::now() {
            return Err(AppointmentError::ScheduleInPast);
        }

        if request.duration_minutes < 1 {
            return Err(AppointmentError::InvalidDuration);
        }

        let appointment = Appointment::new(
            request.patient_id,
            request.doctor_id,
            request.scheduled_at,
            request.duration_minutes,
            request.notes,
        );

        let appointment = bounded(self.appointments.create(appointment)).await?;
        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            doctor_id = %appointment.doctor_id,
            "appointment booked"
        );

        Ok(appointment)
    }

    /// Get an appointment by ID
    pub async fn get(&self, appointment_id: Uuid) -> AppointmentResult<Appointment> {
        bounded(self.appointments.find_by_id(appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// All appointments for a patient. An unknown patient simply has none.
    pub async fn list_for_patient(&self, patient_id: Uuid) -> AppointmentResult<Vec<Appointment>> {
        Ok(bounded(self.appointments.list_by_patient(patient_id)).await?)
    }

    /// All appointments for a doctor
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> AppointmentResult<Vec<Appointment>> {
        Ok(bounded(self.appointments.list_by_doctor(doctor_id)).await?)
    }

    /// Update an appointment's schedule, duration, status and notes.
    ///
    /// A COMPLETED appointment keeps its status forever but its other
    /// fields may still change, so an update that leaves the status at
    /// COMPLETED is accepted. A CANCELLED appointment rejects every
    /// update. The schedule is not re-checked against the clock here;
    /// only booking enforces the future rule.
    pub async fn update(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> AppointmentResult<Appointment> {
        let existing = bounded(self.appointments.find_by_id(appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if existing.status == AppointmentStatus::Completed
            && request.status != AppointmentStatus::Completed
        {
            tracing::warn!(appointment_id = %appointment_id, "status change on completed appointment rejected");
            return Err(AppointmentError::CompletedStatusImmutable);
        }

        if existing.status == AppointmentStatus::Cancelled {
            tracing::warn!(appointment_id = %appointment_id, "update of cancelled appointment rejected");
            return Err(AppointmentError::CancelledImmutable);
        }

        if request.duration_minutes < 1 {
            return Err(AppointmentError::InvalidDuration);
        }

        let mut updated = existing;
        updated.scheduled_at = request.scheduled_at;
        updated.duration_minutes = request.duration_minutes;
        updated.status = request.status;
        updated.notes = request.notes;
        updated.updated_at = Utc::now();

        // A concurrent delete between the read and this write surfaces
        // as an unknown id.
        if !bounded(self.appointments.update(updated.clone())).await? {
            return Err(AppointmentError::NotFound);
        }

        tracing::info!(
            appointment_id = %updated.id,
            status = %updated.status,
            "appointment updated"
        );

        Ok(updated)
    }

    /// Delete an appointment. COMPLETED appointments stay on record.
    pub async fn delete(&self, appointment_id: Uuid) -> AppointmentResult<()> {
        let existing = bounded(self.appointments.find_by_id(appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if existing.status == AppointmentStatus::Completed {
            tracing::warn!(appointment_id = %appointment_id, "delete of completed appointment rejected");
            return Err(AppointmentError::CompletedUndeletable);
        }

        if !bounded(self.appointments.delete(appointment_id)).await? {
            return Err(AppointmentError::NotFound);
        }

        tracing::info!(appointment_id = %appointment_id, "appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::repository::InMemoryAppointmentRepository;
    use crate::directory::doctors::{DoctorProfile, InMemoryDoctorRepository};
    use crate::directory::patients::{InMemoryPatientRepository, PatientProfile};
    use crate::store::{StoreError, StoreResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, NaiveDate};

    type TestService = AppointmentService<
        InMemoryAppointmentRepository,
        InMemoryPatientRepository,
        InMemoryDoctorRepository,
    >;

    async fn seeded_service() -> (TestService, Uuid, Uuid) {
        let patients = Arc::new(InMemoryPatientRepository::new());
        let doctors = Arc::new(InMemoryDoctorRepository::new());

        let patient = PatientProfile::new(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(1990, 3, 12).unwrap(),
            "female".to_string(),
            "O+".to_string(),
            "Sam Doe".to_string(),
            "+15550001".to_string(),
            String::new(),
        );
        let doctor = DoctorProfile::new(
            Uuid::new_v4(),
            "cardiology".to_string(),
            "LIC-100".to_string(),
            Uuid::new_v4(),
            150.0,
        );
        let patient_id = patient.id;
        let doctor_id = doctor.id;
        patients.create(patient).await.unwrap();
        doctors.create(doctor).await.unwrap();

        let service = AppointmentService::new(
            Arc::new(InMemoryAppointmentRepository::new()),
            patients,
            doctors,
        );
        (service, patient_id, doctor_id)
    }

    fn booking(patient_id: Uuid, doctor_id: Uuid, offset: Duration) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            patient_id,
            doctor_id,
            scheduled_at: Utc::now() + offset,
            duration_minutes: 30,
            notes: "checkup".to_string(),
        }
    }

    fn update_to(status: AppointmentStatus, scheduled_at: DateTime<Utc>) -> UpdateAppointmentRequest {
        UpdateAppointmentRequest {
            scheduled_at,
            duration_minutes: 30,
            status,
            notes: "updated".to_string(),
        }
    }

    #[tokio::test]
    async fn test_booking_starts_pending() {
        let (service, patient_id, doctor_id) = seeded_service().await;

        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.patient_id, patient_id);
        assert_eq!(appointment.doctor_id, doctor_id);

        let fetched = service.get(appointment.id).await.unwrap();
        assert_eq!(fetched.id, appointment.id);
        assert_eq!(fetched.scheduled_at, appointment.scheduled_at);
    }

    #[tokio::test]
    async fn test_booking_unknown_patient() {
        let (service, _, doctor_id) = seeded_service().await;

        let result = service
            .create(booking(Uuid::new_v4(), doctor_id, Duration::days(1)))
            .await;
        assert!(matches!(result, Err(AppointmentError::PatientNotFound)));
    }

    #[tokio::test]
    async fn test_booking_unknown_doctor() {
        let (service, patient_id, _) = seeded_service().await;

        let result = service
            .create(booking(patient_id, Uuid::new_v4(), Duration::days(1)))
            .await;
        assert!(matches!(result, Err(AppointmentError::DoctorNotFound)));
    }

    #[tokio::test]
    async fn test_booking_in_the_past_rejected() {
        let (service, patient_id, doctor_id) = seeded_service().await;

        let result = service
            .create(booking(patient_id, doctor_id, Duration::hours(-1)))
            .await;
        assert!(matches!(result, Err(AppointmentError::ScheduleInPast)));

        // Nothing was stored
        assert!(service
            .list_for_patient(patient_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_booking_zero_duration_rejected() {
        let (service, patient_id, doctor_id) = seeded_service().await;

        let mut request = booking(patient_id, doctor_id, Duration::days(1));
        request.duration_minutes = 0;

        let result = service.create(request).await;
        assert!(matches!(result, Err(AppointmentError::InvalidDuration)));
    }

    #[tokio::test]
    async fn test_update_refreshes_fields_and_timestamp() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        let new_time = Utc::now() + Duration::days(2);
        let updated = service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Confirmed, new_time),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Confirmed);
        assert_eq!(updated.scheduled_at, new_time);
        assert_eq!(updated.notes, "updated");
        assert_eq!(updated.patient_id, patient_id);
        assert_eq!(updated.created_at, appointment.created_at);
        assert!(updated.updated_at > appointment.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_appointment() {
        let (service, _, _) = seeded_service().await;

        let result = service
            .update(
                Uuid::new_v4(),
                update_to(AppointmentStatus::Confirmed, Utc::now() + Duration::days(1)),
            )
            .await;
        assert!(matches!(result, Err(AppointmentError::NotFound)));
    }

    #[tokio::test]
    async fn test_completed_status_is_locked() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Completed, appointment.scheduled_at),
            )
            .await
            .unwrap();

        // Moving away from COMPLETED fails
        let result = service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Pending, appointment.scheduled_at),
            )
            .await;
        assert!(matches!(
            result,
            Err(AppointmentError::CompletedStatusImmutable)
        ));

        // Keeping COMPLETED while changing other fields succeeds
        let moved = Utc::now() + Duration::days(3);
        let updated = service
            .update(appointment.id, update_to(AppointmentStatus::Completed, moved))
            .await
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert_eq!(updated.scheduled_at, moved);
    }

    #[tokio::test]
    async fn test_cancelled_is_fully_terminal() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Cancelled, appointment.scheduled_at),
            )
            .await
            .unwrap();

        let result = service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Cancelled, appointment.scheduled_at),
            )
            .await;
        assert!(matches!(result, Err(AppointmentError::CancelledImmutable)));
    }

    #[tokio::test]
    async fn test_cancelled_can_still_be_deleted() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Cancelled, appointment.scheduled_at),
            )
            .await
            .unwrap();

        service.delete(appointment.id).await.unwrap();
        assert!(matches!(
            service.get(appointment.id).await,
            Err(AppointmentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_completed_cannot_be_deleted() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        service
            .update(
                appointment.id,
                update_to(AppointmentStatus::Completed, appointment.scheduled_at),
            )
            .await
            .unwrap();

        let result = service.delete(appointment.id).await;
        assert!(matches!(
            result,
            Err(AppointmentError::CompletedUndeletable)
        ));

        // Still on record
        assert!(service.get(appointment.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_idempotent_reads() {
        let (service, patient_id, doctor_id) = seeded_service().await;
        let appointment = service
            .create(booking(patient_id, doctor_id, Duration::days(1)))
            .await
            .unwrap();

        let first = service.get(appointment.id).await.unwrap();
        let second = service.get(appointment.id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.scheduled_at, second.scheduled_at);
        assert_eq!(first.updated_at, second.updated_at);
    }

    // A repository that never answers, for exercising the storage bound.
    struct StalledRepository;

    #[async_trait]
    impl AppointmentRepository for StalledRepository {
        async fn create(&self, appointment: Appointment) -> StoreResult<Appointment> {
            Ok(appointment)
        }

        async fn find_by_id(&self, _id: Uuid) -> StoreResult<Option<Appointment>> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn list_by_patient(&self, _patient_id: Uuid) -> StoreResult<Vec<Appointment>> {
            Ok(Vec::new())
        }

        async fn list_by_doctor(&self, _doctor_id: Uuid) -> StoreResult<Vec<Appointment>> {
            Ok(Vec::new())
        }

        async fn update(&self, _appointment: Appointment) -> StoreResult<bool> {
            Ok(false)
        }

        async fn delete(&self, _id: Uuid) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_storage_surfaces_timeout() {
        let service = AppointmentService::new(
            Arc::new(StalledRepository),
            Arc::new(InMemoryPatientRepository::new()),
            Arc::new(InMemoryDoctorRepository::new()),
        );

        let result = service.get(Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(AppointmentError::Storage(StoreError::Timeout))
        ));
    }
}
