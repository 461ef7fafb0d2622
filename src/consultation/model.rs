//! # Consultation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinical record written after a completed appointment.
///
/// At most one consultation exists per appointment. The `is_editable`
/// flag starts true and nothing in the system ever clears it; a record
/// seeded with the flag off rejects every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    /// Unique consultation identifier
    pub id: Uuid,

    /// The completed appointment this consultation documents (1:1)
    pub appointment_id: Uuid,

    pub patient_id: Uuid,

    pub doctor_id: Uuid,

    /// Mandatory clinical finding
    pub diagnosis: String,

    #[serde(default)]
    pub notes: String,

    pub is_editable: bool,

    pub created_at: DateTime<Utc>,
}

impl Consultation {
    /// Assemble a new editable consultation with server-assigned id and
    /// creation timestamp
    pub fn new(
        appointment_id: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
        diagnosis: String,
        notes: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            appointment_id,
            patient_id,
            doctor_id,
            diagnosis,
            notes,
            is_editable: true,
            created_at: Utc::now(),
        }
    }
}

/// Consultation creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConsultationRequest {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub diagnosis: String,
    #[serde(default)]
    pub notes: String,
}

/// Update request. Only the clinical fields can change; the appointment
/// linkage and edit flag are fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConsultationRequest {
    pub diagnosis: String,
    #[serde(default)]
    pub notes: String,
}
