//! # Appointment Model
//!
//! The appointment record and its lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Appointment lifecycle states.
///
/// PENDING and CONFIRMED are open states. COMPLETED locks the status
/// (other fields may still change) and blocks deletion. CANCELLED is
/// fully terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier
    pub id: Uuid,

    /// Patient profile this appointment belongs to
    pub patient_id: Uuid,

    /// Doctor profile this appointment is with
    pub doctor_id: Uuid,

    /// When the appointment takes place
    pub scheduled_at: DateTime<Utc>,

    pub duration_minutes: u32,

    pub status: AppointmentStatus,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Assemble a new PENDING appointment with server-assigned id and
    /// timestamps. The status is never taken from the caller.
    pub fn new(
        patient_id: Uuid,
        doctor_id: Uuid,
        scheduled_at: DateTime<Utc>,
        duration_minutes: u32,
        notes: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            scheduled_at,
            duration_minutes,
            status: AppointmentStatus::Pending,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Booking request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

/// Update request. Replaces the schedule, duration, status and notes
/// wholesale; patient and doctor are fixed at booking time.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
}
