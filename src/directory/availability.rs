//! # Doctor Availability
//!
//! Weekly availability slots per doctor. Slots are stored and listed
//! but never consulted when booking an appointment; the lifecycle
//! manager performs no capacity or overlap check against them.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::doctors::DoctorRepository;
use super::errors::{DirectoryError, DirectoryResult};
use crate::store::{bounded, StoreError, StoreResult};

// ============================================================================
// Day of week
// ============================================================================

/// Named weekday, serialized capitalized ("Monday")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(DayOfWeek::Monday),
            "Tuesday" => Ok(DayOfWeek::Tuesday),
            "Wednesday" => Ok(DayOfWeek::Wednesday),
            "Thursday" => Ok(DayOfWeek::Thursday),
            "Friday" => Ok(DayOfWeek::Friday),
            "Saturday" => Ok(DayOfWeek::Saturday),
            "Sunday" => Ok(DayOfWeek::Sunday),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Model
// ============================================================================

/// One weekly availability slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,

    pub doctor_id: Uuid,

    pub day_of_week: DayOfWeek,

    /// HH:MM, 24-hour
    pub start_time: String,

    /// HH:MM, 24-hour
    pub end_time: String,

    pub max_appointments: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn new(
        doctor_id: Uuid,
        day_of_week: DayOfWeek,
        start_time: String,
        end_time: String,
        max_appointments: u32,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            doctor_id,
            day_of_week,
            start_time,
            end_time,
            max_appointments,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Availability slot creation request. The weekday arrives as text and
/// is validated by the service so a typo reports the allowed names
/// instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub doctor_id: Uuid,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub max_appointments: u32,
}

// ============================================================================
// Repository
// ============================================================================

/// Availability repository trait
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Persist a new slot
    async fn create(&self, slot: AvailabilitySlot) -> StoreResult<AvailabilitySlot>;

    /// All slots for one doctor
    async fn list_by_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<AvailabilitySlot>>;
}

/// In-memory availability repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryAvailabilityRepository {
    slots: std::sync::RwLock<Vec<AvailabilitySlot>>,
}

impl InMemoryAvailabilityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn create(&self, slot: AvailabilitySlot) -> StoreResult<AvailabilitySlot> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        slots.push(slot.clone());
        Ok(slot)
    }

    async fn list_by_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<AvailabilitySlot>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(slots
            .iter()
            .filter(|s| s.doctor_id == doctor_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Service
// ============================================================================

/// Availability service
pub struct AvailabilityService<A: AvailabilityRepository, D: DoctorRepository> {
    slots: Arc<A>,
    doctors: Arc<D>,
}

impl<A: AvailabilityRepository, D: DoctorRepository> AvailabilityService<A, D> {
    pub fn new(slots: Arc<A>, doctors: Arc<D>) -> Self {
        Self { slots, doctors }
    }

    /// Record a weekly availability slot for a doctor
    pub async fn create(
        &self,
        request: CreateAvailabilityRequest,
    ) -> DirectoryResult<AvailabilitySlot> {
        let day = DayOfWeek::from_str(&request.day_of_week).map_err(|_| {
            DirectoryError::InvalidInput(
                "invalid day of week. use: Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday"
                    .to_string(),
            )
        })?;

        let start = NaiveTime::parse_from_str(&request.start_time, "%H:%M").map_err(|_| {
            DirectoryError::InvalidInput(
                "invalid start time format. use HH:MM (24-hour format)".to_string(),
            )
        })?;

        let end = NaiveTime::parse_from_str(&request.end_time, "%H:%M").map_err(|_| {
            DirectoryError::InvalidInput(
                "invalid end time format. use HH:MM (24-hour format)".to_string(),
            )
        })?;

        if start >= end {
            return Err(DirectoryError::InvalidInput(
                "start time must be before end time".to_string(),
            ));
        }

        if request.max_appointments < 1 {
            return Err(DirectoryError::InvalidInput(
                "max appointments must be greater than 0".to_string(),
            ));
        }

        if bounded(self.doctors.find_by_id(request.doctor_id))
            .await?
            .is_none()
        {
            return Err(DirectoryError::NotFound("doctor"));
        }

        let slot = AvailabilitySlot::new(
            request.doctor_id,
            day,
            request.start_time,
            request.end_time,
            request.max_appointments,
        );
        let slot = bounded(self.slots.create(slot)).await?;

        tracing::info!(
            availability_id = %slot.id,
            doctor_id = %slot.doctor_id,
            day = %slot.day_of_week,
            "availability slot created"
        );
        Ok(slot)
    }

    /// All availability slots for one doctor
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> DirectoryResult<Vec<AvailabilitySlot>> {
        if bounded(self.doctors.find_by_id(doctor_id)).await?.is_none() {
            return Err(DirectoryError::NotFound("doctor"));
        }

        Ok(bounded(self.slots.list_by_doctor(doctor_id)).await?)
    }
}
