//! # Hospital Configuration
//!
//! Hospital-wide settings records. Creation fills in operational
//! defaults for fields the caller leaves out; updates replace the
//! stored values verbatim.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{DirectoryError, DirectoryResult};
use crate::store::{bounded, StoreError, StoreResult};

/// Default appointment length when a config omits it
const DEFAULT_APPOINTMENT_DURATION_MINUTES: u32 = 30;

/// Default same-day cancellation window when a config omits it
const DEFAULT_CANCELLATION_HOURS: u32 = 24;

/// Hospital configuration model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalConfig {
    pub id: Uuid,

    /// HH:MM, 24-hour
    pub working_hours_start: String,

    /// HH:MM, 24-hour
    pub working_hours_end: String,

    pub appointment_duration_minutes: u32,

    pub max_same_day_cancellation_hours: u32,

    pub enable_patient_self_registration: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Hospital config creation request. Zero or omitted numeric fields
/// take the operational defaults; the registration flag distinguishes
/// absent from explicitly false.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHospitalConfigRequest {
    pub working_hours_start: String,
    pub working_hours_end: String,
    #[serde(default)]
    pub appointment_duration_minutes: u32,
    #[serde(default)]
    pub max_same_day_cancellation_hours: u32,
    #[serde(default)]
    pub enable_patient_self_registration: Option<bool>,
}

/// Hospital config update request; replaces the stored record
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHospitalConfigRequest {
    pub working_hours_start: String,
    pub working_hours_end: String,
    pub appointment_duration_minutes: u32,
    pub max_same_day_cancellation_hours: u32,
    #[serde(default)]
    pub enable_patient_self_registration: Option<bool>,
}

/// Hospital config repository trait
#[async_trait]
pub trait HospitalConfigRepository: Send + Sync {
    /// Persist a new config record
    async fn create(&self, config: HospitalConfig) -> StoreResult<HospitalConfig>;

    /// Find a config by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<HospitalConfig>>;

    /// All stored configs
    async fn list(&self) -> StoreResult<Vec<HospitalConfig>>;

    /// Replace a stored config; false when the id is unknown
    async fn update(&self, config: HospitalConfig) -> StoreResult<bool>;

    /// Remove a config; false when the id is unknown
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

/// In-memory hospital config repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryHospitalConfigRepository {
    configs: std::sync::RwLock<Vec<HospitalConfig>>,
}

impl InMemoryHospitalConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HospitalConfigRepository for InMemoryHospitalConfigRepository {
    async fn create(&self, config: HospitalConfig) -> StoreResult<HospitalConfig> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        configs.push(config.clone());
        Ok(config)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<HospitalConfig>> {
        let configs = self
            .configs
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(configs.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<HospitalConfig>> {
        let configs = self
            .configs
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(configs.clone())
    }

    async fn update(&self, config: HospitalConfig) -> StoreResult<bool> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        if let Some(existing) = configs.iter_mut().find(|c| c.id == config.id) {
            *existing = config;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        let before = configs.len();
        configs.retain(|c| c.id != id);
        Ok(configs.len() < before)
    }
}

/// Hospital config service
pub struct HospitalConfigService<C: HospitalConfigRepository> {
    configs: Arc<C>,
}

impl<C: HospitalConfigRepository> HospitalConfigService<C> {
    pub fn new(configs: Arc<C>) -> Self {
        Self { configs }
    }

    /// Create a config record, applying operational defaults
    pub async fn create(
        &self,
        request: CreateHospitalConfigRequest,
    ) -> DirectoryResult<HospitalConfig> {
        let now = Utc::now();

        let mut duration = request.appointment_duration_minutes;
        if duration == 0 {
            duration = DEFAULT_APPOINTMENT_DURATION_MINUTES;
        }

        let mut cancellation_hours = request.max_same_day_cancellation_hours;
        if cancellation_hours == 0 {
            cancellation_hours = DEFAULT_CANCELLATION_HOURS;
        }

        let config = HospitalConfig {
            id: Uuid::new_v4(),
            working_hours_start: request.working_hours_start,
            working_hours_end: request.working_hours_end,
            appointment_duration_minutes: duration,
            max_same_day_cancellation_hours: cancellation_hours,
            enable_patient_self_registration: request
                .enable_patient_self_registration
                .unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let config = bounded(self.configs.create(config)).await?;

        tracing::info!(config_id = %config.id, "hospital config created");
        Ok(config)
    }

    /// Get a config by ID
    pub async fn get(&self, config_id: Uuid) -> DirectoryResult<HospitalConfig> {
        bounded(self.configs.find_by_id(config_id))
            .await?
            .ok_or(DirectoryError::NotFound("hospital config"))
    }

    /// All stored configs
    pub async fn list(&self) -> DirectoryResult<Vec<HospitalConfig>> {
        Ok(bounded(self.configs.list()).await?)
    }

    /// Replace the stored values. The registration flag keeps its
    /// stored value when the request omits it; the numeric fields are
    /// taken verbatim, with no defaulting.
    pub async fn update(
        &self,
        config_id: Uuid,
        request: UpdateHospitalConfigRequest,
    ) -> DirectoryResult<HospitalConfig> {
        let existing = bounded(self.configs.find_by_id(config_id))
            .await?
            .ok_or(DirectoryError::NotFound("hospital config"))?;

        let updated = HospitalConfig {
            id: existing.id,
            working_hours_start: request.working_hours_start,
            working_hours_end: request.working_hours_end,
            appointment_duration_minutes: request.appointment_duration_minutes,
            max_same_day_cancellation_hours: request.max_same_day_cancellation_hours,
            enable_patient_self_registration: request
                .enable_patient_self_registration
                .unwrap_or(existing.enable_patient_self_registration),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        if !bounded(self.configs.update(updated.clone())).await? {
            return Err(DirectoryError::NotFound("hospital config"));
        }

        tracing::info!(config_id = %updated.id, "hospital config updated");
        Ok(updated)
    }

    /// Remove a config record
    pub async fn delete(&self, config_id: Uuid) -> DirectoryResult<()> {
        if !bounded(self.configs.delete(config_id)).await? {
            return Err(DirectoryError::NotFound("hospital config"));
        }

        tracing::info!(config_id = %config_id, "hospital config deleted");
        Ok(())
    }
}
