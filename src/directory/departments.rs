//! # Departments
//!
//! Department records with soft delete. Deleting a department only
//! flips `is_active`; the row stays behind for doctors and nurses that
//! still reference it, and inactive departments are invisible to
//! business reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{DirectoryError, DirectoryResult};
use crate::store::{bounded, StoreError, StoreResult};

/// Department model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Soft-delete flag; false means deleted
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Department {
    pub fn new(name: String, description: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name,
            description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Department creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update request; at least one field must be present
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// One page of active departments
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentPage {
    pub data: Vec<Department>,
    pub total_count: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Department repository trait
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Persist a new department
    async fn create(&self, department: Department) -> StoreResult<Department>;

    /// Find a department by its ID, active or not
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Department>>;

    /// Active departments only, windowed by offset/limit
    async fn list_active(&self, offset: usize, limit: usize) -> StoreResult<Vec<Department>>;

    /// Number of active departments
    async fn count_active(&self) -> StoreResult<usize>;

    /// Replace a stored department; false when the id is unknown
    async fn update(&self, department: Department) -> StoreResult<bool>;
}

/// In-memory department repository backing the server and tests
#[derive(Debug, Default)]
pub struct InMemoryDepartmentRepository {
    departments: std::sync::RwLock<Vec<Department>>,
}

impl InMemoryDepartmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn create(&self, department: Department) -> StoreResult<Department> {
        let mut departments = self
            .departments
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        departments.push(department.clone());
        Ok(department)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Department>> {
        let departments = self
            .departments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(departments.iter().find(|d| d.id == id).cloned())
    }

    async fn list_active(&self, offset: usize, limit: usize) -> StoreResult<Vec<Department>> {
        let departments = self
            .departments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(departments
            .iter()
            .filter(|d| d.is_active)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_active(&self) -> StoreResult<usize> {
        let departments = self
            .departments
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(departments.iter().filter(|d| d.is_active).count())
    }

    async fn update(&self, department: Department) -> StoreResult<bool> {
        let mut departments = self
            .departments
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        if let Some(existing) = departments.iter_mut().find(|d| d.id == department.id) {
            *existing = department;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Department service
pub struct DepartmentService<D: DepartmentRepository> {
    departments: Arc<D>,
}

impl<D: DepartmentRepository> DepartmentService<D> {
    pub fn new(departments: Arc<D>) -> Self {
        Self { departments }
    }

    /// Create a department. The name and description are stored trimmed.
    pub async fn create(&self, request: CreateDepartmentRequest) -> DirectoryResult<Department> {
        let name = request.name.trim().to_string();
        let description = request.description.trim().to_string();

        validate_name(&name)?;
        validate_description(&description)?;

        let department = Department::new(name, description);
        let department = bounded(self.departments.create(department)).await?;

        tracing::info!(department_id = %department.id, name = %department.name, "department created");
        Ok(department)
    }

    /// Get an active department by ID.
    ///
    /// An inactive department is found but unusable, which is reported
    /// as a state error rather than absence.
    pub async fn get(&self, department_id: Uuid) -> DirectoryResult<Department> {
        let department = bounded(self.departments.find_by_id(department_id))
            .await?
            .ok_or(DirectoryError::NotFound("department"))?;

        if !department.is_active {
            return Err(DirectoryError::InvalidState(
                "department is inactive".to_string(),
            ));
        }

        Ok(department)
    }

    /// One page of active departments
    pub async fn list(&self, page: u32, page_size: u32) -> DirectoryResult<DepartmentPage> {
        if page < 1 {
            return Err(DirectoryError::InvalidInput(
                "page must be greater than 0".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(DirectoryError::InvalidInput(
                "page_size must be greater than 0".to_string(),
            ));
        }
        if page_size > 100 {
            return Err(DirectoryError::InvalidInput(
                "page_size cannot exceed 100".to_string(),
            ));
        }

        let offset = (page as usize - 1) * page_size as usize;
        let data = bounded(self.departments.list_active(offset, page_size as usize)).await?;
        let total_count = bounded(self.departments.count_active()).await?;

        let total_pages =
            (total_count.div_ceil(page_size as usize) as u32).max(1);

        Ok(DepartmentPage {
            data,
            total_count,
            page,
            page_size,
            total_pages,
        })
    }

    /// Update one or more fields of an active department
    pub async fn update(
        &self,
        department_id: Uuid,
        request: UpdateDepartmentRequest,
    ) -> DirectoryResult<Department> {
        if request.name.is_none() && request.description.is_none() && request.is_active.is_none() {
            return Err(DirectoryError::InvalidInput(
                "at least one field must be provided for update".to_string(),
            ));
        }

        let name = request.name.map(|n| n.trim().to_string());
        let description = request.description.map(|d| d.trim().to_string());

        if let Some(ref name) = name {
            validate_name(name)?;
        }
        if let Some(ref description) = description {
            validate_description(description)?;
        }

        let existing = bounded(self.departments.find_by_id(department_id))
            .await?
            .ok_or(DirectoryError::NotFound("department"))?;

        if !existing.is_active {
            return Err(DirectoryError::InvalidState(
                "cannot update an inactive department".to_string(),
            ));
        }

        let mut updated = existing;
        if let Some(name) = name {
            updated.name = name;
        }
        if let Some(description) = description {
            updated.description = description;
        }
        if let Some(is_active) = request.is_active {
            updated.is_active = is_active;
        }
        updated.updated_at = Utc::now();

        if !bounded(self.departments.update(updated.clone())).await? {
            return Err(DirectoryError::NotFound("department"));
        }

        tracing::info!(department_id = %updated.id, "department updated");
        Ok(updated)
    }

    /// Soft-delete a department by flipping its active flag
    pub async fn delete(&self, department_id: Uuid) -> DirectoryResult<()> {
        let existing = bounded(self.departments.find_by_id(department_id))
            .await?
            .ok_or(DirectoryError::NotFound("department"))?;

        if !existing.is_active {
            return Err(DirectoryError::InvalidState(
                "department is already deleted".to_string(),
            ));
        }

        let mut updated = existing;
        updated.is_active = false;
        updated.updated_at = Utc::now();

        if !bounded(self.departments.update(updated)).await? {
            return Err(DirectoryError::NotFound("department"));
        }

        tracing::info!(department_id = %department_id, "department deactivated");
        Ok(())
    }
}

fn validate_name(name: &str) -> DirectoryResult<()> {
    if name.is_empty() {
        return Err(DirectoryError::InvalidInput(
            "name cannot be empty".to_string(),
        ));
    }
    if name.len() > 255 {
        return Err(DirectoryError::InvalidInput(
            "name cannot exceed 255 characters".to_string(),
        ));
    }
    if name.len() < 2 {
        return Err(DirectoryError::InvalidInput(
            "name must be at least 2 characters long".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> DirectoryResult<()> {
    if description.len() > 500 {
        return Err(DirectoryError::InvalidInput(
            "description cannot exceed 500 characters".to_string(),
        ));
    }
    Ok(())
}
