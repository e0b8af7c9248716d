use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::database::models::{Employee, UNSAVED_ID};
use crate::database::patch::{EmployeePatch, PatchError};
use crate::database::{DatabaseError, EmployeeRepository};

#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    #[error("Employee id not found - {0}")]
    NotFound(i32),
    #[error("Employee id not allowed in request body - {0}")]
    IdInPatch(i32),
    #[error("Invalid patch for employee id {id}: {source}")]
    InvalidPatch { id: i32, source: PatchError },
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// Employee use cases on top of an `EmployeeRepository`
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> Result<Vec<Employee>, EmployeeError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Employee, EmployeeError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Always inserts. Any client-supplied id is discarded first.
    pub async fn create(&self, mut employee: Employee) -> Result<Employee, EmployeeError> {
        employee.id = UNSAVED_ID;
        let saved = self.repository.insert(employee).await?;
        info!("Created employee {}", saved.id);
        Ok(saved)
    }

    /// Persist a complete record. An unsaved id inserts; any other id must exist.
    pub async fn update(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        if employee.is_new() {
            return self.create(employee).await;
        }
        let id = employee.id;
        let saved = self
            .repository
            .update(employee)
            .await?
            .ok_or(EmployeeError::NotFound(id))?;
        info!("Updated employee {}", id);
        Ok(saved)
    }

    /// Merge a sparse JSON body onto the stored record and persist the result
    pub async fn patch(&self, id: i32, body: Value) -> Result<Employee, EmployeeError> {
        let current = self.find_by_id(id).await?;

        let patch = EmployeePatch::from_json(body).map_err(|source| match source {
            PatchError::ImmutableField(_) => EmployeeError::IdInPatch(id),
            source => EmployeeError::InvalidPatch { id, source },
        })?;

        let merged = patch.apply(&current);
        let saved = self
            .repository
            .update(merged)
            .await?
            .ok_or(EmployeeError::NotFound(id))?;
        info!("Patched employee {} fields {:?}", id, patch.touched_fields());
        Ok(saved)
    }

    pub async fn delete(&self, id: i32) -> Result<(), EmployeeError> {
        // Resolve first so a missing id is reported as such
        self.find_by_id(id).await?;
        if !self.repository.delete_by_id(id).await? {
            return Err(EmployeeError::NotFound(id));
        }
        info!("Deleted employee {}", id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), EmployeeError> {
        Ok(self.repository.health_check().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryEmployeeRepository;
    use serde_json::json;

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryEmployeeRepository::with_employees([
            Employee::new("Leslie", "Andrews", "leslie@luv2code.com"),
            Employee::new("Emma", "Baumgarten", "emma@luv2code.com"),
        ])))
    }

    #[tokio::test]
    async fn create_ignores_client_id() {
        let service = service();
        let saved = service
            .create(Employee::new("Ali", "Veli", "ali@x.com").with_id(1))
            .await
            .unwrap();
        assert_eq!(saved.id, 3);
        // The existing row 1 is untouched
        assert_eq!(service.find_by_id(1).await.unwrap().first_name, "Leslie");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = service();
        assert!(matches!(service.find_by_id(42).await, Err(EmployeeError::NotFound(42))));
        assert!(matches!(
            service.patch(42, json!({"firstName": "X"})).await,
            Err(EmployeeError::NotFound(42))
        ));
        assert!(matches!(service.delete(42).await, Err(EmployeeError::NotFound(42))));
    }

    #[tokio::test]
    async fn not_found_wins_over_id_in_patch() {
        let service = service();
        assert!(matches!(
            service.patch(42, json!({"id": 42})).await,
            Err(EmployeeError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn patch_with_id_is_rejected() {
        let service = service();
        let err = service.patch(1, json!({"id": 9, "firstName": "X"})).await.unwrap_err();
        assert!(matches!(err, EmployeeError::IdInPatch(1)));
        assert_eq!(err.to_string(), "Employee id not allowed in request body - 1");
        assert_eq!(service.find_by_id(1).await.unwrap().first_name, "Leslie");
    }

    #[tokio::test]
    async fn patch_merges_and_persists() {
        let service = service();
        let patched = service.patch(2, json!({"email": "emma@x.com"})).await.unwrap();
        assert_eq!(
            patched,
            Employee::new("Emma", "Baumgarten", "emma@x.com").with_id(2)
        );
        assert_eq!(service.find_by_id(2).await.unwrap(), patched);
    }

    #[tokio::test]
    async fn patch_type_mismatch_names_field() {
        let service = service();
        let err = service.patch(2, json!({"lastName": 7})).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid patch for employee id 2: Field 'lastName' must be a string"
        );
    }

    #[tokio::test]
    async fn update_requires_existing_id() {
        let service = service();
        let updated = service
            .update(Employee::new("L", "A", "l@x.com").with_id(1))
            .await
            .unwrap();
        assert_eq!(updated.first_name, "L");
        assert!(matches!(
            service.update(Employee::new("N", "N", "n@x.com").with_id(77)).await,
            Err(EmployeeError::NotFound(77))
        ));
    }

    #[tokio::test]
    async fn update_without_id_inserts() {
        let service = service();
        let saved = service.update(Employee::new("N", "N", "n@x.com")).await.unwrap();
        assert_eq!(saved.id, 3);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let service = service();
        service.delete(1).await.unwrap();
        assert!(matches!(service.find_by_id(1).await, Err(EmployeeError::NotFound(1))));
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }
}
