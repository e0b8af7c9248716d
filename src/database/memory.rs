use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::Employee;
use crate::database::repository::EmployeeRepository;

/// Process-local employee store used in development and tests.
///
/// Ids start at 1 and are never reused, matching a serial primary key.
pub struct MemoryEmployeeRepository {
    inner: RwLock<MemoryState>,
}

struct MemoryState {
    rows: BTreeMap<i32, Employee>,
    next_id: i32,
}

impl Default for MemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store pre-populated with `employees`, each assigned a fresh id
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let mut state = MemoryState {
            rows: BTreeMap::new(),
            next_id: 1,
        };
        for employee in employees {
            state.insert(employee);
        }
        Self {
            inner: RwLock::new(state),
        }
    }
}

impl MemoryState {
    fn insert(&mut self, mut employee: Employee) -> Employee {
        employee.id = self.next_id;
        self.next_id += 1;
        self.rows.insert(employee.id, employee.clone());
        employee
    }
}

#[async_trait]
impl EmployeeRepository for MemoryEmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>, DatabaseError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, employee: Employee) -> Result<Employee, DatabaseError> {
        Ok(self.inner.write().await.insert(employee))
    }

    async fn update(&self, employee: Employee) -> Result<Option<Employee>, DatabaseError> {
        let mut state = self.inner.write().await;
        match state.rows.get_mut(&employee.id) {
            Some(row) => {
                *row = employee.clone();
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
