use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Employee;

/// Persistence gateway for employee records keyed by integer id
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Every employee in primary-key order
    async fn find_all(&self) -> Result<Vec<Employee>, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DatabaseError>;

    /// Insert a new row. The incoming id is ignored and the store assigns one.
    async fn insert(&self, employee: Employee) -> Result<Employee, DatabaseError>;

    /// Overwrite the row with `employee.id`. `None` when no such row exists.
    async fn update(&self, employee: Employee) -> Result<Option<Employee>, DatabaseError>;

    /// Remove a row, returning whether it existed
    async fn delete_by_id(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

const SELECT_COLUMNS: &str = "id, first_name, last_name, email";

/// `employee` table in PostgreSQL
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>, DatabaseError> {
        let sql = format!("SELECT {} FROM employee ORDER BY id", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, DatabaseError> {
        let sql = format!("SELECT {} FROM employee WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, employee: Employee) -> Result<Employee, DatabaseError> {
        let sql = format!(
            "INSERT INTO employee (first_name, last_name, email) VALUES ($1, $2, $3) RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, employee: Employee) -> Result<Option<Employee>, DatabaseError> {
        let sql = format!(
            "UPDATE employee SET first_name = $2, last_name = $3, email = $4 WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee.id)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
