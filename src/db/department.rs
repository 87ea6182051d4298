//! Department model and repository.

use serde::Serialize;

use super::DbPool;
use crate::{DeptStockError, Result};

/// Organizational unit owning items and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Repository for department operations.
pub struct DepartmentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> DepartmentRepository<'a> {
    /// Create a new DepartmentRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a department and return it.
    pub async fn create(&self, name: &str) -> Result<Department> {
        let id: i64 = sqlx::query_scalar("INSERT INTO departments (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(self.pool)
            .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DeptStockError::NotFound("department".to_string()))
    }

    /// List all departments ordered by ID.
    pub async fn list(&self) -> Result<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(departments)
    }

    /// Get a department by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(department)
    }

    /// Count all departments.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
