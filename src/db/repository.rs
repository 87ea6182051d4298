//! User repository for deptstock.

use chrono::Utc;
use sqlx::SqliteConnection;

use super::user::{NewUser, User};
use super::{begin_write, DbPool};
use crate::{DeptStockError, Result};

const USER_COLUMNS: &str =
    "id, username, email, password, department_id, job_id, created_at";

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// The uniqueness checks and the insert share one write transaction,
    /// so concurrent registrations run one after another and the losers
    /// see the winner's row. A UNIQUE violation is still reported as
    /// [`DeptStockError::Conflict`].
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let mut tx = begin_write(self.pool).await?;

        if username_taken(&mut tx, &new_user.username).await? {
            return Err(DeptStockError::Conflict("Username already exists".to_string()));
        }
        if email_taken(&mut tx, &new_user.email).await? {
            return Err(DeptStockError::Conflict("Email already registered".to_string()));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, password, department_id, job_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(new_user.department_id)
        .bind(&new_user.job_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DeptStockError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Get a user by username (exact match).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Check if a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        username_taken(&mut conn, username).await
    }

    /// Check if an email is already registered (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        email_taken(&mut conn, email).await
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

async fn username_taken(conn: &mut SqliteConnection, username: &str) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(conn)
            .await?;
    Ok(exists)
}

async fn email_taken(conn: &mut SqliteConnection, email: &str) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

/// Map constraint violations on insert to domain errors.
fn map_insert_error(e: sqlx::Error) -> DeptStockError {
    if let Some(db_err) = e.as_database_error() {
        let message = db_err.message();
        if db_err.is_unique_violation() {
            return if message.contains("users.email") {
                DeptStockError::Conflict("Email already registered".to_string())
            } else {
                DeptStockError::Conflict("Username already exists".to_string())
            };
        }
        if db_err.is_foreign_key_violation() {
            return DeptStockError::Validation("Unknown department".to_string());
        }
    }
    DeptStockError::from(e)
}
