//! User model for deptstock.

use chrono::{DateTime, Utc};

/// User entity representing a registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique).
    pub username: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Department the user registered under.
    pub department_id: i64,
    /// Free-text job identifier.
    pub job_id: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// Password hash (must already be hashed).
    pub password: String,
    pub email: String,
    pub department_id: i64,
    pub job_id: String,
}

impl NewUser {
    /// Create a new user record from its required fields.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        department_id: i64,
        job_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            department_id,
            job_id: job_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = NewUser::new("alice", "a@x.com", "hash", 1, "ACC-01");

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password, "hash");
        assert_eq!(user.department_id, 1);
        assert_eq!(user.job_id, "ACC-01");
    }
}
