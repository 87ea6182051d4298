//! User registration for deptstock.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_registration, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{DbPool, DepartmentRepository, NewUser, User, UserRepository};
use crate::DeptStockError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The selected department does not exist.
    #[error("Unknown department")]
    UnknownDepartment,

    /// Username or email already in use.
    #[error("{0}")]
    Conflict(String),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl RegistrationError {
    /// Whether the error is the user's to fix (and safe to show them).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RegistrationError::Validation(_)
                | RegistrationError::UnknownDepartment
                | RegistrationError::Conflict(_)
        )
    }
}

impl From<DeptStockError> for RegistrationError {
    fn from(e: DeptStockError) -> Self {
        match e {
            DeptStockError::Conflict(msg) => RegistrationError::Conflict(msg),
            DeptStockError::Validation(_) => RegistrationError::UnknownDepartment,
            other => RegistrationError::Database(other.to_string()),
        }
    }
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    /// Plaintext password; hashed before it reaches the database.
    pub password: String,
    pub department_id: i64,
    pub job_id: String,
}

impl RegistrationRequest {
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

/// Register a new user.
///
/// Steps, each of which can stop the registration before anything is
/// written:
/// 1. Validate the fields (email syntax first)
/// 2. Check that the department exists
/// 3. Reject a taken username or email
/// 4. Hash the password and insert the user
///
/// The insert re-checks uniqueness inside its own transaction, so a
/// concurrent registration with the same username still fails with
/// [`RegistrationError::Conflict`].
pub async fn register(
    pool: &DbPool,
    request: RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    validate_registration(
        &request.username,
        &request.email,
        &request.password,
        &request.job_id,
    )?;

    if DepartmentRepository::new(pool)
        .get_by_id(request.department_id)
        .await?
        .is_none()
    {
        return Err(RegistrationError::UnknownDepartment);
    }

    let repo = UserRepository::new(pool);
    if repo.username_exists(&request.username).await? {
        return Err(RegistrationError::Conflict(
            "Username already exists".to_string(),
        ));
    }
    if repo.email_exists(&request.email).await? {
        return Err(RegistrationError::Conflict(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser::new(
        request.username,
        request.email,
        password_hash,
        request.department_id,
        request.job_id,
    );
    let user = repo.create(&new_user).await?;

    info!(
        username = %user.username,
        user_id = user.id,
        department_id = user.department_id,
        "New user registered"
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::Database;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        db.seed_departments().await.unwrap();
        db
    }

    fn alice() -> RegistrationRequest {
        RegistrationRequest::new("alice", "a@x.com", "secret", 1, "ACC-01")
    }

    #[tokio::test]
    async fn test_register_success() {
        let db = setup_db().await;

        let user = register(db.pool(), alice()).await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.department_id, 1);
        assert_eq!(user.job_id, "ACC-01");
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let db = setup_db().await;

        let user = register(db.pool(), alice()).await.unwrap();

        assert_ne!(user.password, "secret");
        assert!(user.password.starts_with("$argon2id$"));
        assert!(verify_password("secret", &user.password).is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let db = setup_db().await;
        register(db.pool(), alice()).await.unwrap();

        let result = register(
            db.pool(),
            RegistrationRequest::new("alice", "other@x.com", "secret", 2, "J2"),
        )
        .await;

        assert!(matches!(result, Err(RegistrationError::Conflict(_))));
        assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let db = setup_db().await;
        register(db.pool(), alice()).await.unwrap();

        let result = register(
            db.pool(),
            RegistrationRequest::new("bob", "a@x.com", "secret", 2, "J2"),
        )
        .await;

        match result {
            Err(RegistrationError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_invalid_email_inserts_nothing() {
        let db = setup_db().await;

        let result = register(
            db.pool(),
            RegistrationRequest::new("alice", "ax.com", "secret", 1, "J1"),
        )
        .await;

        assert!(matches!(
            result,
            Err(RegistrationError::Validation(ValidationError::EmailInvalidFormat))
        ));
        assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_unknown_department() {
        let db = setup_db().await;

        let result = register(
            db.pool(),
            RegistrationRequest::new("alice", "a@x.com", "secret", 42, "J1"),
        )
        .await;

        assert!(matches!(result, Err(RegistrationError::UnknownDepartment)));
    }

    #[tokio::test]
    async fn test_register_missing_job_id() {
        let db = setup_db().await;

        let result = register(
            db.pool(),
            RegistrationRequest::new("alice", "a@x.com", "secret", 1, " "),
        )
        .await;

        assert!(matches!(
            result,
            Err(RegistrationError::Validation(ValidationError::Required("Job ID")))
        ));
    }

    #[test]
    fn test_error_messages_and_classification() {
        let err = RegistrationError::Conflict("Username already exists".to_string());
        assert_eq!(err.to_string(), "Username already exists");
        assert!(err.is_user_error());

        let err = RegistrationError::Validation(ValidationError::EmailInvalidFormat);
        assert_eq!(err.to_string(), "Invalid email address");
        assert!(err.is_user_error());

        let err = RegistrationError::Database("disk I/O error".to_string());
        assert!(!err.is_user_error());
    }
}
