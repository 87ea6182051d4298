//! Input validation for registration and login forms.
//!
//! Messages are shown to the user as-is.

use thiserror::Error;
use validator::ValidateEmail;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 80;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum job ID length.
pub const MAX_JOB_ID_LENGTH: usize = 50;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Username contains control characters or surrounding whitespace.
    #[error("Username contains invalid characters")]
    UsernameInvalidChars,

    /// Email address is not syntactically valid.
    #[error("Invalid email address")]
    EmailInvalidFormat,
}

fn check_required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn check_length(value: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Validate a username.
///
/// ```
/// use deptstock::auth::validation::validate_username;
///
/// assert!(validate_username("alice").is_ok());
/// assert!(validate_username("").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    check_required(username, "Username")?;
    check_length(username, "Username", MAX_USERNAME_LENGTH)?;
    if username.trim() != username || username.chars().any(|c| c.is_control()) {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
///
/// ```
/// use deptstock::auth::validation::validate_email;
///
/// assert!(validate_email("a@x.com").is_ok());
/// assert!(validate_email("ax.com").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    check_required(email, "Email")?;
    check_length(email, "Email", MAX_EMAIL_LENGTH)?;
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Validate a password. Any non-empty password is accepted.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    check_length(password, "Password", MAX_PASSWORD_LENGTH)
}

/// Validate a job ID.
pub fn validate_job_id(job_id: &str) -> Result<(), ValidationError> {
    check_required(job_id, "Job ID")?;
    check_length(job_id, "Job ID", MAX_JOB_ID_LENGTH)
}

/// Validate all registration fields, returning the first failure.
///
/// The email is checked first so a malformed address is reported even when
/// other fields are also wrong.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    job_id: &str,
) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_username(username)?;
    validate_password(password)?;
    validate_job_id(job_id)?;
    Ok(())
}
