//! Authentication module for deptstock.
//!
//! Password hashing, registration, input validation and session
//! management.

mod password;
mod registration;
mod session;
pub mod validation;

pub use password::{hash_password, verify_password, PasswordError};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use session::{
    authenticate, AuthSession, LimitResult, LoginLimiter, SessionError, SessionManager,
};
pub use validation::ValidationError;
