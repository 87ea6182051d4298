//! Error types for deptstock.

use thiserror::Error;

/// Common error type for deptstock.
#[derive(Error, Debug)]
pub enum DeptStockError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant unless a repository
    /// maps them to something more specific first.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A uniqueness rule would be broken (duplicate username or email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DeptStockError {
    fn from(e: sqlx::Error) -> Self {
        DeptStockError::Database(e.to_string())
    }
}

/// Result type alias for deptstock operations.
pub type Result<T> = std::result::Result<T, DeptStockError>;
