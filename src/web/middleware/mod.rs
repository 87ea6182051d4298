//! Middleware for the web layer.

pub mod auth;

pub use auth::{require_identity, session_token, CurrentUser, LOGIN_PATH, SESSION_COOKIE};
