//! Web layer for deptstock.
//!
//! Form posts answer with redirects and carry user-facing messages in a
//! flash cookie; GET routes render JSON page documents.

pub mod dto;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::PageError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
