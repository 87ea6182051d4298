//! deptstock - departmental inventory tracker
//!
//! Users register under a department, log in, and keep per-department
//! item records (name, quantity, condition) up to date.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, verify_password, AuthSession, LimitResult,
    LoginLimiter, PasswordError, RegistrationError, RegistrationRequest, SessionError,
    SessionManager, ValidationError,
};
pub use config::Config;
pub use db::{
    Database, Department, DepartmentRepository, Item, ItemRepository, ItemUpdate, NewItem,
    NewUser, User, UserRepository, DEFAULT_DEPARTMENTS,
};
pub use error::{DeptStockError, Result};
pub use inventory::{add_item, parse_quantity, update_item, ItemInput};
pub use web::{create_router, AppState, WebServer};
