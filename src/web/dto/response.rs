//! Page documents returned by the GET routes.

use serde::Serialize;

use crate::db::{Department, Item, User};
use crate::web::flash::Flash;

/// Page wrapper: the flashes pending for this render plus the page data.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub flashes: Vec<Flash>,
    pub data: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(flashes: Vec<Flash>, data: T) -> Self {
        Self { flashes, data }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub department_id: i64,
    pub job_id: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            department_id: user.department_id,
            job_id: user.job_id.clone(),
        }
    }
}

/// Signup form page.
#[derive(Debug, Serialize)]
pub struct SignupPage {
    pub departments: Vec<Department>,
}

/// Login form page.
#[derive(Debug, Serialize)]
pub struct LoginPage {}

/// Home page: every department.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub user: UserInfo,
    pub departments: Vec<Department>,
}

/// One department and its items.
#[derive(Debug, Serialize)]
pub struct DepartmentPage {
    pub department: Department,
    pub items: Vec<Item>,
}

/// Add item form page.
#[derive(Debug, Serialize)]
pub struct AddItemPage {
    pub departments: Vec<Department>,
}

/// Update item form page.
#[derive(Debug, Serialize)]
pub struct UpdateItemPage {
    pub item: Item,
}
