//! Form bodies posted by the pages.
//!
//! Every field defaults to empty so a missing field reaches validation and
//! is reported with a flash like any other bad input.

use serde::Deserialize;

/// Signup form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Department ID as typed; parsed by the handler.
    pub department_id: String,
    pub job_id: String,
}

/// Login form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Add/update item form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub quantity: String,
    pub condition: String,
    /// Only read when adding an item.
    pub department_id: String,
}

impl ItemForm {
    pub fn to_input(&self) -> crate::inventory::ItemInput {
        crate::inventory::ItemInput::new(&*self.name, &*self.quantity, &*self.condition)
    }
}
