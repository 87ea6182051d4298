//! Item model for deptstock.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Inventory item belonging to one department.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    /// Descriptive status such as "New" or "Needs repair".
    pub condition: String,
    pub department_id: i64,
    /// Refreshed on every update; strictly increasing per item.
    pub last_updated: DateTime<Utc>,
}

/// Data for creating a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub condition: String,
    pub department_id: i64,
}

impl NewItem {
    /// Create a new item with a quantity of zero and no condition.
    pub fn new(name: impl Into<String>, department_id: i64) -> Self {
        Self {
            name: name.into(),
            quantity: 0,
            condition: String::new(),
            department_id,
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the condition.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }
}

/// Replacement values for the mutable item fields.
///
/// The department is fixed once an item exists.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    pub name: String,
    pub quantity: i64,
    pub condition: String,
}

impl ItemUpdate {
    pub fn new(name: impl Into<String>, quantity: i64, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            condition: condition.into(),
        }
    }
}
