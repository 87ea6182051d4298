//! Item bookkeeping for deptstock.
//!
//! Form input arrives as raw strings. This module turns it into checked
//! [`NewItem`] / [`ItemUpdate`] values and writes them through the
//! repositories.

use tracing::info;

use crate::db::{DbPool, DepartmentRepository, Item, ItemRepository, ItemUpdate, NewItem};
use crate::{DeptStockError, Result};

/// Maximum length for item names (in characters).
pub const MAX_ITEM_NAME_LENGTH: usize = 100;

/// Maximum length for the condition note (in characters).
pub const MAX_CONDITION_LENGTH: usize = 50;

/// Item fields as submitted, before any parsing.
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub name: String,
    pub quantity: String,
    pub condition: String,
}

impl ItemInput {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            condition: condition.into(),
        }
    }
}

/// Checked item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemFields {
    name: String,
    quantity: i64,
    condition: String,
}

/// Parse a quantity field.
///
/// Blank input means 0. Anything else must be a whole number that is not
/// negative.
pub fn parse_quantity(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let quantity: i64 = raw
        .parse()
        .map_err(|_| DeptStockError::Validation("Quantity must be a whole number".to_string()))?;
    if quantity < 0 {
        return Err(DeptStockError::Validation(
            "Quantity must not be negative".to_string(),
        ));
    }
    Ok(quantity)
}

fn validate_item_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DeptStockError::Validation(
            "Item name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_ITEM_NAME_LENGTH {
        return Err(DeptStockError::Validation(format!(
            "Item name must be at most {} characters",
            MAX_ITEM_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_condition(condition: &str) -> Result<()> {
    if condition.chars().count() > MAX_CONDITION_LENGTH {
        return Err(DeptStockError::Validation(format!(
            "Condition must be at most {} characters",
            MAX_CONDITION_LENGTH
        )));
    }
    Ok(())
}

fn check_fields(input: &ItemInput) -> Result<ItemFields> {
    let name = input.name.trim();
    let condition = input.condition.trim();
    validate_item_name(name)?;
    let quantity = parse_quantity(&input.quantity)?;
    validate_condition(condition)?;

    Ok(ItemFields {
        name: name.to_string(),
        quantity,
        condition: condition.to_string(),
    })
}

/// Add an item to a department.
///
/// Field errors and an unknown department are reported as
/// [`DeptStockError::Validation`]; nothing is written in either case.
pub async fn add_item(pool: &DbPool, department_id: i64, input: &ItemInput) -> Result<Item> {
    let fields = check_fields(input)?;

    if DepartmentRepository::new(pool)
        .get_by_id(department_id)
        .await?
        .is_none()
    {
        return Err(DeptStockError::Validation(
            "Unknown department".to_string(),
        ));
    }

    let item = ItemRepository::new(pool)
        .create(
            &NewItem::new(fields.name, department_id)
                .with_quantity(fields.quantity)
                .with_condition(fields.condition),
        )
        .await?;

    info!(
        item_id = item.id,
        department_id,
        quantity = item.quantity,
        "Item added"
    );
    Ok(item)
}

/// Replace the name, quantity and condition of an existing item.
///
/// A missing item is [`DeptStockError::NotFound`] and is reported before
/// the fields are looked at.
pub async fn update_item(pool: &DbPool, item_id: i64, input: &ItemInput) -> Result<Item> {
    let repo = ItemRepository::new(pool);
    if repo.get_by_id(item_id).await?.is_none() {
        return Err(DeptStockError::NotFound("item".to_string()));
    }

    let fields = check_fields(input)?;
    let item = repo
        .update(
            item_id,
            &ItemUpdate::new(fields.name, fields.quantity, fields.condition),
        )
        .await?;

    info!(item_id, quantity = item.quantity, "Item updated");
    Ok(item)
}
