//! Item repository for deptstock.

use chrono::{DateTime, Duration, Utc};

use super::item::{Item, ItemUpdate, NewItem};
use super::{begin_write, DbPool};
use crate::{DeptStockError, Result};

const ITEM_COLUMNS: &str = "id, name, quantity, condition, department_id, last_updated";

/// Repository for item operations.
pub struct ItemRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new ItemRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new item and return it.
    pub async fn create(&self, new_item: &NewItem) -> Result<Item> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO items (name, quantity, condition, department_id, last_updated)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_item.name)
        .bind(new_item.quantity)
        .bind(&new_item.condition)
        .bind(new_item.department_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DeptStockError::NotFound("item".to_string()))
    }

    /// Get an item by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// List the items of a department ordered by ID.
    pub async fn list_by_department(&self, department_id: i64) -> Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE department_id = ? ORDER BY id"
        ))
        .bind(department_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Replace name, quantity and condition of an item and refresh its
    /// `last_updated` stamp.
    ///
    /// Returns [`DeptStockError::NotFound`] if the item does not exist.
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> Result<Item> {
        let mut tx = begin_write(self.pool).await?;

        let previous: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT last_updated FROM items WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Err(DeptStockError::NotFound("item".to_string()));
        };

        sqlx::query(
            "UPDATE items SET name = ?, quantity = ?, condition = ?, last_updated = ?
             WHERE id = ?",
        )
        .bind(&update.name)
        .bind(update.quantity)
        .bind(&update.condition)
        .bind(next_stamp(previous, Utc::now()))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DeptStockError::NotFound("item".to_string()))
    }

    /// Count all items.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Clock readings can repeat or step backwards; the stamp never does.
fn next_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn map_write_error(e: sqlx::Error) -> DeptStockError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return DeptStockError::Validation("Unknown department".to_string());
        }
        if db_err.is_check_violation() {
            return DeptStockError::Validation("Quantity must not be negative".to_string());
        }
    }
    DeptStockError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        db.seed_departments().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_item() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());

        let item = repo
            .create(&NewItem::new("Laptop", 1).with_quantity(3).with_condition("New"))
            .await
            .unwrap();

        assert!(item.id > 0);
        assert_eq!(item.name, "Laptop");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.condition, "New");
        assert_eq!(item.department_id, 1);
    }

    #[tokio::test]
    async fn test_create_item_unknown_department() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());

        let result = repo.create(&NewItem::new("Laptop", 99)).await;
        assert!(matches!(result, Err(DeptStockError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_by_department() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());

        repo.create(&NewItem::new("Laptop", 1)).await.unwrap();
        repo.create(&NewItem::new("Printer", 2)).await.unwrap();
        repo.create(&NewItem::new("Monitor", 1)).await.unwrap();

        let items = repo.list_by_department(1).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Monitor"]);

        assert!(repo.list_by_department(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_item() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());
        let item = repo
            .create(&NewItem::new("Laptop", 1).with_quantity(3).with_condition("New"))
            .await
            .unwrap();

        let updated = repo
            .update(item.id, &ItemUpdate::new("Laptop Pro", 5, "Used"))
            .await
            .unwrap();

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.condition, "Used");
        assert_eq!(updated.department_id, 1);
        assert!(updated.last_updated > item.last_updated);
    }

    #[tokio::test]
    async fn test_update_strictly_increases_timestamp() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());
        let item = repo.create(&NewItem::new("Chair", 2)).await.unwrap();

        let mut last = item.last_updated;
        for quantity in 1..=5 {
            let updated = repo
                .update(item.id, &ItemUpdate::new("Chair", quantity, ""))
                .await
                .unwrap();
            assert!(updated.last_updated > last);
            last = updated.last_updated;
        }
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());

        let result = repo.update(404, &ItemUpdate::new("Ghost", 1, "")).await;
        assert!(matches!(result, Err(DeptStockError::NotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected_by_schema() {
        let db = setup_db().await;
        let repo = ItemRepository::new(db.pool());

        let result = repo.create(&NewItem::new("Desk", 1).with_quantity(-1)).await;
        assert!(matches!(result, Err(DeptStockError::Validation(_))));
    }

    #[test]
    fn test_next_stamp() {
        let t0 = Utc::now();
        let later = t0 + Duration::seconds(1);

        assert_eq!(next_stamp(t0, later), later);
        assert_eq!(next_stamp(t0, t0), t0 + Duration::microseconds(1));
        assert_eq!(
            next_stamp(later, t0),
            later + Duration::microseconds(1)
        );
    }
}
