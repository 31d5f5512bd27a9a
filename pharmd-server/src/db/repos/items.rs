//! Item repository

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// Item record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Partial update for an item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an item.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: f64,
    ) -> Result<Item, DbError> {
        let item_id = Uuid::new_v4().to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO items (item_id, name, description, price)
            VALUES ($1, $2, $3, $4)
            RETURNING item_id, name, description, price
            "#,
        )
        .bind(&item_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(item_from_row(&row))
    }

    /// List all items in stable id order.
    pub async fn list(&self) -> Result<Vec<Item>, DbError> {
        let rows =
            sqlx::query("SELECT item_id, name, description, price FROM items ORDER BY item_id")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Get a single item by id.
    pub async fn get(&self, item_id: &str) -> Result<Item, DbError> {
        let row =
            sqlx::query("SELECT item_id, name, description, price FROM items WHERE item_id = $1")
                .bind(item_id)
                .fetch_optional(self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound {
                    resource: "item",
                    id: item_id.to_owned(),
                })?;

        Ok(item_from_row(&row))
    }

    /// Apply a partial update; unset fields keep their current value.
    pub async fn update(&self, item_id: &str, patch: ItemPatch) -> Result<Item, DbError> {
        let row = sqlx::query(
            r#"
            UPDATE items
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price)
            WHERE item_id = $1
            RETURNING item_id, name, description, price
            "#,
        )
        .bind(item_id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "item",
            id: item_id.to_owned(),
        })?;

        Ok(item_from_row(&row))
    }

    /// Delete an item.
    pub async fn delete(&self, item_id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "item",
                id: item_id.to_owned(),
            });
        }

        Ok(())
    }
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> Item {
    Item {
        item_id: row.get("item_id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_preserves_unset_fields() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = ItemRepo::new(&pool);
        let item = repo
            .create("Aspirin", Some("Pain reliever"), 5.99)
            .await
            .expect("create");

        let updated = repo
            .update(
                &item.item_id,
                ItemPatch {
                    price: Some(6.49),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "Aspirin");
        assert_eq!(updated.description.as_deref(), Some("Pain reliever"));
        assert_eq!(updated.price, 6.49);

        repo.delete(&item.item_id).await.expect("delete");
    }
}
