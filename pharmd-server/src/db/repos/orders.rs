//! Order repository
//!
//! Order creation is multi-step (verify user, insert order, insert
//! lines) and runs in a single transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// Order record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Line in an order creation request
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub item_id: String,
    pub quantity: i32,
}

/// Order repository
pub struct OrderRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its lines.
    ///
    /// Runs in a transaction: if the user or any referenced item is
    /// missing, nothing is inserted.
    pub async fn create(&self, user_id: &str, lines: &[NewOrderLine]) -> Result<Order, DbError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query("SELECT 1 FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        if user.is_none() {
            return Err(DbError::NotFound {
                resource: "user",
                id: user_id.to_owned(),
            });
        }

        let order_id = Uuid::new_v4().to_string();
        let row = sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING order_id, user_id, created_at, status
            "#,
        )
        .bind(&order_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            let item = sqlx::query("SELECT 1 FROM items WHERE item_id = $1")
                .bind(&line.item_id)
                .fetch_optional(&mut *tx)
                .await?;
            if item.is_none() {
                return Err(DbError::NotFound {
                    resource: "item",
                    id: line.item_id.clone(),
                });
            }

            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, item_id, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(&line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let order = Order {
            order_id: row.get("order_id"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            status: row.get("status"),
        };

        tx.commit().await?;
        Ok(order)
    }

    /// Get an order by id.
    pub async fn get(&self, order_id: &str) -> Result<Order, DbError> {
        let row = sqlx::query(
            "SELECT order_id, user_id, created_at, status FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "order",
            id: order_id.to_owned(),
        })?;

        Ok(Order {
            order_id: row.get("order_id"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            status: row.get("status"),
        })
    }
}
