//! User repository

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user. Duplicate emails surface as `Conflict`.
    pub async fn create(&self, email: &str, name: &str) -> Result<User, DbError> {
        let user_id = Uuid::new_v4().to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO users (user_id, email, name)
            VALUES ($1, $2, $3)
            RETURNING user_id, email, name
            "#,
        )
        .bind(&user_id)
        .bind(email)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_insert(e, "a user with that email already exists"))?;

        Ok(User {
            user_id: row.get("user_id"),
            email: row.get("email"),
            name: row.get("name"),
        })
    }

    /// Get a user by id.
    pub async fn get(&self, user_id: &str) -> Result<User, DbError> {
        let row = sqlx::query("SELECT user_id, email, name FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "user",
                id: user_id.to_owned(),
            })?;

        Ok(User {
            user_id: row.get("user_id"),
            email: row.get("email"),
            name: row.get("name"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p pharmd-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_is_conflict() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = UserRepo::new(&pool);
        let email = format!("{}@test.invalid", Uuid::new_v4());
        repo.create(&email, "First").await.expect("first insert");

        let err = repo.create(&email, "Second").await.expect_err("duplicate");
        assert!(matches!(err, DbError::Conflict { .. }));
    }
}
