//! `UserRepo` over SQLite. Maps the `role` TEXT column through
//! `Role::parse` so an unexpected label degrades to `user`.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use domains::{Result, Role, User, UserRepo};

use crate::{storage_err, SqliteStore};

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        bio: row.get("bio"),
        role: Role::parse(&row.get::<String, _>("role")),
        confirmation_hash: row.get("confirmation_hash"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, username, email, bio, role, confirmation_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(&user.confirmation_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "UPDATE users
                SET username = ?, email = ?, bio = ?, role = ?, confirmation_hash = ?
              WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(&user.confirmation_hash)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn search_users(
        &self,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64)> {
        let needle = search.as_deref();
        let rows = sqlx::query(
            "SELECT * FROM users
              WHERE (? IS NULL OR instr(lower(username), lower(?)) > 0)
              ORDER BY username
              LIMIT ? OFFSET ?",
        )
        .bind(needle)
        .bind(needle)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
              WHERE (? IS NULL OR instr(lower(username), lower(?)) > 0)",
        )
        .bind(needle)
        .bind(needle)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok((rows.iter().map(row_to_user).collect(), count))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }
}
