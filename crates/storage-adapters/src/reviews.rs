//! `ReviewRepo` over SQLite.
//!
//! Every lookup is scoped to the parent id from the route, so an id
//! reached through the wrong parent reads as absent. Listings are newest
//! first with insertion order breaking timestamp ties (v7 ids ascend in
//! insertion order).

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use domains::{Authored, Comment, Result, Review, ReviewRepo};

use crate::{storage_err, SqliteStore};

fn row_to_review(row: &SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        title_id: row.get("title_id"),
        score: row.get("score"),
        authored: Authored {
            author_id: row.get("author_id"),
            text: row.get("text"),
            created_at: row.get("created_at"),
        },
    }
}

fn row_to_comment(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        review_id: row.get("review_id"),
        authored: Authored {
            author_id: row.get("author_id"),
            text: row.get("text"),
            created_at: row.get("created_at"),
        },
    }
}

#[async_trait]
impl ReviewRepo for SqliteStore {
    async fn insert_review(&self, review: Review) -> Result<Review> {
        sqlx::query(
            "INSERT INTO reviews (id, title_id, author_id, score, text, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(review.id)
        .bind(review.title_id)
        .bind(review.authored.author_id)
        .bind(review.score)
        .bind(&review.authored.text)
        .bind(review.authored.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(review)
    }

    /// Only the client-mutable columns; author, title and timestamp stay
    /// as inserted.
    async fn update_review(&self, review: &Review) -> Result<()> {
        sqlx::query("UPDATE reviews SET score = ?, text = ? WHERE id = ?")
            .bind(review.score)
            .bind(&review.authored.text)
            .bind(review.id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn review_by_id(&self, title_id: Uuid, review_id: Uuid) -> Result<Option<Review>> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = ? AND title_id = ?")
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_review))
    }

    async fn list_reviews(
        &self,
        title_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Review>, i64)> {
        let rows = sqlx::query(
            "SELECT * FROM reviews
              WHERE title_id = ?
              ORDER BY created_at DESC, id ASC
              LIMIT ? OFFSET ?",
        )
        .bind(title_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = ?")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok((rows.iter().map(row_to_review).collect(), count))
    }

    async fn delete_review(&self, title_id: Uuid, review_id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM reviews WHERE id = ? AND title_id = ?")
            .bind(review_id)
            .bind(title_id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }

    async fn insert_comment(&self, comment: Comment) -> Result<Comment> {
        sqlx::query(
            "INSERT INTO comments (id, review_id, author_id, text, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.id)
        .bind(comment.review_id)
        .bind(comment.authored.author_id)
        .bind(&comment.authored.text)
        .bind(comment.authored.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(comment)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<()> {
        sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(&comment.authored.text)
            .bind(comment.id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn comment_by_id(&self, review_id: Uuid, comment_id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ? AND review_id = ?")
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.as_ref().map(row_to_comment))
    }

    async fn list_comments(
        &self,
        review_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Comment>, i64)> {
        let rows = sqlx::query(
            "SELECT * FROM comments
              WHERE review_id = ?
              ORDER BY created_at DESC, id ASC
              LIMIT ? OFFSET ?",
        )
        .bind(review_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = ?")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok((rows.iter().map(row_to_comment).collect(), count))
    }

    async fn delete_comment(&self, review_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM comments WHERE id = ? AND review_id = ?")
            .bind(comment_id)
            .bind(review_id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(done.rows_affected() > 0)
    }
}
